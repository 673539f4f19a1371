//! Create `user_on_exercise` junction table.
//!
//! Identity is the composite `(user_id, exercise_id)`; the primary key makes a
//! second row for the same pair impossible. Rows cascade from both parents.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserOnExercise::Table)
                    .if_not_exists()
                    .col(big_integer(UserOnExercise::UserId).not_null())
                    .col(big_integer(UserOnExercise::ExerciseId).not_null())
                    .col(integer(UserOnExercise::EightRepMax).not_null())
                    .col(integer(UserOnExercise::TenRepMax).not_null())
                    .col(integer(UserOnExercise::TwelveRepMax).not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_user_on_exercise")
                            .col(UserOnExercise::UserId)
                            .col(UserOnExercise::ExerciseId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_on_exercise_user")
                            .from(UserOnExercise::Table, UserOnExercise::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_on_exercise_exercise")
                            .from(UserOnExercise::Table, UserOnExercise::ExerciseId)
                            .to(Exercise::Table, Exercise::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserOnExercise::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserOnExercise { Table, UserId, ExerciseId, EightRepMax, TenRepMax, TwelveRepMax }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Exercise { Table, Id }
