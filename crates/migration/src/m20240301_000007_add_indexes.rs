use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children are hydrated per user, so every back-reference is indexed.
        manager
            .create_index(
                Index::create()
                    .name("idx_todo_user")
                    .table(Todo::Table)
                    .col(Todo::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_habit_user")
                    .table(Habit::Table)
                    .col(Habit::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_deadline_user")
                    .table(Deadline::Table)
                    .col(Deadline::UserId)
                    .to_owned(),
            )
            .await?;

        // The composite primary key leads with user_id; performers are loaded by exercise.
        manager
            .create_index(
                Index::create()
                    .name("idx_user_on_exercise_exercise")
                    .table(UserOnExercise::Table)
                    .col(UserOnExercise::ExerciseId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_todo_user").table(Todo::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_habit_user").table(Habit::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_deadline_user").table(Deadline::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_on_exercise_exercise")
                    .table(UserOnExercise::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Todo { Table, UserId }

#[derive(DeriveIden)]
enum Habit { Table, UserId }

#[derive(DeriveIden)]
enum Deadline { Table, UserId }

#[derive(DeriveIden)]
enum UserOnExercise { Table, ExerciseId }
