//! Create `habit` table with FK to `user`.
//!
//! `streak` is caller-managed; `updated_at` is stamped on every write.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Habit::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Habit::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(string_len(Habit::Name, 255).not_null())
                    .col(text(Habit::Description).not_null())
                    .col(integer(Habit::Streak).not_null().default(0))
                    .col(timestamp_with_time_zone(Habit::UpdatedAt).not_null())
                    .col(big_integer(Habit::UserId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_habit_user")
                            .from(Habit::Table, Habit::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Habit::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Habit { Table, Id, Name, Description, Streak, UpdatedAt, UserId }

#[derive(DeriveIden)]
enum User { Table, Id }
