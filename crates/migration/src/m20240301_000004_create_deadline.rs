//! Create `deadline` table with FK to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deadline::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Deadline::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(string_len(Deadline::Name, 255).not_null())
                    .col(string_len(Deadline::Subject, 255).not_null())
                    .col(text(Deadline::Description).not_null())
                    .col(timestamp_with_time_zone(Deadline::EndDate).not_null())
                    .col(big_integer(Deadline::UserId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deadline_user")
                            .from(Deadline::Table, Deadline::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Deadline::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Deadline { Table, Id, Name, Subject, Description, EndDate, UserId }

#[derive(DeriveIden)]
enum User { Table, Id }
