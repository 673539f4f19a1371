//! Create `exercise` table. `img` references an image resource by URL or path.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Exercise::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Exercise::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(string_len(Exercise::Name, 255).not_null())
                    .col(string_len(Exercise::Img, 1024).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Exercise::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Exercise { Table, Id, Name, Img }
