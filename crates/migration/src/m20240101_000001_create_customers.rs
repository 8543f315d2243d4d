//! Create `customers` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk_auto(Customers::Id))
                    .col(string_len(Customers::Name, 128).not_null())
                    .col(string_len_null(Customers::Email, 255))
                    .col(string_len(Customers::Phone, 32).not_null())
                    .col(string_len_null(Customers::Address, 255))
                    .col(timestamp_with_time_zone(Customers::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customers::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customers { Table, Id, Name, Email, Phone, Address, CreatedAt, UpdatedAt }
