//! Create `employees` table.
//!
//! `status` holds the `active`/`inactive` literal; validation lives in models.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk_auto(Employees::Id))
                    .col(string_len(Employees::Name, 128).not_null())
                    .col(string_len(Employees::Position, 64).not_null())
                    .col(string_len_null(Employees::Email, 255))
                    .col(string_len_null(Employees::Phone, 32))
                    .col(date(Employees::HireDate).not_null())
                    .col(string_len(Employees::Status, 16).not_null())
                    .col(timestamp_with_time_zone(Employees::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Employees::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Employees::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Employees { Table, Id, Name, Position, Email, Phone, HireDate, Status, CreatedAt, UpdatedAt }
