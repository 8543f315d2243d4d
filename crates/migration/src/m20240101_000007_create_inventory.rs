//! Create `inventory` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Inventory::Table)
                    .if_not_exists()
                    .col(pk_auto(Inventory::Id))
                    .col(string_len(Inventory::Name, 128).not_null())
                    .col(string_len_null(Inventory::Description, 255))
                    .col(string_len(Inventory::Category, 64).not_null())
                    .col(integer(Inventory::Quantity).not_null())
                    .col(string_len(Inventory::Unit, 32).not_null())
                    .col(double(Inventory::CostPrice).not_null())
                    .col(double(Inventory::SellingPrice).not_null())
                    .col(integer(Inventory::ReorderLevel).not_null())
                    .col(timestamp_with_time_zone(Inventory::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Inventory::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Inventory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Inventory { Table, Id, Name, Description, Category, Quantity, Unit, CostPrice, SellingPrice, ReorderLevel, CreatedAt, UpdatedAt }
