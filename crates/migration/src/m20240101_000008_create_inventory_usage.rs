//! Create `inventory_usage` table with FK to `inventory`; the optional
//! service/employee references are kept loose (SetNull) so usage history
//! survives staff or catalog removal.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryUsage::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryUsage::Id))
                    .col(integer(InventoryUsage::ItemId).not_null())
                    .col(integer_null(InventoryUsage::ServiceId))
                    .col(integer(InventoryUsage::Quantity).not_null())
                    .col(integer_null(InventoryUsage::EmployeeId))
                    .col(timestamp_with_time_zone(InventoryUsage::UsageDate).not_null())
                    .col(string_len_null(InventoryUsage::Notes, 1024))
                    .col(timestamp_with_time_zone(InventoryUsage::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_usage_item")
                            .from(InventoryUsage::Table, InventoryUsage::ItemId)
                            .to(Inventory::Table, Inventory::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_usage_service")
                            .from(InventoryUsage::Table, InventoryUsage::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_usage_employee")
                            .from(InventoryUsage::Table, InventoryUsage::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(InventoryUsage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum InventoryUsage { Table, Id, ItemId, ServiceId, Quantity, EmployeeId, UsageDate, Notes, CreatedAt }

#[derive(DeriveIden)]
enum Inventory { Table, Id }

#[derive(DeriveIden)]
enum Services { Table, Id }

#[derive(DeriveIden)]
enum Employees { Table, Id }
