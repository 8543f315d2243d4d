//! Indexes for the hot lookup paths: workflow status filters, token
//! validation, and the per-owner joins.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_vehicles_customer_id")
                    .table(Vehicles::Table)
                    .col(Vehicles::CustomerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pending_services_status")
                    .table(PendingServices::Table)
                    .col(PendingServices::Status)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pending_services_entry_time")
                    .table(PendingServices::Table)
                    .col(PendingServices::EntryTime)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_service_rating_links_service_id")
                    .table(ServiceRatingLinks::Table)
                    .col(ServiceRatingLinks::ServiceId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventory_usage_item_id")
                    .table(InventoryUsage::Table)
                    .col(InventoryUsage::ItemId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_work_orders_start_date")
                    .table(WorkOrders::Table)
                    .col(WorkOrders::StartDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_work_orders_start_date").table(WorkOrders::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_inventory_usage_item_id").table(InventoryUsage::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_service_rating_links_service_id").table(ServiceRatingLinks::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_pending_services_entry_time").table(PendingServices::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_pending_services_status").table(PendingServices::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_vehicles_customer_id").table(Vehicles::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Vehicles { Table, CustomerId }

#[derive(DeriveIden)]
enum PendingServices { Table, Status, EntryTime }

#[derive(DeriveIden)]
enum ServiceRatingLinks { Table, ServiceId }

#[derive(DeriveIden)]
enum InventoryUsage { Table, ItemId }

#[derive(DeriveIden)]
enum WorkOrders { Table, StartDate }
