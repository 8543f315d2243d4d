//! Create `work_orders` table. Billed units of completed work; the revenue
//! source for dashboard and report aggregates.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkOrders::Table)
                    .if_not_exists()
                    .col(pk_auto(WorkOrders::Id))
                    .col(integer_null(WorkOrders::ServiceId))
                    .col(double(WorkOrders::TotalCost).not_null())
                    .col(timestamp_with_time_zone(WorkOrders::StartDate).not_null())
                    .col(timestamp_with_time_zone(WorkOrders::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_service")
                            .from(WorkOrders::Table, WorkOrders::ServiceId)
                            .to(PendingServices::Table, PendingServices::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WorkOrders::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WorkOrders { Table, Id, ServiceId, TotalCost, StartDate, CreatedAt }

#[derive(DeriveIden)]
enum PendingServices { Table, Id }
