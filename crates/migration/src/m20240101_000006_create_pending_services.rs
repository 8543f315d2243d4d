//! Create `pending_services` table.
//!
//! The workflow row tying a vehicle to a service offer, optionally assigned
//! to an employee. Status is one of four literals; the allowed set is
//! enforced at the API boundary, not by the schema.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PendingServices::Table)
                    .if_not_exists()
                    .col(pk_auto(PendingServices::Id))
                    .col(integer(PendingServices::VehicleId).not_null())
                    .col(integer(PendingServices::ServiceTypeId).not_null())
                    .col(integer_null(PendingServices::EmployeeId))
                    .col(timestamp_with_time_zone(PendingServices::EntryTime).not_null())
                    .col(timestamp_with_time_zone(PendingServices::EstimatedCompletionTime).not_null())
                    .col(string_len(PendingServices::Status, 16).not_null())
                    .col(string_len_null(PendingServices::Notes, 1024))
                    .col(timestamp_with_time_zone(PendingServices::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(PendingServices::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pending_services_vehicle")
                            .from(PendingServices::Table, PendingServices::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pending_services_service_type")
                            .from(PendingServices::Table, PendingServices::ServiceTypeId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pending_services_employee")
                            .from(PendingServices::Table, PendingServices::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PendingServices::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PendingServices { Table, Id, VehicleId, ServiceTypeId, EmployeeId, EntryTime, EstimatedCompletionTime, Status, Notes, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Vehicles { Table, Id }

#[derive(DeriveIden)]
enum Services { Table, Id }

#[derive(DeriveIden)]
enum Employees { Table, Id }
