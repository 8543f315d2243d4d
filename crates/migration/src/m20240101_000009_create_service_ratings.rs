//! Create `service_ratings` table with FK to `pending_services`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceRatings::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceRatings::Id))
                    .col(integer(ServiceRatings::ServiceId).not_null())
                    .col(integer(ServiceRatings::WaitTimeRating).not_null())
                    .col(integer(ServiceRatings::StaffFriendlinessRating).not_null())
                    .col(integer(ServiceRatings::ServiceQualityRating).not_null())
                    .col(string_len_null(ServiceRatings::CustomerComment, 2048))
                    .col(timestamp_with_time_zone(ServiceRatings::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_ratings_service")
                            .from(ServiceRatings::Table, ServiceRatings::ServiceId)
                            .to(PendingServices::Table, PendingServices::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceRatings::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceRatings { Table, Id, ServiceId, WaitTimeRating, StaffFriendlinessRating, ServiceQualityRating, CustomerComment, CreatedAt }

#[derive(DeriveIden)]
enum PendingServices { Table, Id }
