//! Create `service_rating_links` table. The token column is unique; issuance
//! reuses an unused, unexpired row per service instead of minting duplicates.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceRatingLinks::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceRatingLinks::Id))
                    .col(integer(ServiceRatingLinks::ServiceId).not_null())
                    .col(string_len(ServiceRatingLinks::UniqueToken, 64).unique_key().not_null())
                    .col(boolean(ServiceRatingLinks::IsUsed).not_null())
                    .col(timestamp_with_time_zone(ServiceRatingLinks::ExpiresAt).not_null())
                    .col(timestamp_with_time_zone(ServiceRatingLinks::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_rating_links_service")
                            .from(ServiceRatingLinks::Table, ServiceRatingLinks::ServiceId)
                            .to(PendingServices::Table, PendingServices::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceRatingLinks::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceRatingLinks { Table, Id, ServiceId, UniqueToken, IsUsed, ExpiresAt, CreatedAt }

#[derive(DeriveIden)]
enum PendingServices { Table, Id }
