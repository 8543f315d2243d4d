//! Single-use rating tokens handed to customers when their service is
//! marked complete.
//!
//! Issuance is idempotent: asking for a link while an unused, unexpired one
//! exists returns that link instead of minting another. Tokens live 30 days.
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use models::pending_service::{self, Entity as PendingServiceEntity};
use models::service_rating_link::{self, Entity as RatingLinkEntity};
use models::vehicle::Entity as VehicleEntity;

use crate::errors::ServiceError;

const TOKEN_BYTES: usize = 32;
const LINK_TTL_DAYS: i64 = 30;

fn mint_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// What the public rating page needs to render: the token's validity plus
/// enough context to say which vehicle and service are being rated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenContext {
    pub service_id: i32,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub license_plate: String,
    pub token: String,
    pub expires_at: sea_orm::prelude::DateTimeWithTimeZone,
}

/// Issue (or re-surface) a rating link for a completed service.
pub async fn issue_rating_link(
    db: &DatabaseConnection,
    service_id: i32,
) -> Result<service_rating_link::Model, ServiceError> {
    let service = PendingServiceEntity::find_by_id(service_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("pending service"))?;
    if service.status != pending_service::STATUS_COMPLETED {
        return Err(ServiceError::Validation(
            "Rating links can only be generated for completed services".into(),
        ));
    }

    let now = Utc::now();
    let existing = RatingLinkEntity::find()
        .filter(service_rating_link::Column::ServiceId.eq(service_id))
        .filter(service_rating_link::Column::IsUsed.eq(false))
        .filter(service_rating_link::Column::ExpiresAt.gt(now))
        .order_by_desc(service_rating_link::Column::CreatedAt)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if let Some(link) = existing {
        return Ok(link);
    }

    let am = service_rating_link::ActiveModel {
        service_id: Set(service_id),
        unique_token: Set(mint_token()),
        is_used: Set(false),
        expires_at: Set((now + Duration::days(LINK_TTL_DAYS)).into()),
        created_at: Set(now.into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Look up a token and check it is usable. Returns `None` when the token is
/// unknown, already used, or expired.
pub async fn validate_token(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Option<TokenContext>, ServiceError> {
    let link = RatingLinkEntity::find()
        .filter(service_rating_link::Column::UniqueToken.eq(token))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let Some(link) = link else { return Ok(None) };
    if link.is_used || link.expires_at < Utc::now() {
        return Ok(None);
    }
    let service = PendingServiceEntity::find_by_id(link.service_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("pending service"))?;
    let vehicle = VehicleEntity::find_by_id(service.vehicle_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("vehicle"))?;
    Ok(Some(TokenContext {
        service_id: link.service_id,
        vehicle_make: vehicle.make,
        vehicle_model: vehicle.model,
        license_plate: vehicle.license_plate,
        token: link.unique_token,
        expires_at: link.expires_at,
    }))
}

/// Burn a token after the rating it guarded has been stored.
pub async fn mark_used(db: &DatabaseConnection, token: &str) -> Result<bool, ServiceError> {
    let link = RatingLinkEntity::find()
        .filter(service_rating_link::Column::UniqueToken.eq(token))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let Some(link) = link else { return Ok(false) };
    if link.is_used {
        return Ok(false);
    }
    let mut am: service_rating_link::ActiveModel = link.into();
    am.is_used = Set(true);
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use crate::{customers, pending_services, service_offers, vehicles};

    #[test]
    fn tokens_are_long_and_distinct() {
        let a = mint_token();
        let b = mint_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn issuance_requires_completion_and_is_idempotent() -> anyhow::Result<()> {
        let Some(db) = test_db().await else { return Ok(()) };
        let cust = customers::create_customer(
            &db,
            customers::NewCustomer {
                name: "Rita Soto".into(),
                phone: "555-0188".into(),
                email: None,
                address: None,
            },
        )
        .await?;
        let veh = vehicles::create_vehicle(
            &db,
            vehicles::NewVehicle {
                customer_id: cust.id,
                make: "Kia".into(),
                model: "Rio".into(),
                year: 2020,
                license_plate: "RTS-777".into(),
                vin: None,
                color: None,
                last_service_date: None,
            },
        )
        .await?;
        let offer = service_offers::create_service(
            &db,
            service_offers::NewServiceOffer {
                name: "Tire rotation".into(),
                description: None,
                base_price: 25.0,
                estimated_hours: None,
                category_id: None,
            },
        )
        .await?;
        let svc = pending_services::create_pending_service(
            &db,
            pending_services::NewPendingService {
                vehicle_id: veh.id,
                service_type_id: offer.id,
                employee_id: None,
                entry_time: None,
                estimated_completion_time: None,
                notes: None,
            },
        )
        .await?;

        // not completed yet
        assert!(matches!(
            issue_rating_link(&db, svc.id).await,
            Err(ServiceError::Validation(_))
        ));

        pending_services::mark_complete(&db, svc.id).await?;
        let first = issue_rating_link(&db, svc.id).await?;
        let second = issue_rating_link(&db, svc.id).await?;
        assert_eq!(first.unique_token, second.unique_token);

        let ctx = validate_token(&db, &first.unique_token).await?.unwrap();
        assert_eq!(ctx.service_id, svc.id);
        assert_eq!(ctx.license_plate, "RTS-777");

        assert!(mark_used(&db, &first.unique_token).await?);
        assert!(!mark_used(&db, &first.unique_token).await?);
        assert!(validate_token(&db, &first.unique_token).await?.is_none());

        // a fresh link after the old one is burned
        let third = issue_rating_link(&db, svc.id).await?;
        assert_ne!(third.unique_token, first.unique_token);

        pending_services::delete_pending_service(&db, svc.id).await?;
        let _ = service_offers::delete_service(&db, offer.id).await;
        let _ = customers::delete_customer(&db, cust.id).await;
        Ok(())
    }
}
