//! Customer satisfaction ratings: three 1-5 dimensions plus a free-text
//! comment, one rating per submission against a completed service.
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, Set, Statement,
};
use serde::{Deserialize, Serialize};

use models::pending_service::{self, Entity as PendingServiceEntity};
use models::service_rating::{self, Entity as RatingEntity};

use crate::errors::ServiceError;
use crate::rating_links;

#[derive(Debug, Clone, Deserialize)]
pub struct NewRating {
    pub service_id: i32,
    pub wait_time_rating: i32,
    pub staff_friendliness_rating: i32,
    pub service_quality_rating: i32,
    pub customer_comment: Option<String>,
    /// When present, the submission came through a rating link and the
    /// token is consumed atomically with the insert.
    pub token: Option<String>,
}

/// Shop-wide averages for the ratings report. All zeros when no ratings
/// exist yet.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct RatingSummary {
    pub total_ratings: i64,
    pub avg_wait_time: f64,
    pub avg_staff_friendliness: f64,
    pub avg_service_quality: f64,
    pub avg_overall: f64,
}

pub async fn list_ratings(db: &DatabaseConnection) -> Result<Vec<service_rating::Model>, ServiceError> {
    RatingEntity::find()
        .order_by_desc(service_rating::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_ratings_for_service(
    db: &DatabaseConnection,
    service_id: i32,
) -> Result<Vec<service_rating::Model>, ServiceError> {
    RatingEntity::find()
        .filter(service_rating::Column::ServiceId.eq(service_id))
        .order_by_desc(service_rating::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Store a rating. All three dimensions are validated up front; when a
/// token rides along it must resolve to this very service and gets burned
/// on success.
pub async fn submit_rating(
    db: &DatabaseConnection,
    input: NewRating,
) -> Result<service_rating::Model, ServiceError> {
    service_rating::validate_score("wait_time_rating", input.wait_time_rating)?;
    service_rating::validate_score("staff_friendliness_rating", input.staff_friendliness_rating)?;
    service_rating::validate_score("service_quality_rating", input.service_quality_rating)?;

    let service = PendingServiceEntity::find_by_id(input.service_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("pending service"))?;
    if service.status != pending_service::STATUS_COMPLETED {
        return Err(ServiceError::Validation(
            "Only completed services can be rated".into(),
        ));
    }

    if let Some(token) = input.token.as_deref() {
        let ctx = rating_links::validate_token(db, token)
            .await?
            .ok_or_else(|| ServiceError::Validation("Invalid or expired rating link".into()))?;
        if ctx.service_id != input.service_id {
            return Err(ServiceError::Validation(
                "Rating link does not match this service".into(),
            ));
        }
    }

    let am = service_rating::ActiveModel {
        service_id: Set(input.service_id),
        wait_time_rating: Set(input.wait_time_rating),
        staff_friendliness_rating: Set(input.staff_friendliness_rating),
        service_quality_rating: Set(input.service_quality_rating),
        customer_comment: Set(input.customer_comment),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let stored = am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    if let Some(token) = input.token.as_deref() {
        rating_links::mark_used(db, token).await?;
    }
    Ok(stored)
}

pub async fn rating_summary(db: &DatabaseConnection) -> Result<RatingSummary, ServiceError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        SELECT
            COUNT(*) AS total_ratings,
            ROUND(COALESCE(AVG(wait_time_rating), 0), 2)::float8 AS avg_wait_time,
            ROUND(COALESCE(AVG(staff_friendliness_rating), 0), 2)::float8 AS avg_staff_friendliness,
            ROUND(COALESCE(AVG(service_quality_rating), 0), 2)::float8 AS avg_service_quality,
            ROUND(COALESCE(AVG((wait_time_rating + staff_friendliness_rating + service_quality_rating) / 3.0), 0), 2)::float8 AS avg_overall
        FROM service_ratings
        "#,
        [],
    );
    RatingSummary::find_by_statement(stmt)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::Db("rating summary returned no row".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use crate::{customers, pending_services, service_offers, vehicles};

    #[tokio::test]
    async fn rating_lifecycle_with_token() -> anyhow::Result<()> {
        let Some(db) = test_db().await else { return Ok(()) };
        let cust = customers::create_customer(
            &db,
            customers::NewCustomer {
                name: "Tomas Gil".into(),
                phone: "555-0142".into(),
                email: None,
                address: None,
            },
        )
        .await?;
        let veh = vehicles::create_vehicle(
            &db,
            vehicles::NewVehicle {
                customer_id: cust.id,
                make: "Mazda".into(),
                model: "3".into(),
                year: 2019,
                license_plate: "TGL-451".into(),
                vin: None,
                color: None,
                last_service_date: None,
            },
        )
        .await?;
        let offer = service_offers::create_service(
            &db,
            service_offers::NewServiceOffer {
                name: "Detailing".into(),
                description: None,
                base_price: 80.0,
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

        // not yet completed
        let early = submit_rating(
            &db,
            NewRating {
                service_id: svc.id,
                wait_time_rating: 5,
                staff_friendliness_rating: 5,
                service_quality_rating: 5,
                customer_comment: None,
                token: None,
            },
        )
        .await;
        assert!(matches!(early, Err(ServiceError::Validation(_))));

        pending_services::mark_complete(&db, svc.id).await?;
        let link = rating_links::issue_rating_link(&db, svc.id).await?;

        // out-of-range score never reaches the database
        let bad = submit_rating(
            &db,
            NewRating {
                service_id: svc.id,
                wait_time_rating: 9,
                staff_friendliness_rating: 3,
                service_quality_rating: 3,
                customer_comment: None,
                token: None,
            },
        )
        .await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));

        let stored = submit_rating(
            &db,
            NewRating {
                service_id: svc.id,
                wait_time_rating: 4,
                staff_friendliness_rating: 5,
                service_quality_rating: 4,
                customer_comment: Some("quick and friendly".into()),
                token: Some(link.unique_token.clone()),
            },
        )
        .await?;
        assert_eq!(stored.service_id, svc.id);

        // token was consumed by the submission
        assert!(rating_links::validate_token(&db, &link.unique_token).await?.is_none());
        let reuse = submit_rating(
            &db,
            NewRating {
                service_id: svc.id,
                wait_time_rating: 3,
                staff_friendliness_rating: 3,
                service_quality_rating: 3,
                customer_comment: None,
                token: Some(link.unique_token.clone()),
            },
        )
        .await;
        assert!(matches!(reuse, Err(ServiceError::Validation(_))));

        let for_service = get_ratings_for_service(&db, svc.id).await?;
        assert_eq!(for_service.len(), 1);

        let summary = rating_summary(&db).await?;
        assert!(summary.total_ratings >= 1);
        assert!(summary.avg_overall > 0.0);

        pending_services::delete_pending_service(&db, svc.id).await?;
        let _ = service_offers::delete_service(&db, offer.id).await;
        let _ = customers::delete_customer(&db, cust.id).await;
        Ok(())
    }
}
