//! Pending-service workflow: the status-bearing unit of work joining a
//! vehicle, a service offer, and optionally an assigned employee.
//!
//! Status rules, as loose as the shop runs them:
//! - creation starts `in-progress` when an employee comes with it, else
//!   `pending`
//! - assigning an employee forces `in-progress` whatever the prior state
//! - marking complete forces `completed` unconditionally
//! - the generic update accepts any of the four literals; there is no
//!   adjacency rule between states
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};

use models::pending_service::{self, Entity as PendingServiceEntity};
use models::{customer, employee, service_offer, vehicle};

use crate::{contains_ci, errors::ServiceError, UpdateOutcome};

#[derive(Debug, Clone)]
pub struct NewPendingService {
    pub vehicle_id: i32,
    pub service_type_id: i32,
    pub employee_id: Option<i32>,
    pub entry_time: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub estimated_completion_time: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePendingService {
    pub vehicle_id: Option<i32>,
    pub service_type_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub entry_time: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub estimated_completion_time: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl UpdatePendingService {
    pub fn is_empty(&self) -> bool {
        self.vehicle_id.is_none()
            && self.service_type_id.is_none()
            && self.employee_id.is_none()
            && self.entry_time.is_none()
            && self.estimated_completion_time.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Denormalized view of a pending service: the row plus vehicle, owner,
/// offer and (when assigned) employee details.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct PendingServiceDetail {
    pub id: i32,
    pub vehicle_id: i32,
    pub service_type_id: i32,
    pub employee_id: Option<i32>,
    pub entry_time: sea_orm::prelude::DateTimeWithTimeZone,
    pub estimated_completion_time: sea_orm::prelude::DateTimeWithTimeZone,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub updated_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub year: i32,
    pub color: Option<String>,
    pub client_name: String,
    pub client_phone: String,
    pub service_type_name: String,
    pub service_price: f64,
    pub service_hours: Option<f64>,
    pub employee_name: Option<String>,
    pub employee_position: Option<String>,
}

fn detail_select() -> sea_orm::Select<PendingServiceEntity> {
    PendingServiceEntity::find()
        .join(JoinType::InnerJoin, pending_service::Relation::Vehicle.def())
        .join(JoinType::InnerJoin, vehicle::Relation::Customer.def())
        .join(JoinType::InnerJoin, pending_service::Relation::ServiceOffer.def())
        .join(JoinType::LeftJoin, pending_service::Relation::Employee.def())
        .column_as(vehicle::Column::Make, "make")
        .column_as(vehicle::Column::Model, "model")
        .column_as(vehicle::Column::LicensePlate, "license_plate")
        .column_as(vehicle::Column::Year, "year")
        .column_as(vehicle::Column::Color, "color")
        .column_as(customer::Column::Name, "client_name")
        .column_as(customer::Column::Phone, "client_phone")
        .column_as(service_offer::Column::Name, "service_type_name")
        .column_as(service_offer::Column::BasePrice, "service_price")
        .column_as(service_offer::Column::EstimatedHours, "service_hours")
        .column_as(employee::Column::Name, "employee_name")
        .column_as(employee::Column::Position, "employee_position")
}

pub async fn list_pending_services(db: &DatabaseConnection) -> Result<Vec<PendingServiceDetail>, ServiceError> {
    detail_select()
        .order_by_desc(pending_service::Column::EntryTime)
        .into_model::<PendingServiceDetail>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_pending_service(db: &DatabaseConnection, id: i32) -> Result<Option<PendingServiceDetail>, ServiceError> {
    detail_select()
        .filter(pending_service::Column::Id.eq(id))
        .into_model::<PendingServiceDetail>()
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Callers validate the literal before filtering; an unknown status simply
/// matches nothing here.
pub async fn get_services_by_status(db: &DatabaseConnection, status: &str) -> Result<Vec<PendingServiceDetail>, ServiceError> {
    detail_select()
        .filter(pending_service::Column::Status.eq(status))
        .order_by_desc(pending_service::Column::EntryTime)
        .into_model::<PendingServiceDetail>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Substring search over license plate, owner name and offer name.
pub async fn search_pending_services(db: &DatabaseConnection, term: &str) -> Result<Vec<PendingServiceDetail>, ServiceError> {
    detail_select()
        .filter(
            Condition::any()
                .add(contains_ci((vehicle::Entity, vehicle::Column::LicensePlate), term))
                .add(contains_ci((customer::Entity, customer::Column::Name), term))
                .add(contains_ci((service_offer::Entity, service_offer::Column::Name), term)),
        )
        .order_by_desc(pending_service::Column::EntryTime)
        .into_model::<PendingServiceDetail>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Create a workflow entry. Entry time defaults to now, the estimate to one
/// hour out, and the initial status follows from whether an employee was
/// supplied.
pub async fn create_pending_service(
    db: &DatabaseConnection,
    input: NewPendingService,
) -> Result<PendingServiceDetail, ServiceError> {
    let now = Utc::now();
    let status = if input.employee_id.is_some() {
        pending_service::STATUS_IN_PROGRESS
    } else {
        pending_service::STATUS_PENDING
    };
    let am = pending_service::ActiveModel {
        vehicle_id: Set(input.vehicle_id),
        service_type_id: Set(input.service_type_id),
        employee_id: Set(input.employee_id),
        entry_time: Set(input.entry_time.unwrap_or_else(|| now.into())),
        estimated_completion_time: Set(input
            .estimated_completion_time
            .unwrap_or_else(|| (now + Duration::hours(1)).into())),
        status: Set(status.to_string()),
        notes: Set(input.notes),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    let inserted = am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    get_pending_service(db, inserted.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pending service"))
}

/// Generic partial update. A status, if supplied, must be one of the four
/// literals; beyond that any state can be set from any state.
pub async fn update_pending_service(
    db: &DatabaseConnection,
    id: i32,
    input: UpdatePendingService,
) -> Result<UpdateOutcome<PendingServiceDetail>, ServiceError> {
    if input.is_empty() {
        return Ok(UpdateOutcome::NothingToUpdate);
    }
    if let Some(s) = input.status.as_deref() {
        pending_service::validate_status(s)?;
    }
    let existing = PendingServiceEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("pending service"))?;
    let mut am: pending_service::ActiveModel = existing.into();
    if let Some(v) = input.vehicle_id {
        am.vehicle_id = Set(v);
    }
    if let Some(v) = input.service_type_id {
        am.service_type_id = Set(v);
    }
    if let Some(v) = input.employee_id {
        am.employee_id = Set(Some(v));
    }
    if let Some(v) = input.entry_time {
        am.entry_time = Set(v);
    }
    if let Some(v) = input.estimated_completion_time {
        am.estimated_completion_time = Set(v);
    }
    if let Some(v) = input.status {
        am.status = Set(v);
    }
    if let Some(v) = input.notes {
        am.notes = Set(Some(v));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let detail = get_pending_service(db, updated.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pending service"))?;
    Ok(UpdateOutcome::Updated(detail))
}

/// Assign an employee; the status becomes `in-progress` regardless of what
/// it was.
pub async fn assign_to_employee(
    db: &DatabaseConnection,
    service_id: i32,
    employee_id: i32,
) -> Result<PendingServiceDetail, ServiceError> {
    let existing = PendingServiceEntity::find_by_id(service_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("pending service"))?;
    let mut am: pending_service::ActiveModel = existing.into();
    am.employee_id = Set(Some(employee_id));
    am.status = Set(pending_service::STATUS_IN_PROGRESS.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    get_pending_service(db, service_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pending service"))
}

/// Force the status to `completed`. Completion is what unlocks rating
/// submission and rating-link issuance.
pub async fn mark_complete(db: &DatabaseConnection, service_id: i32) -> Result<PendingServiceDetail, ServiceError> {
    let existing = PendingServiceEntity::find_by_id(service_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("pending service"))?;
    let mut am: pending_service::ActiveModel = existing.into();
    am.status = Set(pending_service::STATUS_COMPLETED.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    get_pending_service(db, service_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pending service"))
}

pub async fn delete_pending_service(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = PendingServiceEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use crate::{customers, employees, service_offers, vehicles};
    use chrono::NaiveDate;

    async fn fixture(db: &DatabaseConnection) -> anyhow::Result<(i32, i32, i32, i32)> {
        let cust = customers::create_customer(
            db,
            customers::NewCustomer {
                name: "Elena Paz".into(),
                phone: "555-0130".into(),
                email: None,
                address: None,
            },
        )
        .await?;
        let veh = vehicles::create_vehicle(
            db,
            vehicles::NewVehicle {
                customer_id: cust.id,
                make: "Ford".into(),
                model: "Focus".into(),
                year: 2018,
                license_plate: "LMN-321".into(),
                vin: None,
                color: None,
                last_service_date: None,
            },
        )
        .await?;
        let offer = service_offers::create_service(
            db,
            service_offers::NewServiceOffer {
                name: "Brake check".into(),
                description: None,
                base_price: 50.0,
                estimated_hours: Some(1.0),
                category_id: None,
            },
        )
        .await?;
        let emp = employees::create_employee(
            db,
            employees::NewEmployee {
                name: "Jorge Lara".into(),
                position: "Mechanic".into(),
                email: None,
                phone: None,
                hire_date: NaiveDate::from_ymd_opt(2021, 1, 15).unwrap(),
                status: "active".into(),
            },
        )
        .await?;
        Ok((cust.id, veh.id, offer.id, emp.id))
    }

    async fn teardown(db: &DatabaseConnection, cust: i32, offer: i32, emp: i32) {
        let _ = employees::delete_employee(db, emp).await;
        let _ = service_offers::delete_service(db, offer).await;
        let _ = customers::delete_customer(db, cust).await;
    }

    #[tokio::test]
    async fn creation_status_follows_employee_presence() -> anyhow::Result<()> {
        let Some(db) = test_db().await else { return Ok(()) };
        let (cust, veh, offer, emp) = fixture(&db).await?;

        let unassigned = create_pending_service(
            &db,
            NewPendingService {
                vehicle_id: veh,
                service_type_id: offer,
                employee_id: None,
                entry_time: None,
                estimated_completion_time: None,
                notes: None,
            },
        )
        .await?;
        assert_eq!(unassigned.status, "pending");
        assert_eq!(unassigned.employee_name, None);

        let assigned = create_pending_service(
            &db,
            NewPendingService {
                vehicle_id: veh,
                service_type_id: offer,
                employee_id: Some(emp),
                entry_time: None,
                estimated_completion_time: None,
                notes: Some("squeaky brakes".into()),
            },
        )
        .await?;
        assert_eq!(assigned.status, "in-progress");
        assert_eq!(assigned.employee_name.as_deref(), Some("Jorge Lara"));
        assert_eq!(assigned.client_name, "Elena Paz");
        assert_eq!(assigned.service_price, 50.0);

        delete_pending_service(&db, unassigned.id).await?;
        delete_pending_service(&db, assigned.id).await?;
        teardown(&db, cust, offer, emp).await;
        Ok(())
    }

    #[tokio::test]
    async fn assign_forces_in_progress_even_from_delayed() -> anyhow::Result<()> {
        let Some(db) = test_db().await else { return Ok(()) };
        let (cust, veh, offer, emp) = fixture(&db).await?;

        let svc = create_pending_service(
            &db,
            NewPendingService {
                vehicle_id: veh,
                service_type_id: offer,
                employee_id: None,
                entry_time: None,
                estimated_completion_time: None,
                notes: None,
            },
        )
        .await?;

        let delayed = update_pending_service(
            &db,
            svc.id,
            UpdatePendingService { status: Some("delayed".into()), ..Default::default() },
        )
        .await?
        .updated()
        .unwrap();
        assert_eq!(delayed.status, "delayed");

        let assigned = assign_to_employee(&db, svc.id, emp).await?;
        assert_eq!(assigned.status, "in-progress");

        let done = mark_complete(&db, svc.id).await?;
        assert_eq!(done.status, "completed");

        // bogus literal is rejected before touching the row
        let err = update_pending_service(
            &db,
            svc.id,
            UpdatePendingService { status: Some("finished".into()), ..Default::default() },
        )
        .await;
        assert!(err.is_err());

        delete_pending_service(&db, svc.id).await?;
        teardown(&db, cust, offer, emp).await;
        Ok(())
    }

    #[tokio::test]
    async fn empty_update_is_a_distinct_outcome() -> anyhow::Result<()> {
        let Some(db) = test_db().await else { return Ok(()) };
        let (cust, veh, offer, emp) = fixture(&db).await?;

        let svc = create_pending_service(
            &db,
            NewPendingService {
                vehicle_id: veh,
                service_type_id: offer,
                employee_id: None,
                entry_time: None,
                estimated_completion_time: None,
                notes: None,
            },
        )
        .await?;

        let outcome = update_pending_service(&db, svc.id, UpdatePendingService::default()).await?;
        assert_eq!(outcome.updated().map(|d| d.id), None);
        // absent row is NotFound, not NothingToUpdate
        let missing = update_pending_service(
            &db,
            -1,
            UpdatePendingService { notes: Some("x".into()), ..Default::default() },
        )
        .await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        delete_pending_service(&db, svc.id).await?;
        teardown(&db, cust, offer, emp).await;
        Ok(())
    }
}
