//! Workflow entity joining a vehicle, a service offer, and optionally an
//! assigned employee. Status is one of four literals; transitions between
//! them are not restricted beyond literal membership.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{employee, service_offer, vehicle};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_DELAYED: &str = "delayed";

pub const STATUSES: [&str; 4] = [
    STATUS_PENDING,
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_DELAYED,
];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vehicle_id: i32,
    pub service_type_id: i32,
    pub employee_id: Option<i32>,
    pub entry_time: DateTimeWithTimeZone,
    pub estimated_completion_time: DateTimeWithTimeZone,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Vehicle,
    ServiceOffer,
    Employee,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Vehicle => Entity::belongs_to(vehicle::Entity)
                .from(Column::VehicleId)
                .to(vehicle::Column::Id)
                .into(),
            Relation::ServiceOffer => Entity::belongs_to(service_offer::Entity)
                .from(Column::ServiceTypeId)
                .to(service_offer::Column::Id)
                .into(),
            Relation::Employee => Entity::belongs_to(employee::Entity)
                .from(Column::EmployeeId)
                .to(employee::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_status(s: &str) -> Result<(), ModelError> {
    if !STATUSES.contains(&s) {
        return Err(ModelError::Validation(format!(
            "invalid service status '{s}' (expected one of {STATUSES:?})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_literals() {
        for s in STATUSES {
            assert!(validate_status(s).is_ok());
        }
        assert!(validate_status("done").is_err());
        assert!(validate_status("").is_err());
        assert!(validate_status("In-Progress").is_err());
    }
}
