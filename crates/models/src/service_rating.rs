use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::pending_service;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_id: i32,
    pub wait_time_rating: i32,
    pub staff_friendliness_rating: i32,
    pub service_quality_rating: i32,
    pub customer_comment: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Service,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(pending_service::Entity)
                .from(Column::ServiceId)
                .to(pending_service::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Each rating dimension must be an integer in 1..=5.
pub fn validate_score(name: &str, value: i32) -> Result<(), ModelError> {
    if !(1..=5).contains(&value) {
        return Err(ModelError::Validation(format!(
            "{name} must be between 1 and 5 (got {value})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bounds() {
        assert!(validate_score("wait_time_rating", 1).is_ok());
        assert!(validate_score("wait_time_rating", 5).is_ok());
        assert!(validate_score("wait_time_rating", 0).is_err());
        assert!(validate_score("wait_time_rating", 6).is_err());
        assert!(validate_score("wait_time_rating", -3).is_err());
    }
}
