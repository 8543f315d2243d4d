//! Billed unit of completed work; feeds the revenue aggregates in the
//! dashboard and report queries.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::pending_service;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_id: Option<i32>,
    pub total_cost: f64,
    pub start_date: DateTimeWithTimeZone,
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
