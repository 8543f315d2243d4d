//! One stock withdrawal. Inserting a row and decrementing the item's
//! quantity happen inside the same transaction (see the inventory service).
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{employee, inventory_item, service_offer};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_usage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub service_id: Option<i32>,
    pub quantity: i32,
    pub employee_id: Option<i32>,
    pub usage_date: DateTimeWithTimeZone,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Item,
    ServiceOffer,
    Employee,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Item => Entity::belongs_to(inventory_item::Entity)
                .from(Column::ItemId)
                .to(inventory_item::Column::Id)
                .into(),
            Relation::ServiceOffer => Entity::belongs_to(service_offer::Entity)
                .from(Column::ServiceId)
                .to(service_offer::Column::Id)
                .into(),
            Relation::Employee => Entity::belongs_to(employee::Entity)
                .from(Column::EmployeeId)
                .to(employee::Column::Id)
                .into(),
        }
    }
}

impl Related<inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
