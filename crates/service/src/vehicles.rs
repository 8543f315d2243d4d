use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};

use models::customer;
use models::vehicle::{self, Entity as VehicleEntity};

use crate::{contains_ci, errors::ServiceError, UpdateOutcome};

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub customer_id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub vin: Option<String>,
    pub color: Option<String>,
    pub last_service_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVehicle {
    pub customer_id: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub color: Option<String>,
    pub last_service_date: Option<chrono::NaiveDate>,
}

impl UpdateVehicle {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.make.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.license_plate.is_none()
            && self.vin.is_none()
            && self.color.is_none()
            && self.last_service_date.is_none()
    }
}

/// Vehicle row with the owner's name joined in.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct VehicleWithOwner {
    pub id: i32,
    pub customer_id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub vin: Option<String>,
    pub color: Option<String>,
    pub last_service_date: Option<chrono::NaiveDate>,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub updated_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub customer_name: String,
}

fn with_owner() -> sea_orm::Select<VehicleEntity> {
    VehicleEntity::find()
        .join(JoinType::InnerJoin, vehicle::Relation::Customer.def())
        .column_as(customer::Column::Name, "customer_name")
}

pub async fn list_vehicles(db: &DatabaseConnection) -> Result<Vec<VehicleWithOwner>, ServiceError> {
    with_owner()
        .order_by_asc(vehicle::Column::Make)
        .order_by_asc(vehicle::Column::Model)
        .into_model::<VehicleWithOwner>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_vehicle(db: &DatabaseConnection, id: i32) -> Result<Option<VehicleWithOwner>, ServiceError> {
    with_owner()
        .filter(vehicle::Column::Id.eq(id))
        .into_model::<VehicleWithOwner>()
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_vehicles_by_customer(db: &DatabaseConnection, customer_id: i32) -> Result<Vec<vehicle::Model>, ServiceError> {
    VehicleEntity::find()
        .filter(vehicle::Column::CustomerId.eq(customer_id))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Substring search over make, model, plate, VIN and owner name.
pub async fn search_vehicles(db: &DatabaseConnection, term: &str) -> Result<Vec<VehicleWithOwner>, ServiceError> {
    with_owner()
        .filter(
            Condition::any()
                .add(contains_ci((vehicle::Entity, vehicle::Column::Make), term))
                .add(contains_ci((vehicle::Entity, vehicle::Column::Model), term))
                .add(contains_ci((vehicle::Entity, vehicle::Column::LicensePlate), term))
                .add(contains_ci((vehicle::Entity, vehicle::Column::Vin), term))
                .add(contains_ci((customer::Entity, customer::Column::Name), term)),
        )
        .into_model::<VehicleWithOwner>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn create_vehicle(db: &DatabaseConnection, input: NewVehicle) -> Result<vehicle::Model, ServiceError> {
    let now = Utc::now().into();
    let am = vehicle::ActiveModel {
        customer_id: Set(input.customer_id),
        make: Set(input.make),
        model: Set(input.model),
        year: Set(input.year),
        license_plate: Set(input.license_plate),
        vin: Set(input.vin),
        color: Set(input.color),
        last_service_date: Set(input.last_service_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_vehicle(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateVehicle,
) -> Result<UpdateOutcome<vehicle::Model>, ServiceError> {
    if input.is_empty() {
        return Ok(UpdateOutcome::NothingToUpdate);
    }
    let existing = VehicleEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("vehicle"))?;
    let mut am: vehicle::ActiveModel = existing.into();
    if let Some(v) = input.customer_id {
        am.customer_id = Set(v);
    }
    if let Some(v) = input.make {
        am.make = Set(v);
    }
    if let Some(v) = input.model {
        am.model = Set(v);
    }
    if let Some(v) = input.year {
        am.year = Set(v);
    }
    if let Some(v) = input.license_plate {
        am.license_plate = Set(v);
    }
    if let Some(v) = input.vin {
        am.vin = Set(Some(v));
    }
    if let Some(v) = input.color {
        am.color = Set(Some(v));
    }
    if let Some(v) = input.last_service_date {
        am.last_service_date = Set(Some(v));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(UpdateOutcome::Updated(updated))
}

pub async fn delete_vehicle(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = VehicleEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customers::{self, NewCustomer};
    use crate::test_support::test_db;

    #[tokio::test]
    async fn owner_join_and_search() -> anyhow::Result<()> {
        let Some(db) = test_db().await else { return Ok(()) };

        let owner = customers::create_customer(
            &db,
            NewCustomer { name: "Pablo Mena".into(), phone: "555-0120".into(), email: None, address: None },
        )
        .await?;
        let v = create_vehicle(
            &db,
            NewVehicle {
                customer_id: owner.id,
                make: "Mazda".into(),
                model: "3".into(),
                year: 2020,
                license_plate: "QRS-456".into(),
                vin: None,
                color: None,
                last_service_date: None,
            },
        )
        .await?;

        let got = get_vehicle(&db, v.id).await?.unwrap();
        assert_eq!(got.customer_name, "Pablo Mena");

        // found through the owner's name, case-insensitive
        let hits = search_vehicles(&db, "PABLO").await?;
        assert!(hits.iter().any(|m| m.id == v.id));

        customers::delete_customer(&db, owner.id).await?;
        Ok(())
    }
}
