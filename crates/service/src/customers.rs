use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use models::customer::{self, Entity as CustomerEntity};
use models::vehicle;

use crate::{contains_ci, errors::ServiceError, UpdateOutcome};

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UpdateCustomer {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.address.is_none()
    }
}

/// Customer with its vehicles embedded, for the `/:id/vehicles` view.
#[derive(Debug, Serialize)]
pub struct CustomerWithVehicles {
    #[serde(flatten)]
    pub customer: customer::Model,
    pub vehicles: Vec<vehicle::Model>,
}

pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>, ServiceError> {
    CustomerEntity::find()
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_customer(db: &DatabaseConnection, id: i32) -> Result<Option<customer::Model>, ServiceError> {
    CustomerEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Case-insensitive substring search over name, email and phone.
pub async fn search_customers(db: &DatabaseConnection, term: &str) -> Result<Vec<customer::Model>, ServiceError> {
    CustomerEntity::find()
        .filter(
            Condition::any()
                .add(contains_ci((customer::Entity, customer::Column::Name), term))
                .add(contains_ci((customer::Entity, customer::Column::Email), term))
                .add(contains_ci((customer::Entity, customer::Column::Phone), term)),
        )
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn create_customer(db: &DatabaseConnection, input: NewCustomer) -> Result<customer::Model, ServiceError> {
    let now = Utc::now().into();
    let am = customer::ActiveModel {
        name: Set(input.name),
        email: Set(input.email),
        phone: Set(input.phone),
        address: Set(input.address),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Partial update: only the supplied fields are written; `updated_at` always
/// refreshes. An empty input short-circuits before any database access.
pub async fn update_customer(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateCustomer,
) -> Result<UpdateOutcome<customer::Model>, ServiceError> {
    if input.is_empty() {
        return Ok(UpdateOutcome::NothingToUpdate);
    }
    let existing = CustomerEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("customer"))?;
    let mut am: customer::ActiveModel = existing.into();
    if let Some(v) = input.name {
        am.name = Set(v);
    }
    if let Some(v) = input.email {
        am.email = Set(Some(v));
    }
    if let Some(v) = input.phone {
        am.phone = Set(v);
    }
    if let Some(v) = input.address {
        am.address = Set(Some(v));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(UpdateOutcome::Updated(updated))
}

pub async fn delete_customer(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = CustomerEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

pub async fn get_customer_with_vehicles(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<CustomerWithVehicles>, ServiceError> {
    let Some(cust) = get_customer(db, id).await? else {
        return Ok(None);
    };
    let vehicles = vehicle::Entity::find()
        .filter(vehicle::Column::CustomerId.eq(id))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(Some(CustomerWithVehicles { customer: cust, vehicles }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[test]
    fn empty_update_detection() {
        assert!(UpdateCustomer::default().is_empty());
        let partial = UpdateCustomer { phone: Some("555".into()), ..Default::default() };
        assert!(!partial.is_empty());
    }

    #[tokio::test]
    async fn customer_crud_and_empty_update() -> anyhow::Result<()> {
        let Some(db) = test_db().await else { return Ok(()) };

        let c = create_customer(
            &db,
            NewCustomer {
                name: "Rosa Díaz".into(),
                phone: "555-0110".into(),
                email: None,
                address: None,
            },
        )
        .await?;
        assert_eq!(c.email, None);

        // empty partial leaves the record alone and is not an error
        let outcome = update_customer(&db, c.id, UpdateCustomer::default()).await?;
        assert_eq!(outcome.updated(), None);
        let unchanged = get_customer(&db, c.id).await?.unwrap();
        assert_eq!(unchanged.updated_at, c.updated_at);

        let outcome = update_customer(
            &db,
            c.id,
            UpdateCustomer { address: Some("12 Elm St".into()), ..Default::default() },
        )
        .await?;
        let updated = outcome.updated().unwrap();
        assert_eq!(updated.address.as_deref(), Some("12 Elm St"));
        assert_eq!(updated.name, "Rosa Díaz");

        let found = search_customers(&db, "rosa").await?;
        assert!(found.iter().any(|m| m.id == c.id));

        assert!(delete_customer(&db, c.id).await?);
        assert!(get_customer(&db, c.id).await?.is_none());
        // absent id reads as None, never an error
        assert!(get_customer(&db, c.id).await?.is_none());
        Ok(())
    }
}
