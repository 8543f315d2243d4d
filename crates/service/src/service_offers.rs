use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};

use models::service_category::{self, Entity as CategoryEntity};
use models::service_offer::{self, Entity as ServiceOfferEntity};

use crate::{errors::ServiceError, UpdateOutcome};

#[derive(Debug, Clone)]
pub struct NewServiceOffer {
    pub name: String,
    pub description: Option<String>,
    pub base_price: f64,
    pub estimated_hours: Option<f64>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateServiceOffer {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
    pub estimated_hours: Option<f64>,
    pub category_id: Option<i32>,
}

impl UpdateServiceOffer {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.base_price.is_none()
            && self.estimated_hours.is_none()
            && self.category_id.is_none()
    }
}

/// Service offer with its category name left-joined.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ServiceOfferWithCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub base_price: f64,
    pub estimated_hours: Option<f64>,
    pub category_id: Option<i32>,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub updated_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub category_name: Option<String>,
}

fn with_category() -> sea_orm::Select<ServiceOfferEntity> {
    ServiceOfferEntity::find()
        .join(JoinType::LeftJoin, service_offer::Relation::Category.def())
        .column_as(service_category::Column::Name, "category_name")
}

pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<ServiceOfferWithCategory>, ServiceError> {
    with_category()
        .order_by_asc(service_offer::Column::Name)
        .into_model::<ServiceOfferWithCategory>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_service(db: &DatabaseConnection, id: i32) -> Result<Option<ServiceOfferWithCategory>, ServiceError> {
    with_category()
        .filter(service_offer::Column::Id.eq(id))
        .into_model::<ServiceOfferWithCategory>()
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_services_by_category(
    db: &DatabaseConnection,
    category_id: i32,
) -> Result<Vec<ServiceOfferWithCategory>, ServiceError> {
    with_category()
        .filter(service_offer::Column::CategoryId.eq(category_id))
        .order_by_asc(service_offer::Column::Name)
        .into_model::<ServiceOfferWithCategory>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn create_service(db: &DatabaseConnection, input: NewServiceOffer) -> Result<service_offer::Model, ServiceError> {
    let now = Utc::now().into();
    let am = service_offer::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        base_price: Set(input.base_price),
        estimated_hours: Set(input.estimated_hours),
        category_id: Set(input.category_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_service(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateServiceOffer,
) -> Result<UpdateOutcome<service_offer::Model>, ServiceError> {
    if input.is_empty() {
        return Ok(UpdateOutcome::NothingToUpdate);
    }
    let existing = ServiceOfferEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("service"))?;
    let mut am: service_offer::ActiveModel = existing.into();
    if let Some(v) = input.name {
        am.name = Set(v);
    }
    if let Some(v) = input.description {
        am.description = Set(Some(v));
    }
    if let Some(v) = input.base_price {
        am.base_price = Set(v);
    }
    if let Some(v) = input.estimated_hours {
        am.estimated_hours = Set(Some(v));
    }
    if let Some(v) = input.category_id {
        am.category_id = Set(Some(v));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(UpdateOutcome::Updated(updated))
}

pub async fn delete_service(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = ServiceOfferEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<service_category::Model>, ServiceError> {
    CategoryEntity::find()
        .order_by_asc(service_category::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn create_category(
    db: &DatabaseConnection,
    name: String,
    description: Option<String>,
) -> Result<service_category::Model, ServiceError> {
    let am = service_category::ActiveModel {
        name: Set(name),
        description: Set(description),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn category_join_is_optional() -> anyhow::Result<()> {
        let Some(db) = test_db().await else { return Ok(()) };

        let uncategorized = create_service(
            &db,
            NewServiceOffer {
                name: "Hand wash".into(),
                description: None,
                base_price: 15.0,
                estimated_hours: None,
                category_id: None,
            },
        )
        .await?;
        let got = get_service(&db, uncategorized.id).await?.unwrap();
        assert_eq!(got.category_name, None);

        let cat = create_category(&db, "Detailing".into(), None).await?;
        let outcome = update_service(
            &db,
            uncategorized.id,
            UpdateServiceOffer { category_id: Some(cat.id), ..Default::default() },
        )
        .await?;
        assert!(outcome.updated().is_some());
        let got = get_service(&db, uncategorized.id).await?.unwrap();
        assert_eq!(got.category_name.as_deref(), Some("Detailing"));

        delete_service(&db, uncategorized.id).await?;
        service_category::Entity::delete_by_id(cat.id).exec(&db).await?;
        Ok(())
    }
}
