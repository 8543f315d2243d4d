//! Parts and consumables stock, plus the usage ledger.
//!
//! Recording usage is the one multi-statement write in the system: the
//! conditional decrement and the ledger insert run in a single transaction,
//! and the decrement itself carries the stock check (`quantity >= n`) so two
//! concurrent withdrawals can never drive the count negative.
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, Statement,
    TransactionTrait,
};
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};

use models::inventory_item::{self, Entity as ItemEntity};
use models::inventory_usage::{self, Entity as UsageEntity};
use models::{employee, service_offer};

use crate::{contains_ci, errors::ServiceError, UpdateOutcome};

#[derive(Debug, Clone, Deserialize)]
pub struct NewInventoryItem {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub quantity: i32,
    pub unit: String,
    pub cost_price: f64,
    pub selling_price: f64,
    pub reorder_level: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInventoryItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    pub cost_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub reorder_level: Option<i32>,
}

impl UpdateInventoryItem {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.cost_price.is_none()
            && self.selling_price.is_none()
            && self.reorder_level.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUsage {
    pub item_id: i32,
    pub service_id: Option<i32>,
    pub quantity: i32,
    pub employee_id: Option<i32>,
    pub notes: Option<String>,
}

/// Usage ledger row joined with the names behind its foreign keys.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct UsageDetail {
    pub id: i32,
    pub item_id: i32,
    pub service_id: Option<i32>,
    pub quantity: i32,
    pub employee_id: Option<i32>,
    pub usage_date: sea_orm::prelude::DateTimeWithTimeZone,
    pub notes: Option<String>,
    pub item_name: String,
    pub item_unit: String,
    pub service_name: Option<String>,
    pub employee_name: Option<String>,
}

pub async fn list_items(db: &DatabaseConnection) -> Result<Vec<inventory_item::Model>, ServiceError> {
    ItemEntity::find()
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_item(db: &DatabaseConnection, id: i32) -> Result<Option<inventory_item::Model>, ServiceError> {
    ItemEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn search_items(db: &DatabaseConnection, term: &str) -> Result<Vec<inventory_item::Model>, ServiceError> {
    ItemEntity::find()
        .filter(
            Condition::any()
                .add(contains_ci(inventory_item::Column::Name, term))
                .add(contains_ci(inventory_item::Column::Category, term))
                .add(contains_ci(inventory_item::Column::Description, term)),
        )
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_items_by_category(
    db: &DatabaseConnection,
    category: &str,
) -> Result<Vec<inventory_item::Model>, ServiceError> {
    ItemEntity::find()
        .filter(inventory_item::Column::Category.eq(category))
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Items at or below their reorder level, worst ratio first.
pub async fn low_stock_items(db: &DatabaseConnection) -> Result<Vec<inventory_item::Model>, ServiceError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        SELECT * FROM inventory
        WHERE quantity <= reorder_level
        ORDER BY quantity::float8 / NULLIF(reorder_level, 0) ASC NULLS FIRST, name ASC
        "#,
        [],
    );
    inventory_item::Model::find_by_statement(stmt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

#[derive(Debug, FromQueryResult)]
struct CategoryRow {
    category: String,
}

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<String>, ServiceError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT DISTINCT category FROM inventory ORDER BY category ASC",
        [],
    );
    let rows = CategoryRow::find_by_statement(stmt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows.into_iter().map(|r| r.category).collect())
}

pub async fn create_item(
    db: &DatabaseConnection,
    input: NewInventoryItem,
) -> Result<inventory_item::Model, ServiceError> {
    let now = Utc::now();
    let am = inventory_item::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        category: Set(input.category),
        quantity: Set(input.quantity),
        unit: Set(input.unit),
        cost_price: Set(input.cost_price),
        selling_price: Set(input.selling_price),
        reorder_level: Set(input.reorder_level),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_item(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateInventoryItem,
) -> Result<UpdateOutcome<inventory_item::Model>, ServiceError> {
    if input.is_empty() {
        return Ok(UpdateOutcome::NothingToUpdate);
    }
    let existing = ItemEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("inventory item"))?;
    let mut am: inventory_item::ActiveModel = existing.into();
    if let Some(v) = input.name {
        am.name = Set(v);
    }
    if let Some(v) = input.description {
        am.description = Set(Some(v));
    }
    if let Some(v) = input.category {
        am.category = Set(v);
    }
    if let Some(v) = input.quantity {
        am.quantity = Set(v);
    }
    if let Some(v) = input.unit {
        am.unit = Set(v);
    }
    if let Some(v) = input.cost_price {
        am.cost_price = Set(v);
    }
    if let Some(v) = input.selling_price {
        am.selling_price = Set(v);
    }
    if let Some(v) = input.reorder_level {
        am.reorder_level = Set(v);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(UpdateOutcome::Updated(updated))
}

/// Signed stock adjustment (restock or correction). A negative delta uses
/// the same conditional-update guard as usage so the count cannot go below
/// zero under concurrency.
pub async fn adjust_quantity(
    db: &DatabaseConnection,
    id: i32,
    delta: i32,
) -> Result<inventory_item::Model, ServiceError> {
    let mut update = ItemEntity::update_many()
        .col_expr(
            inventory_item::Column::Quantity,
            Expr::col(inventory_item::Column::Quantity).add(delta),
        )
        .col_expr(
            inventory_item::Column::UpdatedAt,
            Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
        )
        .filter(inventory_item::Column::Id.eq(id));
    if delta < 0 {
        update = update.filter(inventory_item::Column::Quantity.gte(-delta));
    }
    let res = update.exec(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return match get_item(db, id).await? {
            None => Err(ServiceError::not_found("inventory item")),
            Some(item) => Err(ServiceError::InsufficientStock { current_stock: item.quantity }),
        };
    }
    get_item(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("inventory item"))
}

pub async fn delete_item(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = ItemEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

/// Withdraw stock and write the ledger row, atomically.
///
/// The decrement is conditional on `quantity >= n`; when that hits zero rows
/// the caller learns whether the item was missing or merely short, with the
/// current count in the latter case.
pub async fn record_usage(db: &DatabaseConnection, input: NewUsage) -> Result<UsageDetail, ServiceError> {
    if input.quantity <= 0 {
        return Err(ServiceError::Validation("usage quantity must be positive".into()));
    }
    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;

    let res = ItemEntity::update_many()
        .col_expr(
            inventory_item::Column::Quantity,
            Expr::col(inventory_item::Column::Quantity).sub(input.quantity),
        )
        .col_expr(
            inventory_item::Column::UpdatedAt,
            Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
        )
        .filter(inventory_item::Column::Id.eq(input.item_id))
        .filter(inventory_item::Column::Quantity.gte(input.quantity))
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    if res.rows_affected == 0 {
        let current = ItemEntity::find_by_id(input.item_id)
            .one(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        txn.rollback().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        return match current {
            None => Err(ServiceError::not_found("inventory item")),
            Some(item) => Err(ServiceError::InsufficientStock { current_stock: item.quantity }),
        };
    }

    let now = Utc::now();
    let usage = inventory_usage::ActiveModel {
        item_id: Set(input.item_id),
        service_id: Set(input.service_id),
        quantity: Set(input.quantity),
        employee_id: Set(input.employee_id),
        usage_date: Set(now.into()),
        notes: Set(input.notes),
        created_at: Set(now.into()),
        ..Default::default()
    };
    let inserted = usage.insert(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;

    usage_detail(db, inserted.id)
        .await?
        .ok_or_else(|| ServiceError::Db("usage row vanished after insert".into()))
}

fn usage_select() -> sea_orm::Select<UsageEntity> {
    UsageEntity::find()
        .join(JoinType::InnerJoin, inventory_usage::Relation::Item.def())
        .join(JoinType::LeftJoin, inventory_usage::Relation::ServiceOffer.def())
        .join(JoinType::LeftJoin, inventory_usage::Relation::Employee.def())
        .column_as(inventory_item::Column::Name, "item_name")
        .column_as(inventory_item::Column::Unit, "item_unit")
        .column_as(service_offer::Column::Name, "service_name")
        .column_as(employee::Column::Name, "employee_name")
}

async fn usage_detail(db: &DatabaseConnection, id: i32) -> Result<Option<UsageDetail>, ServiceError> {
    usage_select()
        .filter(inventory_usage::Column::Id.eq(id))
        .into_model::<UsageDetail>()
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn list_usage(db: &DatabaseConnection, limit: Option<u64>) -> Result<Vec<UsageDetail>, ServiceError> {
    let mut q = usage_select().order_by_desc(inventory_usage::Column::UsageDate);
    if let Some(limit) = limit {
        q = q.limit(limit);
    }
    q.into_model::<UsageDetail>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn usage_for_item(db: &DatabaseConnection, item_id: i32) -> Result<Vec<UsageDetail>, ServiceError> {
    usage_select()
        .filter(inventory_usage::Column::ItemId.eq(item_id))
        .order_by_desc(inventory_usage::Column::UsageDate)
        .into_model::<UsageDetail>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}
