use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use service::inventory::{self, NewInventoryItem, NewUsage, UpdateInventoryItem};
use service::UpdateOutcome;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct CreateItemBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    pub cost_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub reorder_level: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UsageBody {
    pub item_id: Option<i32>,
    pub service_id: Option<i32>,
    pub quantity: Option<i32>,
    pub employee_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustmentBody {
    pub adjustment: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UsageListParams {
    pub limit: Option<u64>,
}

pub fn router() -> Router<ServerState> {
    // literal segments before /:id so they are not captured as ids
    Router::new()
        .route("/", get(list).post(create))
        .route("/low-stock", get(low_stock))
        .route("/categories", get(categories))
        .route("/category/:category", get(by_category))
        .route("/search/:term", get(search))
        .route("/usage", get(usage).post(record_usage))
        .route("/:id", get(get_one).put(update).delete(delete_one))
        .route("/:id/usage", get(item_usage))
        .route("/:id/quantity", patch(adjust_quantity))
}

async fn list(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = inventory::list_items(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match inventory::get_item(&state.db, id).await? {
        Some(item) => Ok(Json(json!(item))),
        None => Err(JsonApiError::not_found("Inventory item not found")),
    }
}

async fn search(
    State(state): State<ServerState>,
    Path(term): Path<String>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = inventory::search_items(&state.db, &term).await?;
    Ok(Json(json!(rows)))
}

async fn by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = inventory::get_items_by_category(&state.db, &category).await?;
    Ok(Json(json!(rows)))
}

async fn low_stock(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = inventory::low_stock_items(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn categories(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, JsonApiError> {
    let names = inventory::list_categories(&state.db).await?;
    Ok(Json(json!(names)))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CreateItemBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    let (Some(name), Some(category), Some(quantity), Some(unit), Some(cost_price), Some(selling_price)) = (
        body.name,
        body.category,
        body.quantity,
        body.unit,
        body.cost_price,
        body.selling_price,
    ) else {
        return Err(JsonApiError::bad_request(
            "Missing required fields (name, category, quantity, unit, cost_price, selling_price)",
        ));
    };
    let created = inventory::create_item(
        &state.db,
        NewInventoryItem {
            name,
            description: body.description,
            category,
            quantity,
            unit,
            cost_price,
            selling_price,
            reorder_level: body.reorder_level.unwrap_or(0),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(created))))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateInventoryItem>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match inventory::update_item(&state.db, id, body).await? {
        UpdateOutcome::Updated(item) => Ok(Json(json!(item))),
        UpdateOutcome::NothingToUpdate => Err(JsonApiError::bad_request("No fields to update")),
    }
}

async fn adjust_quantity(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(body): Json<AdjustmentBody>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let Some(adjustment) = body.adjustment else {
        return Err(JsonApiError::bad_request("Missing required fields (adjustment)"));
    };
    let item = inventory::adjust_quantity(&state.db, id, adjustment).await?;
    Ok(Json(json!(item)))
}

async fn record_usage(
    State(state): State<ServerState>,
    Json(body): Json<UsageBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    let (Some(item_id), Some(quantity)) = (body.item_id, body.quantity) else {
        return Err(JsonApiError::bad_request("Missing required fields (item_id, quantity)"));
    };
    let usage = inventory::record_usage(
        &state.db,
        NewUsage {
            item_id,
            service_id: body.service_id,
            quantity,
            employee_id: body.employee_id,
            notes: body.notes,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(usage))))
}

async fn usage(
    State(state): State<ServerState>,
    Query(params): Query<UsageListParams>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = inventory::list_usage(&state.db, params.limit).await?;
    Ok(Json(json!(rows)))
}

async fn item_usage(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = inventory::usage_for_item(&state.db, id).await?;
    Ok(Json(json!(rows)))
}

async fn delete_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    if inventory::delete_item(&state.db, id).await? {
        Ok(Json(json!({ "message": "Inventory item deleted" })))
    } else {
        Err(JsonApiError::not_found("Inventory item not found"))
    }
}
