use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use service::service_offers::{self, NewServiceOffer, UpdateServiceOffer};
use service::UpdateOutcome;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct CreateServiceBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
    pub estimated_hours: Option<f64>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryBody {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub fn router() -> Router<ServerState> {
    // /categories before /:id so the literal wins
    Router::new()
        .route("/", get(list).post(create))
        .route("/categories", get(list_categories).post(create_category))
        .route("/category/:category_id", get(by_category))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

async fn list(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = service_offers::list_services(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match service_offers::get_service(&state.db, id).await? {
        Some(s) => Ok(Json(json!(s))),
        None => Err(JsonApiError::not_found("Service not found")),
    }
}

async fn by_category(
    State(state): State<ServerState>,
    Path(category_id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = service_offers::get_services_by_category(&state.db, category_id).await?;
    Ok(Json(json!(rows)))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CreateServiceBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    let (Some(name), Some(base_price)) = (body.name, body.base_price) else {
        return Err(JsonApiError::bad_request("Missing required fields (name, base_price)"));
    };
    let created = service_offers::create_service(
        &state.db,
        NewServiceOffer {
            name,
            description: body.description,
            base_price,
            estimated_hours: body.estimated_hours,
            category_id: body.category_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(created))))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateServiceOffer>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match service_offers::update_service(&state.db, id, body).await? {
        UpdateOutcome::Updated(s) => Ok(Json(json!(s))),
        UpdateOutcome::NothingToUpdate => Err(JsonApiError::bad_request("No fields to update")),
    }
}

async fn delete_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    if service_offers::delete_service(&state.db, id).await? {
        Ok(Json(json!({ "message": "Service deleted" })))
    } else {
        Err(JsonApiError::not_found("Service not found"))
    }
}

async fn list_categories(
    State(state): State<ServerState>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = service_offers::list_categories(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn create_category(
    State(state): State<ServerState>,
    Json(body): Json<CreateCategoryBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    let Some(name) = body.name else {
        return Err(JsonApiError::bad_request("Missing required fields (name)"));
    };
    let created = service_offers::create_category(&state.db, name, body.description).await?;
    Ok((StatusCode::CREATED, Json(json!(created))))
}
