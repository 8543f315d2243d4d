use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use service::customers::{self, NewCustomer, UpdateCustomer};
use service::UpdateOutcome;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Create body with everything optional so missing fields produce our 400
/// instead of a rejection from the JSON extractor.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search/:term", get(search))
        .route("/:id", get(get_one).put(update).delete(delete_one))
        .route("/:id/vehicles", get(with_vehicles))
}

async fn list(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = customers::list_customers(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match customers::get_customer(&state.db, id).await? {
        Some(c) => Ok(Json(json!(c))),
        None => Err(JsonApiError::not_found("Customer not found")),
    }
}

async fn with_vehicles(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match customers::get_customer_with_vehicles(&state.db, id).await? {
        Some(c) => Ok(Json(json!(c))),
        None => Err(JsonApiError::not_found("Customer not found")),
    }
}

async fn search(
    State(state): State<ServerState>,
    Path(term): Path<String>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = customers::search_customers(&state.db, &term).await?;
    Ok(Json(json!(rows)))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CreateCustomerBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    let (Some(name), Some(phone)) = (body.name, body.phone) else {
        return Err(JsonApiError::bad_request("Missing required fields (name, phone)"));
    };
    let created = customers::create_customer(
        &state.db,
        NewCustomer { name, phone, email: body.email, address: body.address },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(created))))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateCustomer>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match customers::update_customer(&state.db, id, body).await? {
        UpdateOutcome::Updated(c) => Ok(Json(json!(c))),
        UpdateOutcome::NothingToUpdate => Err(JsonApiError::bad_request("No fields to update")),
    }
}

async fn delete_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    if customers::delete_customer(&state.db, id).await? {
        Ok(Json(json!({ "message": "Customer deleted" })))
    } else {
        Err(JsonApiError::not_found("Customer not found"))
    }
}
