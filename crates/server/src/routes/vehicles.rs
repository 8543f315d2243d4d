use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use service::vehicles::{self, NewVehicle, UpdateVehicle};
use service::UpdateOutcome;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct CreateVehicleBody {
    pub customer_id: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub color: Option<String>,
    pub last_service_date: Option<chrono::NaiveDate>,
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search/:term", get(search))
        .route("/customer/:customer_id", get(by_customer))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

async fn list(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = vehicles::list_vehicles(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match vehicles::get_vehicle(&state.db, id).await? {
        Some(v) => Ok(Json(json!(v))),
        None => Err(JsonApiError::not_found("Vehicle not found")),
    }
}

async fn by_customer(
    State(state): State<ServerState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = vehicles::get_vehicles_by_customer(&state.db, customer_id).await?;
    Ok(Json(json!(rows)))
}

async fn search(
    State(state): State<ServerState>,
    Path(term): Path<String>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = vehicles::search_vehicles(&state.db, &term).await?;
    Ok(Json(json!(rows)))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CreateVehicleBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    let (Some(customer_id), Some(make), Some(model), Some(year), Some(license_plate)) =
        (body.customer_id, body.make, body.model, body.year, body.license_plate)
    else {
        return Err(JsonApiError::bad_request(
            "Missing required fields (customer_id, make, model, year, license_plate)",
        ));
    };
    let created = vehicles::create_vehicle(
        &state.db,
        NewVehicle {
            customer_id,
            make,
            model,
            year,
            license_plate,
            vin: body.vin,
            color: body.color,
            last_service_date: body.last_service_date,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(created))))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateVehicle>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match vehicles::update_vehicle(&state.db, id, body).await? {
        UpdateOutcome::Updated(v) => Ok(Json(json!(v))),
        UpdateOutcome::NothingToUpdate => Err(JsonApiError::bad_request("No fields to update")),
    }
}

async fn delete_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    if vehicles::delete_vehicle(&state.db, id).await? {
        Ok(Json(json!({ "message": "Vehicle deleted" })))
    } else {
        Err(JsonApiError::not_found("Vehicle not found"))
    }
}
