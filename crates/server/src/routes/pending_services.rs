use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use models::pending_service;
use service::pending_services::{self, NewPendingService, UpdatePendingService};
use service::rating_links;
use service::UpdateOutcome;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct CreatePendingServiceBody {
    pub vehicle_id: Option<i32>,
    pub service_type_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub entry_time: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub estimated_completion_time: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
    pub employee_id: Option<i32>,
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/status/:status", get(by_status))
        .route("/search/:term", get(search))
        .route("/:id", get(get_one).put(update).delete(delete_one))
        .route("/:id/assign", patch(assign))
        .route("/:id/complete", patch(complete))
}

async fn list(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = pending_services::list_pending_services(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match pending_services::get_pending_service(&state.db, id).await? {
        Some(s) => Ok(Json(json!(s))),
        None => Err(JsonApiError::not_found("Pending service not found")),
    }
}

async fn by_status(
    State(state): State<ServerState>,
    Path(status): Path<String>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    pending_service::validate_status(&status).map_err(|e| JsonApiError::bad_request(e.to_string()))?;
    let rows = pending_services::get_services_by_status(&state.db, &status).await?;
    Ok(Json(json!(rows)))
}

async fn search(
    State(state): State<ServerState>,
    Path(term): Path<String>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = pending_services::search_pending_services(&state.db, &term).await?;
    Ok(Json(json!(rows)))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CreatePendingServiceBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    let (Some(vehicle_id), Some(service_type_id)) = (body.vehicle_id, body.service_type_id) else {
        return Err(JsonApiError::bad_request(
            "Missing required fields (vehicle_id, service_type_id)",
        ));
    };
    let created = pending_services::create_pending_service(
        &state.db,
        NewPendingService {
            vehicle_id,
            service_type_id,
            employee_id: body.employee_id,
            entry_time: body.entry_time,
            estimated_completion_time: body.estimated_completion_time,
            notes: body.notes,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(created))))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdatePendingService>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match pending_services::update_pending_service(&state.db, id, body).await? {
        UpdateOutcome::Updated(s) => Ok(Json(json!(s))),
        UpdateOutcome::NothingToUpdate => Err(JsonApiError::bad_request("No fields to update")),
    }
}

async fn assign(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(body): Json<AssignBody>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let Some(employee_id) = body.employee_id else {
        return Err(JsonApiError::bad_request("Missing required fields (employee_id)"));
    };
    let updated = pending_services::assign_to_employee(&state.db, id, employee_id).await?;
    Ok(Json(json!(updated)))
}

/// Completion also issues the customer's rating link and the public url
/// built from the configured frontend base.
async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let updated = pending_services::mark_complete(&state.db, id).await?;
    let link = rating_links::issue_rating_link(&state.db, id).await?;
    let rating_url = format!("{}/rate-service/{}", state.frontend_base_url, link.unique_token);
    Ok(Json(json!({
        "service": updated,
        "ratingLink": link.unique_token,
        "ratingUrl": rating_url,
    })))
}

async fn delete_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    if pending_services::delete_pending_service(&state.db, id).await? {
        Ok(Json(json!({ "message": "Pending service deleted" })))
    } else {
        Err(JsonApiError::not_found("Pending service not found"))
    }
}
