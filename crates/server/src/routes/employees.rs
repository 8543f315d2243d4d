use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use service::employees::{self, NewEmployee, UpdateEmployee};
use service::UpdateOutcome;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeBody {
    pub name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<chrono::NaiveDate>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: Option<String>,
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search/:term", get(search))
        .route("/:id", get(get_one).put(update).delete(delete_one))
        .route("/:id/status", patch(change_status))
}

async fn list(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = employees::list_employees(&state.db).await?;
    Ok(Json(json!(rows)))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match employees::get_employee(&state.db, id).await? {
        Some(e) => Ok(Json(json!(e))),
        None => Err(JsonApiError::not_found("Employee not found")),
    }
}

async fn search(
    State(state): State<ServerState>,
    Path(term): Path<String>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = employees::search_employees(&state.db, &term).await?;
    Ok(Json(json!(rows)))
}

async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CreateEmployeeBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    let (Some(name), Some(position), Some(hire_date)) = (body.name, body.position, body.hire_date)
    else {
        return Err(JsonApiError::bad_request(
            "Missing required fields (name, position, hire_date)",
        ));
    };
    let created = employees::create_employee(
        &state.db,
        NewEmployee {
            name,
            position,
            email: body.email,
            phone: body.phone,
            hire_date,
            status: body.status.unwrap_or_else(|| "active".to_string()),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(created))))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateEmployee>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match employees::update_employee(&state.db, id, body).await? {
        UpdateOutcome::Updated(e) => Ok(Json(json!(e))),
        UpdateOutcome::NothingToUpdate => Err(JsonApiError::bad_request("No fields to update")),
    }
}

async fn change_status(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let Some(status) = body.status else {
        return Err(JsonApiError::bad_request("Missing required fields (status)"));
    };
    let updated = employees::change_employee_status(&state.db, id, &status).await?;
    Ok(Json(json!(updated)))
}

async fn delete_one(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    if employees::delete_employee(&state.db, id).await? {
        Ok(Json(json!({ "message": "Employee deleted" })))
    } else {
        Err(JsonApiError::not_found("Employee not found"))
    }
}
