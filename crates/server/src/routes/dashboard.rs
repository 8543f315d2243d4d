use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;

use service::{dashboard, reports};

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Mounted at `/api/dashboard`.
pub fn dashboard_router() -> Router<ServerState> {
    Router::new().route("/stats", get(stats))
}

/// Mounted at `/api/reports`.
pub fn reports_router() -> Router<ServerState> {
    Router::new().route("/", get(all_reports))
}

async fn stats(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, JsonApiError> {
    let stats = dashboard::dashboard_stats(&state.db).await?;
    Ok(Json(json!(stats)))
}

async fn all_reports(
    State(state): State<ServerState>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let reports = reports::build_reports(&state.db).await?;
    Ok(Json(json!(reports)))
}
