use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod customers;
pub mod dashboard;
pub mod employees;
pub mod inventory;
pub mod pending_services;
pub mod ratings;
pub mod services;
pub mod vehicles;

#[utoipa::path(get, path = "/health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Compose every resource router under `/api`, plus health and the
/// swagger ui.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/customers", customers::router())
        .nest("/api/vehicles", vehicles::router())
        .nest("/api/employees", employees::router())
        .nest("/api/services", services::router())
        .nest("/api/pending-services", pending_services::router())
        .nest("/api/inventory", inventory::router())
        .nest("/api/service-ratings", ratings::ratings_router())
        .nest("/api/service-rating-links", ratings::links_router())
        .nest("/api/dashboard", dashboard::dashboard_router())
        .nest("/api/reports", dashboard::reports_router())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
