//! Rating submission plus the tokenized rating-link flow.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use service::rating_links;
use service::ratings::{self, NewRating};

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct RatingBody {
    pub wait_time_rating: Option<i32>,
    pub staff_friendliness_rating: Option<i32>,
    pub service_quality_rating: Option<i32>,
    pub customer_comment: Option<String>,
    pub token: Option<String>,
}

/// Routes mounted at `/api/service-ratings`.
pub fn ratings_router() -> Router<ServerState> {
    Router::new()
        .route("/report", get(report))
        .route("/:service_id", post(rate_service))
        .route("/:service_id/ratings", get(service_ratings))
}

/// Routes mounted at `/api/service-rating-links`.
pub fn links_router() -> Router<ServerState> {
    Router::new()
        .route("/:service_id/generate-link", post(generate_link))
        .route("/validate/:token", get(validate_link))
}

#[utoipa::path(
    post,
    path = "/api/service-ratings/{service_id}",
    params(("service_id" = i32, Path, description = "Pending service id")),
    request_body = crate::openapi::RatingRequest,
    responses(
        (status = 201, description = "Rating stored"),
        (status = 400, description = "Invalid scores, token, or service state"),
        (status = 404, description = "Service not found")
    ),
    tag = "ratings"
)]
pub(crate) async fn rate_service(
    State(state): State<ServerState>,
    Path(service_id): Path<i32>,
    Json(body): Json<RatingBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    let (Some(wait), Some(staff), Some(quality)) = (
        body.wait_time_rating,
        body.staff_friendliness_rating,
        body.service_quality_rating,
    ) else {
        return Err(JsonApiError::bad_request(
            "Missing required fields (wait_time_rating, staff_friendliness_rating, service_quality_rating)",
        ));
    };
    let stored = ratings::submit_rating(
        &state.db,
        NewRating {
            service_id,
            wait_time_rating: wait,
            staff_friendliness_rating: staff,
            service_quality_rating: quality,
            customer_comment: body.customer_comment,
            token: body.token,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(stored))))
}

async fn service_ratings(
    State(state): State<ServerState>,
    Path(service_id): Path<i32>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let rows = ratings::get_ratings_for_service(&state.db, service_id).await?;
    Ok(Json(json!(rows)))
}

#[utoipa::path(
    get,
    path = "/api/service-ratings/report",
    responses((status = 200, description = "Averages of the three dimensions plus total count")),
    tag = "ratings"
)]
pub(crate) async fn report(
    State(state): State<ServerState>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let summary = ratings::rating_summary(&state.db).await?;
    Ok(Json(json!(summary)))
}

#[utoipa::path(
    post,
    path = "/api/service-rating-links/{service_id}/generate-link",
    params(("service_id" = i32, Path, description = "Completed service id")),
    responses(
        (status = 201, body = crate::openapi::RatingLinkResponse),
        (status = 400, description = "Service not completed"),
        (status = 404, description = "Service not found")
    ),
    tag = "ratings"
)]
pub(crate) async fn generate_link(
    State(state): State<ServerState>,
    Path(service_id): Path<i32>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    let link = rating_links::issue_rating_link(&state.db, service_id).await?;
    let rating_url = format!("{}/rate-service/{}", state.frontend_base_url, link.unique_token);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "ratingLink": link.unique_token,
            "ratingUrl": rating_url,
            "expiresAt": link.expires_at,
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/service-rating-links/validate/{token}",
    params(("token" = String, Path, description = "Rating link token")),
    responses(
        (status = 200, description = "Token is valid; includes service context"),
        (status = 404, description = "Unknown, used, or expired token")
    ),
    tag = "ratings"
)]
pub(crate) async fn validate_link(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match rating_links::validate_token(&state.db, &token).await? {
        Some(ctx) => Ok(Json(json!({
            "serviceId": ctx.service_id,
            "vehicleMake": ctx.vehicle_make,
            "vehicleModel": ctx.vehicle_model,
            "licensePlate": ctx.license_plate,
        }))),
        None => Err(JsonApiError::not_found("Invalid or expired rating link")),
    }
}
