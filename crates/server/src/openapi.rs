use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RatingRequest {
    pub wait_time_rating: i32,
    pub staff_friendliness_rating: i32,
    pub service_quality_rating: i32,
    pub customer_comment: Option<String>,
    pub token: Option<String>,
}

#[derive(ToSchema)]
pub struct RatingLinkResponse {
    pub rating_link: String,
    pub rating_url: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::ratings::rate_service,
        crate::routes::ratings::report,
        crate::routes::ratings::generate_link,
        crate::routes::ratings::validate_link,
    ),
    components(schemas(HealthResponse, RatingRequest, RatingLinkResponse)),
    tags(
        (name = "health"),
        (name = "ratings")
    )
)]
pub struct ApiDoc;
