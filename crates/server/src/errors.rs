use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use service::errors::ServiceError;

/// JSON error envelope every handler speaks: `{"error": ..}` plus an
/// optional `currentStock` when a stock check failed.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub current_stock: Option<i32>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), current_stock: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = match self.current_stock {
            Some(stock) => json!({ "error": self.message, "currentStock": stock }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Deterministic mapping from the service layer: validation 400, missing
/// 404, stock shortfall 400 with the count, anything else a logged 500.
impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            ServiceError::Model(m) => Self::bad_request(m.to_string()),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::InsufficientStock { current_stock } => Self {
                status: StatusCode::BAD_REQUEST,
                message: "Not enough stock available".into(),
                current_stock: Some(current_stock),
            },
            ServiceError::Db(detail) => {
                error!(%detail, "database error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_error_carries_the_count() {
        let err: JsonApiError =
            ServiceError::InsufficientStock { current_stock: 4 }.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.current_stock, Some(4));
    }

    #[test]
    fn db_detail_never_reaches_the_body() {
        let err: JsonApiError = ServiceError::Db("password=hunter2".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("hunter2"));
    }
}
