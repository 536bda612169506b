//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::OrderError;
use lifecycle::LifecycleError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Lifecycle operation error.
    Lifecycle(LifecycleError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Lifecycle(err) => lifecycle_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn lifecycle_error_to_response(err: LifecycleError) -> (StatusCode, String) {
    match &err {
        LifecycleError::OrderNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        LifecycleError::ProductNotFound(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        LifecycleError::InsufficientStock { .. } => (StatusCode::CONFLICT, err.to_string()),
        LifecycleError::InventoryUnavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        LifecycleError::ReconciliationFailed { .. } => {
            // Already logged at the service layer; the 500 tells the
            // caller the order did change even though stock did not.
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        LifecycleError::Order(order_err) => match order_err {
            OrderError::InvalidTransition { .. } | OrderError::ImmutableOrder { .. } => {
                (StatusCode::CONFLICT, err.to_string())
            }
            OrderError::UnknownStatus(_)
            | OrderError::EmptyOrder
            | OrderError::NegativePrice { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        },
        LifecycleError::Store(store_err) => {
            tracing::error!(error = %store_err, "order store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        ApiError::Lifecycle(err)
    }
}
