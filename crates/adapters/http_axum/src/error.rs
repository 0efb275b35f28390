//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use relayhub_domain::error::RelayHubError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`RelayHubError`] to an HTTP response with appropriate status code.
pub struct ApiError(RelayHubError);

impl From<RelayHubError> for ApiError {
    fn from(err: RelayHubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RelayHubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            RelayHubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            RelayHubError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            RelayHubError::Notification(err) => {
                tracing::error!(error = %err, "notification error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
