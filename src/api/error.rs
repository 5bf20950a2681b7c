use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use sowgate_core::Error as CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            Self::Core(err) => match err {
                CoreError::InvalidStatus { .. } => (StatusCode::CONFLICT, err.to_string()),
                CoreError::InsufficientAuthority { .. } => {
                    (StatusCode::FORBIDDEN, err.to_string())
                }
                CoreError::SowNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                CoreError::InvalidInput(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                _ => {
                    tracing::error!(error = %err, "internal error");
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
                }
            },
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
