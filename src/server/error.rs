use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid submission data: {0}")]
    InvalidSubmission(String),

    #[error("access denied")]
    AccessDenied,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidSubmission { .. } => StatusCode::BAD_REQUEST,
            ApiError::AccessDenied => StatusCode::UNAUTHORIZED,
        };

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
