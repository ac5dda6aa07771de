//! Application-level error type for HTTP handlers.
//!
//! Implements [`IntoResponse`] to produce the documented JSON error
//! bodies. Generation and render failures both surface as the same
//! 500 shape; a missing rendering toolchain is deliberately not special
//! cased into an uncaught error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::adapters::GenerationError;
use crate::render::RenderError;

/// Errors a handler can return
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body had no usable prompt
    #[error("No prompt provided")]
    EmptyPrompt,

    /// Requested video does not exist in the serving directory
    #[error("Video not found")]
    VideoNotFound,

    /// Code generation failed
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Rendering failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for handler return values
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::EmptyPrompt => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "No prompt provided" }),
            ),
            ApiError::VideoNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Video not found" }),
            ),
            ApiError::Generation(err) => {
                tracing::error!(error = %err, "Code generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": format!("Error generating animation: {err}"),
                    }),
                )
            }
            ApiError::Render(err) => {
                tracing::error!(error = %err, "Render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": format!("Failed to generate animation: {err}"),
                    }),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": "An internal error occurred" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
