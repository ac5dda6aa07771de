//! HTTP handlers for the animation pipeline.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::runtime::RuntimeCheck;

/// Body of `POST /generate`
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Success body of `POST /generate`
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// The normalized script that was rendered
    pub code: String,
    /// URL path the video can be fetched from
    pub video_path: String,
}

/// POST /generate -- prompt to rendered video, synchronously.
///
/// The request blocks for the full generate-and-render duration; renders
/// are additionally gated by the concurrency semaphore.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    // Bodies that fail to parse get the documented JSON shape, not a
    // plain-text rejection
    let Json(request) = payload.map_err(|_| ApiError::EmptyPrompt)?;

    let prompt = request
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(ApiError::EmptyPrompt)?;

    info!(prompt, "Generating animation");

    let code = state.generator.generate(prompt).await?;

    let _permit = state
        .render_permits
        .acquire()
        .await
        .map_err(|_| ApiError::Internal("render pool closed".to_string()))?;

    let artifact = state.renderer.render(&code).await?;

    Ok(Json(GenerateResponse {
        success: true,
        code,
        video_path: format!("/video/{}", artifact.file_name),
    }))
}

/// GET /video/{filename} -- stream a previously published video.
///
/// Only plain basenames are accepted; anything that could escape the
/// serving directory is treated as not found.
pub async fn serve_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    if !is_plain_filename(&filename) {
        return Err(ApiError::VideoNotFound);
    }

    let path = state.config.media_dir.join(&filename);
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ApiError::VideoNotFound)?;

    let metadata = file
        .metadata()
        .await
        .map_err(|_| ApiError::VideoNotFound)?;
    if !metadata.is_file() {
        return Err(ApiError::VideoNotFound);
    }

    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .header(header::CONTENT_LENGTH, metadata.len())
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Health check response payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Point-in-time availability of the manim/ffmpeg toolchain
    pub renderer_ready: bool,
}

/// GET /health -- service liveness plus toolchain availability
pub async fn health(State(_state): State<AppState>) -> Json<HealthResponse> {
    let renderer_ready = RuntimeCheck::probe().available();

    Json(HealthResponse {
        status: if renderer_ready { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        renderer_ready,
    })
}

/// Reject names with path separators or parent components
fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && name != "."
        && name != ".."
}

/// Guess a Content-Type from a file extension
fn content_type_for(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_filename_validation() {
        assert!(is_plain_filename("video.mp4"));
        assert!(is_plain_filename("550e8400-e29b.mp4"));

        assert!(!is_plain_filename(""));
        assert!(!is_plain_filename(".."));
        assert!(!is_plain_filename("../etc/passwd"));
        assert!(!is_plain_filename("sub/video.mp4"));
        assert!(!is_plain_filename("..\\video.mp4"));
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(content_type_for("a.mp4"), "video/mp4");
        assert_eq!(content_type_for("a.webm"), "video/webm");
        assert_eq!(content_type_for("a.MOV"), "video/quicktime");
        assert_eq!(content_type_for("a"), "application/octet-stream");
    }
}
