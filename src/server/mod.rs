//! HTTP server surface.
//!
//! [`build_router`] assembles the full application router with its
//! middleware stack so the binary and the integration tests run the
//! exact same thing.

pub mod error;
pub mod handlers;
pub mod state;

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Build the application router with all middleware layers.
///
/// The request timeout must comfortably exceed the generation and render
/// timeouts, which it does with the default configuration; it exists to
/// bound everything else.
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/video/{filename}", get(handlers::serve_video))
        .route("/health", get(handlers::health))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // The original UI is served from another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the router until the process is stopped
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "animagen listening");

    let router = build_router(state);
    axum::serve(listener, router).await?;
    Ok(())
}
