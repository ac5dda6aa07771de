//! Shared application state.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::adapters::{OllamaClient, ScriptGenerator};
use crate::config::Config;
use crate::render::{ManimRenderer, SceneRenderer};

/// Shared state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`. The render semaphore
/// bounds how many manim subprocesses run at once so a burst of slow
/// renders cannot exhaust the host.
#[derive(Clone)]
pub struct AppState {
    /// Resolved configuration
    pub config: Arc<Config>,
    /// Code generation backend
    pub generator: Arc<dyn ScriptGenerator>,
    /// Render backend
    pub renderer: Arc<dyn SceneRenderer>,
    /// Permits for concurrent renders
    pub render_permits: Arc<Semaphore>,
}

impl AppState {
    /// Build production state wired to Ollama and the manim CLI
    pub fn new(config: Config) -> Self {
        let generator = Arc::new(OllamaClient::from_config(&config));
        let renderer = Arc::new(ManimRenderer::from_config(&config));
        Self::with_components(config, generator, renderer)
    }

    /// Build state with explicit components (used by tests to inject stubs)
    pub fn with_components(
        config: Config,
        generator: Arc<dyn ScriptGenerator>,
        renderer: Arc<dyn SceneRenderer>,
    ) -> Self {
        let render_permits = Arc::new(Semaphore::new(config.max_concurrent_renders.max(1)));
        Self {
            config: Arc::new(config),
            generator,
            renderer,
            render_permits,
        }
    }
}
