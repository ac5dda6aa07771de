//! animagen - prompt-to-video animation service
//!
//! A thin orchestration layer over three external systems: a local
//! Ollama instance that turns a free-text prompt into Manim scene code,
//! the `manim` CLI that renders the code into a video, and the
//! filesystem directory the videos are served from.
//!
//! # Pipeline
//!
//! Per request: validate prompt → generate script (Ollama) → normalize →
//! render in a disposable workspace (manim subprocess) → publish the
//! video into the serving directory → return its URL.
//!
//! # Modules
//!
//! - `adapters`: External system integrations (Ollama)
//! - `render`: Workspace handling and manim invocation
//! - `script`: Normalization of generated code
//! - `runtime`: Toolchain precondition checks
//! - `server`: axum HTTP surface
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Start the server
//! animagen serve --port 5000
//!
//! # Verify manim and ffmpeg are installed
//! animagen check
//!
//! # Inspect what a prompt generates without rendering
//! animagen generate "a blue circle turning into a red square"
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod render;
pub mod runtime;
pub mod script;
pub mod server;

// Re-export main types at crate root for convenience
pub use adapters::{GenerationError, OllamaClient, ScriptGenerator};
pub use config::Config;
pub use render::{ManimRenderer, RenderError, RenderedArtifact, SceneRenderer};
pub use runtime::RuntimeCheck;
pub use server::{build_router, AppState};
