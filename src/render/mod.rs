//! Render orchestration.
//!
//! This module contains:
//! - Workspace: disposable per-render directory handling
//! - Manim: subprocess invocation and artifact publishing

pub mod manim;
pub mod workspace;

pub use manim::{ManimRenderer, RenderError, RenderedArtifact, SceneRenderer};
pub use workspace::RenderWorkspace;
