//! Adapter interfaces for external systems.
//!
//! Adapters wrap the services the pipeline delegates to. Code generation
//! is behind the [`ScriptGenerator`] trait so the HTTP layer can be
//! exercised against a stub implementation in tests.

pub mod ollama;

use async_trait::async_trait;
use thiserror::Error;

pub use ollama::OllamaClient;

/// Errors from the code generation adapter
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Could not reach the generation service at all
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("generation service error ({status}): {body}")]
    Service {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response payload was missing the completion field
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),

    /// The service did not answer within the configured timeout
    #[error("generation timed out after {0}s")]
    Timeout(u64),
}

/// Produces animation script source for a free-text prompt
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Generate a normalized Manim script for the prompt
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
