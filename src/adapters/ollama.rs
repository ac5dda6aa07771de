//! Ollama client for Manim code generation.
//!
//! Talks to a locally hosted Ollama instance over its HTTP API,
//! requesting a single non-streamed completion per prompt.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::script;

use super::{GenerationError, ScriptGenerator};

/// Instructional preamble constraining the model to bare runnable code
const SYSTEM_PROMPT: &str = "You are a Python expert specializing in Manim animations. \
Generate only the Python code for a Manim animation based on the user's description. \
The code should be complete and runnable. Always include necessary imports and a Scene class. \
Make sure to use proper Manim syntax and include all required transformations. \
The code should be simple and focused on the requested animation. \
Only return the Python code, no explanations or markdown formatting.";

/// Request body for Ollama's /api/generate endpoint
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

/// Response body from /api/generate (non-streamed)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Client for a local Ollama instance
pub struct OllamaClient {
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client from the resolved configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
            Duration::from_secs(config.generation_timeout_secs),
        )
    }

    /// Create a client targeting a specific Ollama instance
    pub fn new(base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Compose the full prompt sent to the model
    fn compose_prompt(prompt: &str) -> String {
        format!("{SYSTEM_PROMPT}\n\nUser: Create a Manim animation for: {prompt}\n\nAssistant:")
    }
}

#[async_trait]
impl ScriptGenerator for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: Self::compose_prompt(prompt),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout.as_secs())
                } else {
                    GenerationError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Service { status, body });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let raw = payload.response.ok_or_else(|| {
            GenerationError::MalformedResponse("missing 'response' field".to_string())
        })?;

        let code = script::normalize(&raw);
        debug!(model = %self.model, "Generated script:\n{code}");

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OllamaClient::new(
            "http://localhost:11434/".to_string(),
            "codellama".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.name(), "ollama");
    }

    #[test]
    fn test_compose_prompt_embeds_user_text() {
        let prompt = OllamaClient::compose_prompt("a spinning cube");
        assert!(prompt.contains("a spinning cube"));
        assert!(prompt.starts_with("You are a Python expert"));
        assert!(prompt.ends_with("Assistant:"));
    }
}
