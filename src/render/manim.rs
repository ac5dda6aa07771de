//! Manim subprocess orchestration.
//!
//! Writes the generated script into a disposable workspace, runs the
//! `manim` CLI with a timeout, verifies the explicitly named output file,
//! and publishes it into the serving directory. Every failure path is a
//! distinct [`RenderError`] variant so callers and tests can assert on
//! cause instead of a collapsed "nothing came out".

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::runtime::{RuntimeCheck, MANIM_BIN};

use super::workspace::{RenderWorkspace, SCRIPT_FILENAME};

/// Errors from the render orchestrator
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required executable is not on PATH
    #[error("rendering toolchain unavailable: {0} not found on PATH")]
    RuntimeMissing(&'static str),

    /// Workspace creation or script write failed
    #[error("failed to prepare render workspace: {0}")]
    Workspace(#[source] std::io::Error),

    /// The manim process could not be started or awaited
    #[error("failed to run manim: {0}")]
    Spawn(#[source] std::io::Error),

    /// The render did not finish within the configured timeout
    #[error("render timed out after {0}s")]
    Timeout(u64),

    /// Manim exited with a non-zero status
    #[error("manim exited with status {code}: {stderr}")]
    SubprocessFailed { code: i32, stderr: String },

    /// Manim exited successfully but never created its output directory
    #[error("render produced no output directory at {0}")]
    MissingOutputDir(PathBuf),

    /// The output directory exists but holds no video with the expected name
    #[error("render produced no video file")]
    NoOutput,

    /// Copying the video into the serving directory failed
    #[error("failed to publish rendered video: {0}")]
    Publish(#[source] std::io::Error),
}

/// A successfully rendered and published video
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    /// Basename within the serving directory (used in `/video/<name>` URLs)
    pub file_name: String,
    /// Full path of the published file
    pub path: PathBuf,
}

/// Turns a Manim script into a published video file
#[async_trait]
pub trait SceneRenderer: Send + Sync {
    async fn render(&self, script: &str) -> Result<RenderedArtifact, RenderError>;
}

/// Renderer invoking the `manim` CLI as a subprocess
pub struct ManimRenderer {
    media_dir: PathBuf,
    timeout: Duration,
    keep_workspaces: bool,
}

impl ManimRenderer {
    /// Create a renderer from the resolved configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            media_dir: config.media_dir.clone(),
            timeout: Duration::from_secs(config.render_timeout_secs),
            keep_workspaces: config.keep_workspaces,
        }
    }

    /// Run manim on the workspace script, capturing output in full
    async fn run_manim(
        &self,
        workspace: &RenderWorkspace,
        render_id: &str,
    ) -> Result<std::process::Output, RenderError> {
        let mut command = Command::new(MANIM_BIN);
        command
            // Preview quality keeps render times in the seconds range
            .args(["-ql", "-o", render_id, SCRIPT_FILENAME])
            .current_dir(workspace.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A render that outlives the timeout must not keep running
            .kill_on_drop(true);

        let output = timeout(self.timeout, command.output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout.as_secs()))?
            .map_err(RenderError::Spawn)?;

        // Both streams are logged regardless of exit status
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("manim output:\n{stdout}");
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            error!("manim stderr:\n{stderr}");
        }

        Ok(output)
    }

    /// Copy the workspace artifact into the serving directory
    async fn publish(
        &self,
        source: &std::path::Path,
        render_id: &str,
    ) -> Result<RenderedArtifact, RenderError> {
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "mp4".to_string());
        let file_name = format!("{render_id}.{extension}");

        tokio::fs::create_dir_all(&self.media_dir)
            .await
            .map_err(RenderError::Publish)?;

        let destination = self.media_dir.join(&file_name);
        tokio::fs::copy(source, &destination)
            .await
            .map_err(RenderError::Publish)?;

        info!(path = %destination.display(), "Video published");

        Ok(RenderedArtifact {
            file_name,
            path: destination,
        })
    }
}

#[async_trait]
impl SceneRenderer for ManimRenderer {
    async fn render(&self, script: &str) -> Result<RenderedArtifact, RenderError> {
        // Re-checked on every attempt so mid-session environment changes
        // are picked up without a restart
        let check = RuntimeCheck::probe();
        if let Some(name) = check.missing() {
            return Err(RenderError::RuntimeMissing(name));
        }

        let render_id = Uuid::new_v4().to_string();
        let workspace =
            RenderWorkspace::create(self.keep_workspaces).map_err(RenderError::Workspace)?;
        workspace
            .write_script(script)
            .await
            .map_err(RenderError::Workspace)?;

        debug!(%render_id, workspace = %workspace.path().display(), "Rendering script");

        let output = self.run_manim(&workspace, &render_id).await?;

        if !output.status.success() {
            return Err(RenderError::SubprocessFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let output_dir = workspace.output_dir();
        if !output_dir.is_dir() {
            return Err(RenderError::MissingOutputDir(output_dir));
        }

        let artifact = workspace
            .find_named_video(&render_id)
            .map_err(RenderError::Workspace)?
            .ok_or(RenderError::NoOutput)?;

        self.publish(&artifact, &render_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_cause() {
        let err = RenderError::RuntimeMissing("manim");
        assert!(err.to_string().contains("manim not found on PATH"));

        let err = RenderError::SubprocessFailed {
            code: 1,
            stderr: "SyntaxError: invalid syntax".to_string(),
        };
        assert!(err.to_string().contains("status 1"));
        assert!(err.to_string().contains("SyntaxError"));

        let err = RenderError::Timeout(300);
        assert!(err.to_string().contains("300s"));
    }

    #[test]
    fn test_renderer_from_config() {
        let config = Config::default();
        let renderer = ManimRenderer::from_config(&config);
        assert_eq!(renderer.media_dir, config.media_dir);
        assert_eq!(renderer.timeout, Duration::from_secs(300));
        assert!(!renderer.keep_workspaces);
    }
}
