//! Configuration for animagen.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (ANIMAGEN_*)
//! 2. Config file (animagen.yaml)
//! 3. Defaults
//!
//! Config file discovery searches the current directory and parents for
//! `animagen.yaml`. The resolved [`Config`] is constructed once at startup
//! and passed down explicitly; there is no global configuration singleton.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub ollama: Option<OllamaSection>,
    #[serde(default)]
    pub render: Option<RenderSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaSection {
    pub url: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderSection {
    pub timeout_seconds: Option<u64>,
    pub max_concurrent: Option<usize>,
    /// Directory videos are published to and served from
    pub media_dir: Option<String>,
    /// Keep render workspaces on disk for debugging
    pub keep_workspaces: Option<bool>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address for the HTTP server
    pub host: String,
    /// Bind port for the HTTP server
    pub port: u16,
    /// Whole-request timeout applied by the server middleware
    pub request_timeout_secs: u64,
    /// Base URL of the local Ollama instance
    pub ollama_url: String,
    /// Model identifier passed to Ollama
    pub ollama_model: String,
    /// Timeout for one generation request
    pub generation_timeout_secs: u64,
    /// Timeout for one render subprocess
    pub render_timeout_secs: u64,
    /// Maximum number of renders running at once
    pub max_concurrent_renders: usize,
    /// Directory rendered videos are published to and served from
    pub media_dir: PathBuf,
    /// Retain render workspaces instead of deleting them on completion
    pub keep_workspaces: bool,
    /// Path to the config file, if one was found
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 600,
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "codellama".to_string(),
            generation_timeout_secs: 120,
            render_timeout_secs: 300,
            max_concurrent_renders: 2,
            media_dir: PathBuf::from("media/videos"),
            keep_workspaces: false,
            config_file: None,
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join("animagen.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse a config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse_value<T: std::str::FromStr>(name: &str, raw: String) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", name, raw))
}

impl Config {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let config_file = find_config_file();
        let file = match &config_file {
            Some(path) => load_config_file(path)?,
            None => ConfigFile::default(),
        };

        let mut config = Self::from_file(file);
        config.config_file = config_file;
        config.apply_env()?;
        Ok(config)
    }

    /// Build a config from a parsed file, filling gaps with defaults
    pub fn from_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        let server = file.server.unwrap_or_default();
        let ollama = file.ollama.unwrap_or_default();
        let render = file.render.unwrap_or_default();

        Self {
            host: server.host.unwrap_or(defaults.host),
            port: server.port.unwrap_or(defaults.port),
            request_timeout_secs: server
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
            ollama_url: ollama.url.unwrap_or(defaults.ollama_url),
            ollama_model: ollama.model.unwrap_or(defaults.ollama_model),
            generation_timeout_secs: ollama
                .timeout_seconds
                .unwrap_or(defaults.generation_timeout_secs),
            render_timeout_secs: render
                .timeout_seconds
                .unwrap_or(defaults.render_timeout_secs),
            max_concurrent_renders: render
                .max_concurrent
                .unwrap_or(defaults.max_concurrent_renders),
            media_dir: render
                .media_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.media_dir),
            keep_workspaces: render.keep_workspaces.unwrap_or(defaults.keep_workspaces),
            config_file: None,
        }
    }

    /// Apply environment variable overrides on top of the current values
    fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
    }

    /// Apply overrides from an arbitrary lookup.
    ///
    /// The lookup is a parameter so precedence is testable without
    /// mutating the process environment.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = get("ANIMAGEN_HOST") {
            self.host = host;
        }
        if let Some(raw) = get("ANIMAGEN_PORT") {
            self.port = parse_value("ANIMAGEN_PORT", raw)?;
        }
        if let Some(url) = get("ANIMAGEN_OLLAMA_URL") {
            self.ollama_url = url;
        }
        if let Some(model) = get("ANIMAGEN_OLLAMA_MODEL") {
            self.ollama_model = model;
        }
        if let Some(raw) = get("ANIMAGEN_GENERATION_TIMEOUT_SECS") {
            self.generation_timeout_secs = parse_value("ANIMAGEN_GENERATION_TIMEOUT_SECS", raw)?;
        }
        if let Some(raw) = get("ANIMAGEN_RENDER_TIMEOUT_SECS") {
            self.render_timeout_secs = parse_value("ANIMAGEN_RENDER_TIMEOUT_SECS", raw)?;
        }
        if let Some(raw) = get("ANIMAGEN_MAX_CONCURRENT_RENDERS") {
            self.max_concurrent_renders = parse_value("ANIMAGEN_MAX_CONCURRENT_RENDERS", raw)?;
        }
        if let Some(dir) = get("ANIMAGEN_MEDIA_DIR") {
            self.media_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get("ANIMAGEN_KEEP_WORKSPACES") {
            self.keep_workspaces = parse_value("ANIMAGEN_KEEP_WORKSPACES", raw)?;
        }
        Ok(())
    }
}
