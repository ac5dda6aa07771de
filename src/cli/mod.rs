//! Command-line interface for animagen.
//!
//! Provides commands for running the HTTP server, checking the rendering
//! toolchain, and one-shot script generation for debugging prompts.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::adapters::{OllamaClient, ScriptGenerator};
use crate::config::Config;
use crate::runtime::RuntimeCheck;
use crate::server::{self, AppState};

/// animagen - prompt-to-video animation service
#[derive(Parser, Debug)]
#[command(name = "animagen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check that the rendering toolchain is installed
    Check,

    /// Generate a script for a prompt without rendering it
    Generate {
        /// Free-text animation description
        prompt: String,
    },
}

impl Cli {
    /// Execute the parsed command
    pub async fn execute(self) -> Result<()> {
        let mut config = Config::load()?;

        let command = self.command.unwrap_or(Commands::Serve {
            host: None,
            port: None,
        });

        match command {
            Commands::Serve { host, port } => {
                if let Some(host) = host {
                    config.host = host;
                }
                if let Some(port) = port {
                    config.port = port;
                }

                if let Some(path) = &config.config_file {
                    tracing::info!(path = %path.display(), "Loaded config file");
                }

                // Report toolchain state up front; requests re-check it
                if !RuntimeCheck::probe().available() {
                    tracing::warn!(
                        "Rendering toolchain incomplete; /generate will fail until it is installed"
                    );
                }

                server::serve(AppState::new(config)).await
            }

            Commands::Check => {
                let check = RuntimeCheck::probe();

                match &check.manim {
                    Some(path) => println!("manim:  {}", path.display()),
                    None => println!("manim:  NOT FOUND"),
                }
                match &check.ffmpeg {
                    Some(path) => println!("ffmpeg: {}", path.display()),
                    None => println!("ffmpeg: NOT FOUND"),
                }

                if check.available() {
                    println!("Rendering toolchain ready.");
                    Ok(())
                } else {
                    anyhow::bail!("rendering toolchain incomplete");
                }
            }

            Commands::Generate { prompt } => {
                let client = OllamaClient::from_config(&config);
                let code = client.generate(&prompt).await?;
                println!("{code}");
                Ok(())
            }
        }
    }
}
