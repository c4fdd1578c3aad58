//! # AAZ Editor Server Configuration
//!
//! File: cli/src/commands/serve/config.rs
//!
//! ## Overview
//!
//! Builds the effective `ServerConfig` for `aaz-editor serve` from:
//! 1. Command-line arguments and their environment variables (highest priority)
//! 2. The merged `[server]`, `[workspaces]`, `[aaz]` and `[generator]`
//!    sections of the editor configuration (`core::config`)
//! 3. Built-in defaults (lowest priority)
//!
//! ## Examples
//!
//! ```bash
//! aaz-editor serve --port 5001 --host 0.0.0.0
//! AAZ_EDITOR_WORKSPACES_DIR=/tmp/ws aaz-editor serve --no-cors
//! ```
//!
use crate::core::config::{self, Config};
use crate::core::error::{EditorError, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::debug;

/// # Serve Command Arguments (`ServeArgs`)
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on. Defaults to `[server] port` (5000).
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Address to bind. Defaults to `[server] host` (127.0.0.1).
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Disables CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    /// Folder holding the workspaces.
    #[arg(long, env = "AAZ_EDITOR_WORKSPACES_DIR")]
    pub workspaces_dir: Option<PathBuf>,

    /// Command catalog used by AddSwagger.
    #[arg(long, env = "AAZ_EDITOR_AAZ_DIR")]
    pub aaz_dir: Option<PathBuf>,
}

/// # Effective Server Configuration (`ServerConfig`)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    pub enable_cors: bool,
    pub workspaces_dir: PathBuf,
    pub aaz_dir: PathBuf,
    /// Root for generated code; `None` writes into each workspace folder.
    pub output_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Applies `args` on top of the loaded configuration.
    pub fn resolve(args: &ServeArgs, config: &Config) -> Result<Self> {
        let host = match args.host {
            Some(host) => host,
            None => config.server.host.parse().map_err(|e| {
                EditorError::Config(format!(
                    "Invalid server host '{}': {}",
                    config.server.host, e
                ))
            })?,
        };
        Ok(Self {
            port: args.port.unwrap_or(config.server.port),
            host,
            enable_cors: config.enable_cors() && !args.no_cors,
            workspaces_dir: args
                .workspaces_dir
                .clone()
                .unwrap_or_else(|| config.workspaces_dir()),
            aaz_dir: args.aaz_dir.clone().unwrap_or_else(|| config.aaz_dir()),
            output_dir: config.output_dir(),
        })
    }
}

/// Loads the editor configuration and merges the command-line arguments.
pub fn load_and_merge_config(args: &ServeArgs) -> Result<ServerConfig> {
    let config = config::load_config()?;
    let server_config = ServerConfig::resolve(args, &config)?;
    debug!("Resolved server config: {:?}", server_config);
    Ok(server_config)
}
