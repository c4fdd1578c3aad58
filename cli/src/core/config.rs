//! # AAZ Editor Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system, handling loading, merging,
//! validation, and access to configuration data. It supports a multi-level
//! configuration approach that combines defaults, user settings, and project
//! overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags and environment variables (applied by the command handlers)
//! 2. Project-specific `.aaz-editor.toml` in the current directory or ancestors
//! 3. User-specific `<config dir>/aaz-editor/config.toml`
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [workspaces]
//! directory = "~/.aaz/workspaces"
//!
//! [aaz]
//! directory = "~/src/aaz"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//! enable_cors = true
//!
//! [generator]
//! output_directory = "~/src/azure-cli-extensions/src/databricks/azext_databricks/aaz/latest"
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let workspaces_dir = cfg.workspaces_dir();
//! ```
//!
use crate::core::error::{EditorError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub workspaces: WorkspacesConfig,
    #[serde(default)]
    pub aaz: AazConfig,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Where workspaces live on disk.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct WorkspacesConfig {
    /// Root folder holding one sub-folder per workspace (can use ~).
    #[serde(default = "default_workspaces_dir")]
    pub directory: String,
}

/// The command catalog that `AddSwagger` imports configurations from.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct AazConfig {
    #[serde(default = "default_aaz_dir")]
    pub directory: String,
}

/// Defaults for `aaz-editor serve`.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// `None` when the file does not set it; see `Config::enable_cors`.
    #[serde(default)]
    pub enable_cors: Option<bool>,
}

/// Code generation settings.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Output root for generated modules. When unset, code is written to
    /// `<workspace folder>/Generated`.
    pub output_directory: Option<String>,
}

impl Default for WorkspacesConfig {
    fn default() -> Self {
        Self {
            directory: default_workspaces_dir(),
        }
    }
}

impl Default for AazConfig {
    fn default() -> Self {
        Self {
            directory: default_aaz_dir(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            enable_cors: None,
        }
    }
}

impl Config {
    pub fn workspaces_dir(&self) -> PathBuf {
        PathBuf::from(&self.workspaces.directory)
    }

    pub fn aaz_dir(&self) -> PathBuf {
        PathBuf::from(&self.aaz.directory)
    }

    pub fn enable_cors(&self) -> bool {
        self.server.enable_cors.unwrap_or_else(default_enable_cors)
    }

    pub fn output_dir(&self) -> Option<PathBuf> {
        self.generator.output_directory.as_ref().map(PathBuf::from)
    }
}

fn default_workspaces_dir() -> String {
    "~/.aaz/workspaces".to_string()
}
fn default_aaz_dir() -> String {
    "~/.aaz/aaz".to_string()
}
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}
fn default_server_port() -> u16 {
    5000
}
fn default_enable_cors() -> bool {
    true
}

const PROJECT_CONFIG_FILENAME: &str = ".aaz-editor.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "AAZ", "aaz-editor") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    if let Some(project_config_path) = find_project_config_path()? {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.aaz-editor.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let mut path: &Path = &current_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Ok(Some(project_config));
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return Ok(None);
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => break,
        }
    }
    Ok(None)
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win over user values wherever they differ from the defaults.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.workspaces.directory = if project_cfg.workspaces.directory != default_workspaces_dir() {
        project_cfg.workspaces.directory
    } else {
        user.workspaces.directory
    };
    merged.aaz.directory = if project_cfg.aaz.directory != default_aaz_dir() {
        project_cfg.aaz.directory
    } else {
        user.aaz.directory
    };
    merged.server.host = if project_cfg.server.host != default_server_host() {
        project_cfg.server.host
    } else {
        user.server.host
    };
    merged.server.port = if project_cfg.server.port != default_server_port() {
        project_cfg.server.port
    } else {
        user.server.port
    };
    merged.server.enable_cors = project_cfg.server.enable_cors.or(user.server.enable_cors);
    merged.generator.output_directory = project_cfg
        .generator
        .output_directory
        .or(user.generator.output_directory);
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    debug!("Expanding paths in configuration...");
    config.workspaces.directory = shellexpand::tilde(&config.workspaces.directory).into_owned();
    config.aaz.directory = shellexpand::tilde(&config.aaz.directory).into_owned();
    if let Some(out) = config.generator.output_directory.as_mut() {
        *out = shellexpand::tilde(out.as_str()).into_owned();
    }
    debug!(
        "Expanded directories: workspaces='{}', aaz='{}'",
        config.workspaces.directory, config.aaz.directory
    );
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    let ws_dir = config.workspaces_dir();
    if ws_dir.exists() && !ws_dir.is_dir() {
        return Err(anyhow!(EditorError::Config(format!(
            "Configured workspaces path '{}' exists but is not a directory.",
            ws_dir.display()
        ))));
    }
    if config.server.host.parse::<std::net::IpAddr>().is_err() {
        return Err(anyhow!(EditorError::Config(format!(
            "Invalid server host '{}'. Expected an IP address.",
            config.server.host
        ))));
    }
    let aaz_dir = config.aaz_dir();
    if !aaz_dir.exists() {
        warn!(
            "Configured aaz directory '{}' does not exist; importing resources will fail.",
            aaz_dir.display()
        );
    }
    info!("Configuration validation successful.");
    Ok(())
}
