//! # AAZ Editor Server
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `aaz-editor serve` runs the workspace editor API that the web front end
//! talks to. Workspaces are read from and written to the workspaces
//! directory; AddSwagger imports command configurations from the command
//! catalog (`aaz` directory).
//!
//! ## Architecture
//!
//! - `config.rs`: argument and config file merging
//! - `routes.rs`: the `/AAZ/Editor` API handlers
//! - `server_logic.rs`: binding, middleware and graceful shutdown
//!
//! ## Examples
//!
//! ```bash
//! aaz-editor serve
//! aaz-editor serve --port 5001 --workspaces-dir ./ws --aaz-dir ./aaz
//! ```
//!
use crate::core::error::Result;
use tracing::info;

pub use config::ServeArgs;

pub mod config;
pub mod routes;
pub mod server_logic;

/// Entry point of `aaz-editor serve`.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);
    let config = config::load_and_merge_config(&args)?;
    info!("Effective server config: {:?}", config);
    server_logic::run_server(config).await
}
