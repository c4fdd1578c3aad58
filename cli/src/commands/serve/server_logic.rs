//! # AAZ Editor HTTP Server
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! Runs the editor API (`routes`) on Axum:
//! - Port availability checking with automatic fallback
//! - Optional permissive CORS for a browser front end on another origin
//! - Request tracing through `tower-http`
//! - Graceful shutdown on Ctrl+C or SIGTERM
//!
//! ## Architecture
//!
//! 1. Find an available port, starting at the configured one
//! 2. Build the shared `AppState` and the router with its middleware
//! 3. Print the API address and the effective directories
//! 4. Serve until a shutdown signal arrives
//!
//! ## Examples
//!
//! ```rust
//! let config = config::load_and_merge_config(&args)?;
//! server_logic::run_server(config).await?;
//! ```
//!
use super::config::ServerConfig;
use super::routes::{self, AppState, API_PREFIX};
use crate::core::error::Result;
use anyhow::Context;
use axum::Router;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

const MAX_PORT_ATTEMPTS: u8 = 10;

/// # Run Editor Server (`run_server`)
///
/// Binds the first free port at or above `config.port` and serves the editor
/// API until Ctrl+C or SIGTERM.
///
/// ## Errors
///
/// - No free port within `MAX_PORT_ATTEMPTS` ports
/// - The listener cannot be bound
/// - The server fails while running
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;
    let app = create_app(&config);

    println!("\n=================================================================");
    println!("AAZ Editor API:    http://{}{}", addr, API_PREFIX);
    println!("Workspaces:        {}", config.workspaces_dir.display());
    println!("Command catalog:   {}", config.aaz_dir.display());
    match &config.output_dir {
        Some(dir) => println!("Generated code:    {}", dir.display()),
        None => println!("Generated code:    <workspace>/Generated"),
    }
    println!("CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting editor server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port` and up to `max_attempts - 1` following ports, returning
/// the first address that can be bound.
async fn find_available_port(host: IpAddr, start_port: u16, max_attempts: u8) -> Result<SocketAddr> {
    let mut current_port = start_port;
    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, using port {} instead.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable ({}). Trying next port...",
                    attempt + 1,
                    current_port,
                    host,
                    e
                );
                current_port = current_port
                    .checked_add(1)
                    .context("Ran out of port numbers")?;
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        host,
        start_port,
        max_attempts
    )
}

/// # Create Axum Application (`create_app`)
///
/// The editor routes wrapped in request tracing and CORS.
fn create_app(config: &ServerConfig) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let state = Arc::new(AppState::new(
        config.workspaces_dir.clone(),
        config.aaz_dir.clone(),
        config.output_dir.clone(),
    ));

    routes::router(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer)
            .layer(cors_layer),
    )
}
