//! # AAZ Editor Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the `aaz-editor` CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up logging based on the verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Run the editor API
//! aaz-editor serve
//!
//! # Generate code for a workspace with debug logging
//! aaz-editor -vv generate my-ws --output ./src/aaz
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // CLI commands (serve, workspace, generate)
mod common; // Filesystem and encoding helpers
mod core; // Errors, configuration, templating
mod editor; // Workspace manager
mod generator; // Python code generator
mod model; // Workspace and command configuration documents

#[derive(Parser, Debug)]
#[command(
    name = "aaz-editor",
    about = "AAZ Editor: workspace editor and code generator for Azure CLI commands",
    long_about = "Edit command trees built from API resources and generate aaz Python command modules.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Runs the workspace editor API.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Manages workspaces.
    #[command(alias = "ws")]
    Workspace(commands::workspace::WorkspaceArgs),
    /// Generates Python command modules for a workspace.
    #[command(alias = "g")]
    Generate(commands::generate::GenerateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Workspace(args) => commands::workspace::handle_workspace(args).await,
        Commands::Generate(args) => commands::generate::handle_generate(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
