//! # AAZ Editor Generate Command
//!
//! File: cli/src/commands/generate.rs
//!
//! ## Overview
//!
//! `aaz-editor generate <workspace>` renders every command of a workspace
//! into an `aaz` Python package, the same output the editor API produces
//! for `POST .../Generate`.
//!
//! The output directory is, in order: `--output`, `[generator]
//! output_directory`, or `<workspace folder>/Generated`.
//!
use super::workspace::resolve_workspaces_dir;
use crate::core::config;
use crate::core::error::Result;
use crate::editor::WorkspaceManager;
use crate::generator;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Name of the workspace to generate.
    workspace: String,

    /// Output directory for the generated package.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Folder holding the workspaces.
    #[arg(long, env = "AAZ_EDITOR_WORKSPACES_DIR")]
    workspaces_dir: Option<PathBuf>,
}

pub async fn handle_generate(args: GenerateArgs) -> Result<()> {
    let ws_dir = resolve_workspaces_dir(args.workspaces_dir)?;
    let mut manager = WorkspaceManager::open(&ws_dir, &args.workspace)?;
    manager.load()?;

    let out_dir = match args.output {
        Some(dir) => dir,
        None => config::load_config()?
            .output_dir()
            .unwrap_or_else(|| manager.folder.join("Generated")),
    };
    info!(
        "Generating workspace '{}' into {}",
        args.workspace,
        out_dir.display()
    );

    let files = generator::generate_workspace(&manager, &out_dir)?;
    println!("Generated {} file(s) in '{}':", files.len(), out_dir.display());
    for file in &files {
        println!("  {}", file.display());
    }
    Ok(())
}
