//! # AAZ Editor Workspace Commands
//!
//! File: cli/src/commands/workspace.rs
//!
//! ## Overview
//!
//! Offline management of editor workspaces, sharing the on-disk layout with
//! the `serve` API:
//!
//! ```bash
//! aaz-editor workspace list
//! aaz-editor workspace create my-ws --plane mgmt-plane
//! aaz-editor workspace show my-ws
//! aaz-editor workspace delete my-ws
//! ```
//!
//! The workspaces directory comes from `--workspaces-dir`, the
//! `AAZ_EDITOR_WORKSPACES_DIR` environment variable or `[workspaces] directory`.
//!
use crate::core::config;
use crate::core::error::Result;
use crate::editor::{WorkspaceManager, WorkspaceSummary};
use crate::model::{Plane, TreeNode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
pub struct WorkspaceArgs {
    /// Folder holding the workspaces.
    #[arg(long, env = "AAZ_EDITOR_WORKSPACES_DIR", global = true)]
    workspaces_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: WorkspaceCommand,
}

#[derive(Subcommand, Debug)]
enum WorkspaceCommand {
    /// Lists the workspaces.
    List,
    /// Creates an empty workspace.
    Create {
        name: String,
        /// `mgmt-plane` or `data-plane`.
        #[arg(long, default_value = "mgmt-plane")]
        plane: Plane,
    },
    /// Prints the command tree of a workspace.
    Show { name: String },
    /// Deletes a workspace folder.
    Delete { name: String },
}

/// Resolves the workspaces directory from the argument or the configuration.
pub fn resolve_workspaces_dir(arg: Option<PathBuf>) -> Result<PathBuf> {
    match arg {
        Some(dir) => Ok(dir),
        None => Ok(config::load_config()?.workspaces_dir()),
    }
}

pub async fn handle_workspace(args: WorkspaceArgs) -> Result<()> {
    let ws_dir = resolve_workspaces_dir(args.workspaces_dir)?;
    debug!("Using workspaces directory {}", ws_dir.display());
    match args.command {
        WorkspaceCommand::List => {
            let workspaces = WorkspaceManager::list_workspaces(&ws_dir)?;
            print_workspace_table(&workspaces, &ws_dir);
        }
        WorkspaceCommand::Create { name, plane } => {
            let mut manager = WorkspaceManager::new(&ws_dir, &name, plane)?;
            manager.save()?;
            println!(
                "Created workspace '{}' ({}) at {}",
                name,
                plane,
                manager.folder.display()
            );
        }
        WorkspaceCommand::Show { name } => {
            let mut manager = WorkspaceManager::open(&ws_dir, &name)?;
            manager.load()?;
            let ws = manager.ws()?;
            println!("Workspace '{}' ({})", ws.name, ws.plane);
            for line in tree_lines(&ws.command_tree) {
                println!("{}", line);
            }
            println!("Resources: {}", ws.resources.len());
        }
        WorkspaceCommand::Delete { name } => {
            if WorkspaceManager::open(&ws_dir, &name)?.delete()? {
                info!("Workspace '{}' deleted", name);
                println!("Deleted workspace '{}'", name);
            } else {
                println!("Workspace '{}' does not exist", name);
            }
        }
    }
    Ok(())
}

fn format_updated(updated: f64) -> String {
    chrono::DateTime::from_timestamp(updated as i64, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn print_workspace_table(workspaces: &[WorkspaceSummary], ws_dir: &std::path::Path) {
    if workspaces.is_empty() {
        println!("No workspaces found in '{}'.", ws_dir.display());
        return;
    }
    let width = workspaces
        .iter()
        .map(|w| w.name.len())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    println!("Workspaces in '{}':\n", ws_dir.display());
    println!("{:<width$} | {:<10} | Updated (UTC)", "Name", "Plane", width = width);
    println!("{}-+-{}-+-{}", "-".repeat(width), "-".repeat(10), "-".repeat(19));
    for ws in workspaces {
        println!(
            "{:<width$} | {:<10} | {}",
            ws.name,
            ws.plane.as_str(),
            format_updated(ws.updated),
            width = width
        );
    }
    println!("\nFound {} workspace(s).", workspaces.len());
}

/// Indented listing of groups and commands below `root`.
fn tree_lines(root: &TreeNode) -> Vec<String> {
    fn walk(node: &TreeNode, depth: usize, out: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        for (name, leaf) in &node.commands {
            out.push(format!("{}{} [{}]", indent, name, leaf.stage));
        }
        for (name, group) in &node.command_groups {
            out.push(format!("{}{}/", indent, name));
            walk(group, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out
}
