//! # AAZ Code Generator
//!
//! File: cli/src/generator/mod.rs
//!
//! ## Overview
//!
//! Renders the commands of a workspace into an Azure CLI `aaz` Python
//! package. For a workspace whose tree holds `databricks workspace
//! vnet-peering list`, the output is:
//!
//! ```text
//! <out>/databricks/__cmd_group.py
//! <out>/databricks/__init__.py
//! <out>/databricks/workspace/__cmd_group.py
//! <out>/databricks/workspace/__init__.py
//! <out>/databricks/workspace/vnet-peering/__cmd_group.py
//! <out>/databricks/workspace/vnet-peering/__init__.py
//! <out>/databricks/workspace/vnet-peering/_list.py
//! ```
//!
//! ## Architecture
//!
//! - `naming`: Python identifiers and literals.
//! - `context`: model documents to template contexts (including the
//!   breadth-first schema builder blocks).
//! - `templates/`: Tera templates compiled into the binary.
//!
//! Response schema nodes resolved from a shared definition are built by
//! module-level `_build_schema_<name>_read` helpers, emitted after the
//! command class and cached in a module global.
//!
pub mod context;
pub mod naming;

use crate::common::fs::io;
use crate::core::error::Result;
use crate::core::templating::TemplateSet;
use crate::editor::WorkspaceManager;
use crate::model::{Command, Plane, TreeNode};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const COMMAND_TEMPLATE: &str = "command.py";
const CMD_GROUP_TEMPLATE: &str = "cmd_group.py";
const INIT_TEMPLATE: &str = "init.py";

/// Compiles the embedded templates.
pub fn templates() -> Result<TemplateSet> {
    TemplateSet::from_raw(&[
        ("_header.py.tera", include_str!("templates/_header.py.tera")),
        (COMMAND_TEMPLATE, include_str!("templates/command.py.tera")),
        (CMD_GROUP_TEMPLATE, include_str!("templates/cmd_group.py.tera")),
        (INIT_TEMPLATE, include_str!("templates/init.py.tera")),
    ])
}

/// Renders the module of one command. `names` is the full command name path.
pub fn render_command(
    templates: &TemplateSet,
    names: &[String],
    command: &Command,
    plane: Plane,
) -> Result<String> {
    templates.render(COMMAND_TEMPLATE, &context::command_context(names, command, plane))
}

fn node_folder(out_dir: &Path, node: &TreeNode) -> PathBuf {
    node.names.iter().fold(out_dir.to_path_buf(), |p, n| p.join(n))
}

/// Writes the package for a loaded workspace into `out_dir` and returns the
/// written files relative to `out_dir`, sorted.
pub fn generate_workspace(manager: &WorkspaceManager, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let ws = manager.ws()?;
    let templates = templates()?;
    info!(
        "Generating code for workspace '{}' into {}",
        ws.name,
        out_dir.display()
    );
    io::ensure_dir_exists(out_dir)?;

    let mut written = Vec::new();
    let mut write = |path: PathBuf, content: String| -> Result<()> {
        io::write_string_to_file(&path, &content)?;
        let relative = pathdiff::diff_paths(&path, out_dir).unwrap_or_else(|| path.clone());
        debug!("Generated {}", relative.display());
        written.push(relative);
        Ok(())
    };

    // The root node maps to `out_dir` itself and gets no group module.
    for node in ws.command_tree.command_groups.values().flat_map(|n| n.nodes()) {
        let folder = node_folder(out_dir, node);
        write(
            folder.join("__cmd_group.py"),
            templates.render(CMD_GROUP_TEMPLATE, &context::group_context(node))?,
        )?;
        write(
            folder.join("__init__.py"),
            templates.render(INIT_TEMPLATE, &context::init_context(node))?,
        )?;
    }

    for (leaf, command) in manager.commands()? {
        let (_, groups) = leaf
            .names
            .split_last()
            .context("Command without a name in the command tree")?;
        let folder = groups.iter().fold(out_dir.to_path_buf(), |p, n| p.join(n));
        let module = format!("{}.py", context::command_module_name(&command.name));
        let content = render_command(&templates, &leaf.names, command, ws.plane)
            .with_context(|| format!("Failed to render command '{}'", leaf.names.join(" ")))?;
        write(folder.join(module), content)?;
    }

    written.sort();
    info!("Generated {} file(s)", written.len());
    Ok(written)
}
