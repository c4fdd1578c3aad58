//! # Workspace Manager
//!
//! File: cli/src/editor/manager.rs
//!
//! ## Overview
//!
//! `WorkspaceManager` owns one workspace on disk and performs every state
//! change the editor offers: creating and deleting workspaces, editing the
//! command tree, and binding, merging and removing resources.
//!
//! ## Layout on disk
//!
//! ```text
//! <workspaces dir>/
//! └── <name>/
//!     ├── ws.json                              the Workspace document
//!     └── Resources/
//!         └── <base64url(resource id)>/
//!             └── <version>.json               one CommandConfiguration
//! ```
//!
//! The command catalog used by `add_new_resources_by_swagger` has the same
//! shape below `<aaz dir>/Resources/<plane>/`.
//!
//! ## Invariants
//!
//! - Every leaf of the tree is owned by exactly one loaded configuration,
//!   found through the leaf's first resource.
//! - `Workspace::resources` is the union of the resources of all loaded
//!   configurations (`sync_resources`).
//!
//! ## Usage
//!
//! ```rust
//! let mut manager = WorkspaceManager::open(&workspaces_dir, "databricks")?;
//! manager.load()?;
//! manager.rename_command_tree_leaf(&node_names, "list", &new_names)?;
//! manager.save()?;
//! ```
//!
use crate::common::encoding::b64encode_str;
use crate::common::fs::io;
use crate::core::error::{EditorError, Result};
use crate::model::{
    ArgGroup, Command, CommandConfiguration, Help, Plane, Resource, Stage, TreeLeaf, TreeNode, Workspace,
};
use anyhow::{anyhow, Context};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File name of the workspace document inside a workspace folder.
pub const WORKSPACE_FILE: &str = "ws.json";
const RESOURCES_DIR: &str = "Resources";

/// One entry of `list_workspaces`.
#[derive(Serialize, Debug, Clone)]
pub struct WorkspaceSummary {
    pub name: String,
    pub plane: Plane,
    pub folder: PathBuf,
    pub updated: f64,
}

#[derive(Debug)]
pub struct WorkspaceManager {
    pub name: String,
    pub folder: PathBuf,
    aaz_dir: Option<PathBuf>,
    ws: Option<Workspace>,
    cfgs: Vec<CommandConfiguration>,
}

/// Workspace names become folder names.
pub fn is_valid_workspace_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Command group and command names: lowercase words joined by `-`.
pub fn is_valid_command_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn validate_command_names(names: &[String]) -> Result<()> {
    if names.is_empty() {
        anyhow::bail!(EditorError::invalid("Name cannot be empty"));
    }
    if let Some(bad) = names.iter().find(|n| !is_valid_command_name(n)) {
        anyhow::bail!(EditorError::invalid(format!("Invalid name '{}'", bad)));
    }
    Ok(())
}

/// Versions become file names below the resource folders, so they must stay
/// a single path component.
fn validate_version(version: &str) -> Result<()> {
    if version.is_empty()
        || version.contains('/')
        || version.contains('\\')
        || version.contains("..")
    {
        anyhow::bail!(EditorError::invalid(format!("Invalid version '{}'", version)));
    }
    Ok(())
}

fn join_names(node_names: &[String], leaf_name: &str) -> Vec<String> {
    let mut names = node_names.to_vec();
    names.push(leaf_name.to_string());
    names
}

fn cfg_path(resources_root: &Path, resource: &Resource) -> PathBuf {
    resources_root
        .join(b64encode_str(&resource.id))
        .join(format!("{}.json", resource.version))
}

impl WorkspaceManager {
    /// Binds a manager to an existing (or not yet existing) workspace folder.
    /// Nothing is read until `load`.
    pub fn open(workspaces_dir: &Path, name: &str) -> Result<Self> {
        if !is_valid_workspace_name(name) {
            anyhow::bail!(EditorError::invalid(format!(
                "Invalid workspace name '{}'",
                name
            )));
        }
        Ok(Self {
            name: name.to_string(),
            folder: workspaces_dir.join(name),
            aaz_dir: None,
            ws: None,
            cfgs: Vec::new(),
        })
    }

    /// Creates an empty workspace in memory; `save` persists it.
    pub fn new(workspaces_dir: &Path, name: &str, plane: Plane) -> Result<Self> {
        let mut manager = Self::open(workspaces_dir, name)?;
        if manager.path().exists() {
            anyhow::bail!(EditorError::conflict(format!(
                "Workspace '{}' already exists",
                name
            )));
        }
        manager.ws = Some(Workspace::new(name, plane));
        info!("Created workspace '{}' ({})", name, plane);
        Ok(manager)
    }

    /// Sets the command catalog used when importing resources.
    pub fn with_aaz_dir(mut self, aaz_dir: &Path) -> Self {
        self.aaz_dir = Some(aaz_dir.to_path_buf());
        self
    }

    pub fn list_workspaces(workspaces_dir: &Path) -> Result<Vec<WorkspaceSummary>> {
        let mut result = Vec::new();
        if !workspaces_dir.is_dir() {
            debug!(
                "Workspaces directory {} does not exist yet",
                workspaces_dir.display()
            );
            return Ok(result);
        }
        let entries = fs::read_dir(workspaces_dir).with_context(|| {
            format!(
                "Failed to read workspaces directory {}",
                workspaces_dir.display()
            )
        })?;
        for entry in entries.filter_map(|e| e.ok()) {
            let folder = entry.path();
            let ws_path = folder.join(WORKSPACE_FILE);
            if !ws_path.is_file() {
                continue;
            }
            let ws: Workspace = match io::read_json(&ws_path) {
                Ok(ws) => ws,
                Err(e) => {
                    warn!("Skipping unreadable workspace {}: {:#}", ws_path.display(), e);
                    continue;
                }
            };
            result.push(WorkspaceSummary {
                name: ws.name,
                plane: ws.plane,
                updated: io::modified_timestamp(&ws_path)?,
                folder,
            });
        }
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    /// Path of `ws.json`.
    pub fn path(&self) -> PathBuf {
        self.folder.join(WORKSPACE_FILE)
    }

    fn resources_root(&self) -> PathBuf {
        self.folder.join(RESOURCES_DIR)
    }

    pub fn load(&mut self) -> Result<()> {
        let path = self.path();
        if !path.is_file() {
            anyhow::bail!(EditorError::not_found(format!(
                "Workspace '{}' not exist",
                self.name
            )));
        }
        let ws: Workspace = io::read_json(&path)?;
        let mut cfgs = Vec::new();
        let resources_root = self.resources_root();
        if resources_root.is_dir() {
            for entry in WalkDir::new(&resources_root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && p.extension().is_some_and(|ext| ext == "json") {
                    let cfg: CommandConfiguration = io::read_json(p)?;
                    cfgs.push(cfg);
                }
            }
        }
        debug!(
            "Loaded workspace '{}' with {} command configuration(s)",
            self.name,
            cfgs.len()
        );
        self.ws = Some(ws);
        self.cfgs = cfgs;
        Ok(())
    }

    /// Writes `ws.json` and every configuration, and deletes configuration
    /// files that no longer belong to the workspace.
    pub fn save(&mut self) -> Result<()> {
        let folder = self.folder.clone();
        let resources_root = self.resources_root();
        let ws = self.ws_mut()?;
        ws.version = Utc::now();
        io::ensure_dir_exists(&folder)?;
        io::write_json(&folder.join(WORKSPACE_FILE), ws)?;

        let mut written = HashSet::new();
        for cfg in &self.cfgs {
            let primary = cfg
                .primary_resource()
                .ok_or_else(|| anyhow!("Command configuration without resources"))?;
            let path = cfg_path(&resources_root, primary);
            io::write_json(&path, cfg)?;
            written.insert(path);
        }

        if resources_root.is_dir() {
            for entry in WalkDir::new(&resources_root)
                .contents_first(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && !written.contains(p) {
                    debug!("Removing stale configuration {}", p.display());
                    fs::remove_file(p)
                        .with_context(|| format!("Failed to remove {}", p.display()))?;
                } else if p.is_dir() && p != resources_root {
                    // Only succeeds once the folder is empty.
                    let _ = fs::remove_dir(p);
                }
            }
        }
        info!("Saved workspace '{}' to {}", self.name, folder.display());
        Ok(())
    }

    /// Removes the workspace folder. Returns `false` when there was nothing to delete.
    pub fn delete(&self) -> Result<bool> {
        if !self.path().is_file() {
            return Ok(false);
        }
        fs::remove_dir_all(&self.folder)
            .with_context(|| format!("Failed to delete workspace {}", self.folder.display()))?;
        info!("Deleted workspace '{}'", self.name);
        Ok(true)
    }

    pub fn ws(&self) -> Result<&Workspace> {
        self.ws
            .as_ref()
            .ok_or_else(|| anyhow!("Workspace '{}' is not loaded", self.name))
    }

    fn ws_mut(&mut self) -> Result<&mut Workspace> {
        let name = &self.name;
        self.ws
            .as_mut()
            .ok_or_else(|| anyhow!("Workspace '{}' is not loaded", name))
    }

    /// Modification time of `ws.json`.
    pub fn updated(&self) -> Result<f64> {
        io::modified_timestamp(&self.path())
    }

    // --- Command tree ---

    pub fn find_command_tree_node(&self, names: &[String]) -> Option<&TreeNode> {
        self.ws.as_ref()?.command_tree.find_node(names)
    }

    pub fn find_command_tree_leaf(&self, node_names: &[String], leaf_name: &str) -> Option<&TreeLeaf> {
        self.ws.as_ref()?.command_tree.find_leaf(node_names, leaf_name)
    }

    fn node_mut(&mut self, names: &[String]) -> Result<&mut TreeNode> {
        self.ws_mut()?
            .command_tree
            .find_node_mut(names)
            .ok_or_else(|| EditorError::not_found("Command group not exist").into())
    }

    pub fn update_command_tree_node_help(&mut self, names: &[String], help: Help) -> Result<&TreeNode> {
        if help.short.trim().is_empty() {
            anyhow::bail!(EditorError::invalid("Help short summary cannot be empty"));
        }
        let node = self.node_mut(names)?;
        node.help = Some(help);
        Ok(&*node)
    }

    /// Sets the stage of a node and everything below it, configurations included.
    pub fn update_command_tree_node_stage(&mut self, names: &[String], stage: Stage) -> Result<&TreeNode> {
        let node = self.node_mut(names)?;
        node.set_stage_recursive(stage);
        let leaf_names: Vec<Vec<String>> = node.leaves().iter().map(|l| l.names.clone()).collect();
        for leaf in &leaf_names {
            if let Some(command) = self.find_command_mut(leaf) {
                command.stage = stage;
            }
        }
        self.find_command_tree_node(names)
            .ok_or_else(|| EditorError::not_found("Command group not exist").into())
    }

    /// Removes a subtree and the commands it held. `Ok(false)` if it did not exist.
    pub fn delete_command_tree_node(&mut self, names: &[String]) -> Result<bool> {
        if names.is_empty() {
            anyhow::bail!(EditorError::invalid("Not support to delete command tree root"));
        }
        let removed = match self.ws_mut()?.command_tree.remove_node(names) {
            Some(node) => node,
            None => return Ok(false),
        };
        for leaf in removed.leaves() {
            self.remove_command_from_cfgs(&leaf.names);
        }
        self.sync_resources()?;
        info!("Deleted command group '{}'", names.join(" "));
        Ok(true)
    }

    /// Moves a command group (with everything below it) to `new_names`.
    pub fn rename_command_tree_node(&mut self, names: &[String], new_names: &[String]) -> Result<&TreeNode> {
        if names.is_empty() {
            anyhow::bail!(EditorError::invalid("Cannot Rename root node"));
        }
        validate_command_names(new_names)?;
        if new_names != names {
            if new_names.starts_with(names) {
                anyhow::bail!(EditorError::invalid(
                    "Cannot move a command group into itself"
                ));
            }
            let tree = &self.ws()?.command_tree;
            if tree.find_node(names).is_none() {
                anyhow::bail!(EditorError::not_found("Command group not exist"));
            }
            let (last, parent) = new_names
                .split_last()
                .ok_or_else(|| EditorError::invalid("Name cannot be empty"))?;
            if tree.find_node(new_names).is_some() || tree.find_leaf(parent, last).is_some() {
                anyhow::bail!(EditorError::conflict(format!(
                    "Command group '{}' already exists",
                    new_names.join(" ")
                )));
            }

            let tree = &mut self.ws_mut()?.command_tree;
            let mut node = tree
                .remove_node(names)
                .ok_or_else(|| EditorError::not_found("Command group not exist"))?;
            let old_leaves: Vec<Vec<String>> = node.leaves().iter().map(|l| l.names.clone()).collect();
            node.relabel(new_names.to_vec());
            tree.ensure_node(parent).command_groups.insert(last.clone(), node);

            for old in old_leaves {
                let mut new = new_names.to_vec();
                new.extend_from_slice(&old[names.len()..]);
                self.rename_command_in_cfgs(&old, &new);
            }
            info!(
                "Renamed command group '{}' to '{}'",
                names.join(" "),
                new_names.join(" ")
            );
        }
        self.find_command_tree_node(new_names)
            .ok_or_else(|| EditorError::not_found("Command group not exist").into())
    }

    /// Moves a command to `new_leaf_names` (full names, groups + command).
    pub fn rename_command_tree_leaf(
        &mut self,
        node_names: &[String],
        leaf_name: &str,
        new_leaf_names: &[String],
    ) -> Result<&TreeLeaf> {
        validate_command_names(new_leaf_names)?;
        let old_names = join_names(node_names, leaf_name);
        let (new_last, new_parent) = new_leaf_names
            .split_last()
            .ok_or_else(|| EditorError::invalid("Name cannot be empty"))?;
        if old_names != new_leaf_names {
            let tree = &self.ws()?.command_tree;
            if tree.find_leaf(node_names, leaf_name).is_none() {
                anyhow::bail!(EditorError::not_found("Command not exist"));
            }
            if tree.find_leaf(new_parent, new_last).is_some() || tree.find_node(new_leaf_names).is_some() {
                anyhow::bail!(EditorError::conflict(format!(
                    "Command '{}' already exists",
                    new_leaf_names.join(" ")
                )));
            }
            let tree = &mut self.ws_mut()?.command_tree;
            let mut leaf = tree
                .take_leaf(&old_names)
                .ok_or_else(|| EditorError::not_found("Command not exist"))?;
            leaf.names = new_leaf_names.to_vec();
            tree.ensure_node(new_parent).commands.insert(new_last.clone(), leaf);
            // Only groups emptied by the move go away; the rest keep help and stage.
            tree.prune_empty(node_names);
            self.rename_command_in_cfgs(&old_names, new_leaf_names);
            info!(
                "Renamed command '{}' to '{}'",
                old_names.join(" "),
                new_leaf_names.join(" ")
            );
        }
        self.find_command_tree_leaf(new_parent, new_last)
            .ok_or_else(|| EditorError::not_found("Command not exist").into())
    }

    // --- Command configurations ---

    fn cfg_index(&self, id: &str, version: &str) -> Option<usize> {
        self.cfgs.iter().position(|c| c.contains_resource(id, version))
    }

    /// The configuration that owns `leaf` (through its primary resource).
    pub fn load_cfg_editor_by_command(&self, leaf: &TreeLeaf) -> Result<&CommandConfiguration> {
        let resource = leaf.resources.first().ok_or_else(|| {
            EditorError::not_found(format!(
                "Command '{}' has no resource",
                leaf.names.join(" ")
            ))
        })?;
        self.cfg_index(&resource.id, &resource.version)
            .map(|idx| &self.cfgs[idx])
            .ok_or_else(|| {
                EditorError::not_found(format!(
                    "Command configuration for resource '{}' not exist",
                    resource.id
                ))
                .into()
            })
    }

    /// The configured command behind a leaf.
    pub fn find_command(&self, leaf: &TreeLeaf) -> Result<&Command> {
        self.load_cfg_editor_by_command(leaf)?
            .find_command(&leaf.names)
            .ok_or_else(|| EditorError::not_found("Command not exist").into())
    }

    fn find_command_mut(&mut self, names: &[String]) -> Option<&mut Command> {
        self.cfgs.iter_mut().find_map(|c| c.find_command_mut(names))
    }

    fn remove_command_from_cfgs(&mut self, names: &[String]) {
        for cfg in self.cfgs.iter_mut() {
            if cfg.remove_command(names).is_some() {
                break;
            }
        }
        self.cfgs.retain(|c| !c.is_empty());
    }

    fn rename_command_in_cfgs(&mut self, names: &[String], new_names: &[String]) {
        for cfg in self.cfgs.iter_mut() {
            if cfg.rename_command(names, new_names) {
                return;
            }
        }
        warn!("No command configuration holds '{}'", names.join(" "));
    }

    /// Rebuilds `Workspace::resources` from the loaded configurations.
    fn sync_resources(&mut self) -> Result<()> {
        let mut resources: Vec<Resource> = Vec::new();
        for r in self.cfgs.iter().flat_map(|c| c.resources.iter()) {
            if !resources.iter().any(|x| x.is(&r.id, &r.version)) {
                resources.push(r.clone());
            }
        }
        self.ws_mut()?.resources = resources;
        Ok(())
    }

    // --- Resources ---

    /// Distinct resources used by the commands below a node.
    pub fn get_resources(&self, names: &[String]) -> Result<Vec<Resource>> {
        let node = self
            .find_command_tree_node(names)
            .ok_or_else(|| EditorError::not_found("Command group not exist"))?;
        let mut resources: Vec<Resource> = Vec::new();
        for r in node.leaves().into_iter().flat_map(|l| l.resources.iter()) {
            if !resources.iter().any(|x| x.is(&r.id, &r.version)) {
                resources.push(r.clone());
            }
        }
        resources.sort_by(|a, b| (&a.id, &a.version).cmp(&(&b.id, &b.version)));
        Ok(resources)
    }

    /// Imports the catalog configurations of `resource_ids` at `version`,
    /// placing their commands below `node_names`.
    pub fn add_new_resources_by_swagger(
        &mut self,
        node_names: &[String],
        module: &str,
        version: &str,
        resource_ids: &[String],
    ) -> Result<()> {
        validate_version(version)?;
        let aaz_dir = self
            .aaz_dir
            .clone()
            .ok_or_else(|| EditorError::Config("No aaz directory configured".to_string()))?;
        let ws = self.ws()?;
        if ws.command_tree.find_node(node_names).is_none() {
            anyhow::bail!(EditorError::not_found("Command group not exist"));
        }
        let catalog_root = aaz_dir.join(RESOURCES_DIR).join(ws.plane.as_str());

        let mut imported: Vec<CommandConfiguration> = Vec::new();
        let mut claimed: HashSet<Vec<String>> = HashSet::new();
        for id in resource_ids {
            if ws.resources.iter().any(|r| r.is(id, version))
                || imported.iter().any(|c| c.contains_resource(id, version))
            {
                anyhow::bail!(EditorError::conflict(format!(
                    "Resource '{}' of version '{}' is already in the workspace",
                    id, version
                )));
            }
            let path = cfg_path(&catalog_root, &Resource::new(id, version));
            if !path.is_file() {
                anyhow::bail!(EditorError::not_found(format!(
                    "Resource '{}' of version '{}' not exist in module '{}'",
                    id, version, module
                )));
            }
            let catalog_cfg: CommandConfiguration = io::read_json(&path)?;
            if !catalog_cfg
                .primary_resource()
                .is_some_and(|r| r.is(id, version))
            {
                anyhow::bail!(EditorError::invalid(format!(
                    "Catalog entry {} does not describe resource '{}'",
                    path.display(),
                    id
                )));
            }

            let mut cfg = CommandConfiguration {
                resources: catalog_cfg.resources.clone(),
                command_groups: Vec::new(),
            };
            for r in cfg.resources.iter_mut() {
                r.swagger = Some(module.to_string());
            }
            for names in catalog_cfg.command_names() {
                let Some(command) = catalog_cfg.find_command(&names) else {
                    continue;
                };
                let target = if names.starts_with(node_names) {
                    names.clone()
                } else {
                    let mut t = node_names.to_vec();
                    t.extend(names.iter().cloned());
                    t
                };
                validate_command_names(&target)?;
                let (last, parent) = target
                    .split_last()
                    .ok_or_else(|| EditorError::invalid("Empty command name"))?;
                if ws.command_tree.find_leaf(parent, last).is_some()
                    || ws.command_tree.find_node(&target).is_some()
                    || !claimed.insert(target.clone())
                {
                    anyhow::bail!(EditorError::conflict(format!(
                        "Command '{}' already exists",
                        target.join(" ")
                    )));
                }
                let mut command = command.clone();
                command.resources = cfg.resources.clone();
                cfg.insert_command(&target, command);
            }
            imported.push(cfg);
        }

        let tree = &mut self.ws_mut()?.command_tree;
        for cfg in &imported {
            for names in cfg.command_names() {
                let Some(command) = cfg.find_command(&names) else {
                    continue;
                };
                let Some((last, parent)) = names.split_last() else {
                    continue;
                };
                let leaf = TreeLeaf {
                    names: names.clone(),
                    help: command.help.clone(),
                    stage: command.stage,
                    version: command.version.clone(),
                    resources: cfg.resources.clone(),
                };
                tree.ensure_node(parent).commands.insert(last.clone(), leaf);
            }
        }
        info!(
            "Imported {} resource(s) from module '{}' at version {}",
            imported.len(),
            module,
            version
        );
        self.cfgs.extend(imported);
        self.sync_resources()
    }

    /// Folds the commands of the plus resource into those of the main resource.
    ///
    /// Every plus command is paired with a main command of the same command
    /// name running the same sequence of HTTP methods. Returns `Ok(false)`
    /// when the resources cannot be merged.
    pub fn merge_resources(
        &mut self,
        main_id: &str,
        main_version: &str,
        plus_id: &str,
        plus_version: &str,
    ) -> Result<bool> {
        let (Some(main_idx), Some(plus_idx)) = (
            self.cfg_index(main_id, main_version),
            self.cfg_index(plus_id, plus_version),
        ) else {
            debug!("Merge rejected: resource not bound to the workspace");
            return Ok(false);
        };
        if main_idx == plus_idx {
            debug!("Merge rejected: resources already share a configuration");
            return Ok(false);
        }

        let main = &self.cfgs[main_idx];
        let plus = &self.cfgs[plus_idx];
        let mut pairs: Vec<(Vec<String>, Vec<String>)> = Vec::new();
        for plus_names in plus.command_names() {
            let Some(plus_cmd) = plus.find_command(&plus_names) else {
                return Ok(false);
            };
            let methods: Vec<_> = plus_cmd
                .operations
                .iter()
                .map(|o| o.http.request.method)
                .collect();
            let counterpart = main.command_names().into_iter().find(|main_names| {
                main_names.last() == plus_names.last()
                    && !pairs.iter().any(|(m, _)| m == main_names)
                    && main.find_command(main_names).is_some_and(|c| {
                        c.operations
                            .iter()
                            .map(|o| o.http.request.method)
                            .collect::<Vec<_>>()
                            == methods
                    })
            });
            match counterpart {
                Some(main_names) => pairs.push((main_names, plus_names)),
                None => {
                    debug!(
                        "Merge rejected: no counterpart for '{}'",
                        plus_names.join(" ")
                    );
                    return Ok(false);
                }
            }
        }

        let plus = self.cfgs.remove(plus_idx);
        let main_idx = if plus_idx < main_idx { main_idx - 1 } else { main_idx };
        let main = &mut self.cfgs[main_idx];
        for r in &plus.resources {
            if !main.contains_resource(&r.id, &r.version) {
                main.resources.push(r.clone());
            }
        }
        let merged_resources = main.resources.clone();
        for (main_names, plus_names) in &pairs {
            let (Some(plus_cmd), Some(main_cmd)) =
                (plus.find_command(plus_names), main.find_command_mut(main_names))
            else {
                continue;
            };
            main_cmd.operations.extend(plus_cmd.operations.iter().cloned());
            for group in &plus_cmd.arg_groups {
                for arg in &group.args {
                    if main_cmd.has_arg(&arg.var) {
                        continue;
                    }
                    let mut arg = arg.clone();
                    // Only one of the merged operations runs per call.
                    arg.required = false;
                    match main_cmd.arg_groups.iter_mut().find(|g| g.name == group.name) {
                        Some(g) => g.args.push(arg),
                        None => main_cmd.arg_groups.push(ArgGroup {
                            name: group.name.clone(),
                            args: vec![arg],
                        }),
                    }
                }
            }
            main_cmd.resources = merged_resources.clone();
        }
        let main_names: Vec<Vec<String>> = main.command_names();

        let tree = &mut self.ws_mut()?.command_tree;
        for (_, plus_names) in &pairs {
            tree.remove_leaf(plus_names);
        }
        for names in &main_names {
            if let Some((last, parent)) = names.split_last() {
                if let Some(leaf) = tree.find_leaf_mut(parent, last) {
                    leaf.resources = merged_resources.clone();
                }
            }
        }
        self.sync_resources()?;
        info!(
            "Merged resource '{}' into '{}'",
            plus_id, main_id
        );
        Ok(true)
    }

    /// Drops the configuration bound to a resource and all of its commands.
    /// Returns `Ok(false)` when the resource is not part of the workspace.
    pub fn remove_resource(&mut self, id: &str, version: &str) -> Result<bool> {
        validate_version(version)?;
        let Some(idx) = self.cfg_index(id, version) else {
            return Ok(false);
        };
        let cfg = self.cfgs.remove(idx);
        let tree = &mut self.ws_mut()?.command_tree;
        for names in cfg.command_names() {
            tree.remove_leaf(&names);
        }
        self.sync_resources()?;
        info!("Removed resource '{}' ({})", id, version);
        Ok(true)
    }

    /// Every leaf of the workspace paired with its configured command.
    pub fn commands(&self) -> Result<Vec<(&TreeLeaf, &Command)>> {
        let ws = self.ws()?;
        let mut result = Vec::new();
        for leaf in ws.command_tree.leaves() {
            result.push((leaf, self.find_command(leaf)?));
        }
        Ok(result)
    }
}
