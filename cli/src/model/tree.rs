//! # Command Tree and Workspace Document
//!
//! File: cli/src/model/tree.rs
//!
//! ## Overview
//!
//! The command tree is the hierarchical namespace of command groups (nodes)
//! and commands (leaves). The root node carries the reserved name `aaz`;
//! every other node and leaf carries its full name path below the root, so
//! the node for `az databricks workspace` has `names = ["databricks", "workspace"]`.
//!
//! A `Workspace` is the document persisted as `ws.json`: the tree plus the
//! list of resources bound to its commands.
//!
use super::command::{Help, Resource, Stage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Name of the root node in URLs and in the root's own `names`.
pub const COMMAND_TREE_ROOT_NAME: &str = "aaz";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TreeLeaf {
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<Help>,
    #[serde(default)]
    pub stage: Stage,
    pub version: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<Help>,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub command_groups: BTreeMap<String, TreeNode>,
    #[serde(default)]
    pub commands: BTreeMap<String, TreeLeaf>,
}

impl TreeNode {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            help: None,
            stage: Stage::default(),
            command_groups: BTreeMap::new(),
            commands: BTreeMap::new(),
        }
    }

    pub fn new_root() -> Self {
        Self::new(vec![COMMAND_TREE_ROOT_NAME.to_string()])
    }

    pub fn find_node(&self, names: &[String]) -> Option<&TreeNode> {
        let mut node = self;
        for name in names {
            node = node.command_groups.get(name)?;
        }
        Some(node)
    }

    pub fn find_node_mut(&mut self, names: &[String]) -> Option<&mut TreeNode> {
        let mut node = self;
        for name in names {
            node = node.command_groups.get_mut(name)?;
        }
        Some(node)
    }

    pub fn find_leaf(&self, node_names: &[String], leaf_name: &str) -> Option<&TreeLeaf> {
        self.find_node(node_names)?.commands.get(leaf_name)
    }

    pub fn find_leaf_mut(&mut self, node_names: &[String], leaf_name: &str) -> Option<&mut TreeLeaf> {
        self.find_node_mut(node_names)?.commands.get_mut(leaf_name)
    }

    /// Walks to `names`, creating missing intermediate nodes.
    pub fn ensure_node(&mut self, names: &[String]) -> &mut TreeNode {
        let mut node = self;
        for (idx, name) in names.iter().enumerate() {
            node = node
                .command_groups
                .entry(name.clone())
                .or_insert_with(|| TreeNode::new(names[..=idx].to_vec()));
        }
        node
    }

    /// Detaches the subtree at `names`. The root itself cannot be removed.
    pub fn remove_node(&mut self, names: &[String]) -> Option<TreeNode> {
        let (last, parent) = names.split_last()?;
        self.find_node_mut(parent)?.command_groups.remove(last)
    }

    /// Detaches a leaf by its full names. Ancestors are left in place.
    pub fn take_leaf(&mut self, leaf_names: &[String]) -> Option<TreeLeaf> {
        let (last, parent) = leaf_names.split_last()?;
        self.find_node_mut(parent)?.commands.remove(last)
    }

    /// Removes a leaf by its full names, then drops ancestors left empty.
    pub fn remove_leaf(&mut self, leaf_names: &[String]) -> Option<TreeLeaf> {
        let leaf = self.take_leaf(leaf_names)?;
        if let Some((_, parent)) = leaf_names.split_last() {
            self.prune_empty(parent);
        }
        Some(leaf)
    }

    /// Drops the node at `names` and its ancestors, bottom up, while they
    /// hold neither groups nor commands. The root is never dropped.
    pub fn prune_empty(&mut self, names: &[String]) {
        let mut depth = names.len();
        while depth > 0 {
            let path = &names[..depth];
            let empty = self
                .find_node(path)
                .map(|n| n.command_groups.is_empty() && n.commands.is_empty())
                .unwrap_or(false);
            if !empty {
                break;
            }
            self.remove_node(path);
            depth -= 1;
        }
    }

    /// Every leaf in the subtree, depth first.
    pub fn leaves(&self) -> Vec<&TreeLeaf> {
        let mut out: Vec<&TreeLeaf> = self.commands.values().collect();
        for child in self.command_groups.values() {
            out.extend(child.leaves());
        }
        out
    }

    /// Every node in the subtree (including `self`), depth first.
    pub fn nodes(&self) -> Vec<&TreeNode> {
        let mut out = vec![self];
        for child in self.command_groups.values() {
            out.extend(child.nodes());
        }
        out
    }

    /// Rewrites the names of this node and its whole subtree under `names`.
    pub fn relabel(&mut self, names: Vec<String>) {
        for (key, leaf) in self.commands.iter_mut() {
            let mut leaf_names = names.clone();
            leaf_names.push(key.clone());
            leaf.names = leaf_names;
        }
        for (key, child) in self.command_groups.iter_mut() {
            let mut child_names = names.clone();
            child_names.push(key.clone());
            child.relabel(child_names);
        }
        self.names = names;
    }

    pub fn set_stage_recursive(&mut self, stage: Stage) {
        self.stage = stage;
        for leaf in self.commands.values_mut() {
            leaf.stage = stage;
        }
        for child in self.command_groups.values_mut() {
            child.set_stage_recursive(stage);
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    #[serde(rename = "mgmt-plane")]
    Mgmt,
    #[serde(rename = "data-plane")]
    Data,
}

impl Plane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plane::Mgmt => "mgmt-plane",
            Plane::Data => "data-plane",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plane {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mgmt-plane" => Ok(Plane::Mgmt),
            "data-plane" => Ok(Plane::Data),
            other => Err(format!("Invalid plane '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub name: String,
    pub plane: Plane,
    pub version: DateTime<Utc>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    pub command_tree: TreeNode,
}

impl Workspace {
    pub fn new(name: &str, plane: Plane) -> Self {
        Self {
            name: name.to_string(),
            plane,
            version: Utc::now(),
            resources: Vec::new(),
            command_tree: TreeNode::new_root(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(s: &str) -> Vec<String> {
        s.split(' ').map(str::to_string).collect()
    }

    fn leaf(full: &str) -> TreeLeaf {
        TreeLeaf {
            names: names(full),
            help: None,
            stage: Stage::Stable,
            version: "2018-04-01".to_string(),
            resources: vec![],
        }
    }

    #[test]
    fn test_ensure_and_find() {
        let mut root = TreeNode::new_root();
        root.ensure_node(&names("databricks workspace"))
            .commands
            .insert("list".to_string(), leaf("databricks workspace list"));

        let node = root.find_node(&names("databricks workspace")).unwrap();
        assert_eq!(node.names, names("databricks workspace"));
        assert_eq!(root.find_node(&names("databricks")).unwrap().names, names("databricks"));
        assert!(root.find_leaf(&names("databricks workspace"), "list").is_some());
        assert!(root.find_leaf(&names("databricks"), "list").is_none());
        assert!(root.find_node(&names("network")).is_none());
        assert_eq!(root.find_node(&[]).unwrap().names, vec!["aaz".to_string()]);
    }

    #[test]
    fn test_relabel_rewrites_descendants() {
        let mut root = TreeNode::new_root();
        root.ensure_node(&names("a b"))
            .commands
            .insert("list".to_string(), leaf("a b list"));
        let mut sub = root.remove_node(&names("a")).unwrap();
        sub.relabel(names("x y"));
        assert_eq!(sub.command_groups["b"].names, names("x y b"));
        assert_eq!(sub.command_groups["b"].commands["list"].names, names("x y b list"));
    }

    #[test]
    fn test_remove_leaf_prunes_empty_groups() {
        let mut root = TreeNode::new_root();
        root.ensure_node(&names("a b"))
            .commands
            .insert("list".to_string(), leaf("a b list"));
        root.ensure_node(&names("a"))
            .commands
            .insert("show".to_string(), leaf("a show"));

        assert!(root.remove_leaf(&names("a b list")).is_some());
        assert!(root.find_node(&names("a b")).is_none());
        assert!(root.find_node(&names("a")).is_some());
        assert!(root.remove_leaf(&names("a show")).is_some());
        assert!(root.command_groups.is_empty());
    }

    #[test]
    fn test_take_leaf_keeps_empty_groups() {
        let mut root = TreeNode::new_root();
        root.ensure_node(&names("a b"))
            .commands
            .insert("list".to_string(), leaf("a b list"));

        assert!(root.take_leaf(&names("a b list")).is_some());
        assert!(root.find_node(&names("a b")).is_some());
        assert!(root.take_leaf(&names("a b list")).is_none());

        root.prune_empty(&names("a b"));
        assert!(root.command_groups.is_empty());
    }

    #[test]
    fn test_workspace_json_uses_camel_case() {
        let ws = Workspace::new("demo", Plane::Mgmt);
        let value = serde_json::to_value(&ws).unwrap();
        assert_eq!(value["plane"], "mgmt-plane");
        assert_eq!(value["commandTree"]["names"][0], "aaz");
        assert!(value["commandTree"]["commandGroups"].is_object());
    }
}
