//! # Command Configuration Model
//!
//! File: cli/src/model/command.rs
//!
//! ## Overview
//!
//! A command configuration is the declarative description of every command
//! built on top of one API resource: its arguments, the HTTP operations it
//! runs and what it outputs. The workspace keeps one configuration per
//! primary resource; the generator renders each command into a Python
//! module.
//!
//! ## Layout
//!
//! ```text
//! CommandConfiguration
//! ├── resources: [Resource]            first entry is the primary resource
//! └── commandGroups: [CommandGroup]    "databricks workspace vnet-peering"
//!     └── commands: [Command]          "list"
//!         ├── argGroups / args
//!         ├── operations: [HttpOperation]
//!         └── outputs
//! ```
//!
use super::operation::HttpOperation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle flag of a command group or command.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    Experimental,
    Preview,
    #[default]
    Stable,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Experimental => "Experimental",
            Stage::Preview => "Preview",
            Stage::Stable => "Stable",
        };
        f.write_str(s)
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Experimental" => Ok(Stage::Experimental),
            "Preview" => Ok(Stage::Preview),
            "Stable" => Ok(Stage::Stable),
            other => Err(format!("Invalid stage '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Help {
    pub short: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
}

/// An API resource (ARM resource id template + api version) bound to commands.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,
}

impl Resource {
    pub fn new(id: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            version: version.to_string(),
            swagger: None,
        }
    }

    pub fn is(&self, id: &str, version: &str) -> bool {
        self.id == id && self.version == version
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ArgType {
    String,
    Integer,
    Float,
    Boolean,
    ResourceGroup,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Arg {
    /// Python attribute name of the argument, e.g. `workspace_name`.
    pub var: String,
    #[serde(rename = "type")]
    pub arg_type: ArgType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArgGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub args: Vec<Arg>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub var: String,
    #[serde(default)]
    pub client_flatten: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Example {
    pub name: String,
    pub commands: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<Help>,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub arg_groups: Vec<ArgGroup>,
    #[serde(default)]
    pub operations: Vec<HttpOperation>,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
}

impl Command {
    /// Whether `arg` names an argument declared by this command.
    pub fn has_arg(&self, var: &str) -> bool {
        self.arg_groups
            .iter()
            .flat_map(|g| g.args.iter())
            .any(|a| a.var == var)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommandGroup {
    /// Space separated group names, e.g. `databricks workspace vnet-peering`.
    pub name: String,
    #[serde(default)]
    pub commands: Vec<Command>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommandConfiguration {
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub command_groups: Vec<CommandGroup>,
}

fn split_names(names: &[String]) -> Option<(String, &str)> {
    let (last, groups) = names.split_last()?;
    Some((groups.join(" "), last.as_str()))
}

impl CommandConfiguration {
    pub fn primary_resource(&self) -> Option<&Resource> {
        self.resources.first()
    }

    pub fn contains_resource(&self, id: &str, version: &str) -> bool {
        self.resources.iter().any(|r| r.is(id, version))
    }

    /// Finds a command by its full name path (groups + command name).
    pub fn find_command(&self, names: &[String]) -> Option<&Command> {
        let (group, name) = split_names(names)?;
        self.command_groups
            .iter()
            .find(|g| g.name == group)?
            .commands
            .iter()
            .find(|c| c.name == name)
    }

    pub fn find_command_mut(&mut self, names: &[String]) -> Option<&mut Command> {
        let (group, name) = split_names(names)?;
        self.command_groups
            .iter_mut()
            .find(|g| g.name == group)?
            .commands
            .iter_mut()
            .find(|c| c.name == name)
    }

    /// Full name paths of every command in the configuration.
    pub fn command_names(&self) -> Vec<Vec<String>> {
        self.command_groups
            .iter()
            .flat_map(|g| {
                g.commands.iter().map(move |c| {
                    let mut names: Vec<String> =
                        g.name.split_whitespace().map(str::to_string).collect();
                    names.push(c.name.clone());
                    names
                })
            })
            .collect()
    }

    pub fn insert_command(&mut self, names: &[String], mut command: Command) {
        let Some((group, name)) = split_names(names) else {
            return;
        };
        command.name = name.to_string();
        match self.command_groups.iter_mut().find(|g| g.name == group) {
            Some(g) => g.commands.push(command),
            None => self.command_groups.push(CommandGroup {
                name: group,
                commands: vec![command],
            }),
        }
    }

    /// Removes a command; groups left empty are dropped.
    pub fn remove_command(&mut self, names: &[String]) -> Option<Command> {
        let (group, name) = split_names(names)?;
        let g = self.command_groups.iter_mut().find(|g| g.name == group)?;
        let idx = g.commands.iter().position(|c| c.name == name)?;
        let removed = g.commands.remove(idx);
        self.command_groups.retain(|g| !g.commands.is_empty());
        Some(removed)
    }

    pub fn rename_command(&mut self, names: &[String], new_names: &[String]) -> bool {
        match self.remove_command(names) {
            Some(command) => {
                self.insert_command(new_names, command);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.command_groups.iter().all(|g| g.commands.is_empty())
    }
}
