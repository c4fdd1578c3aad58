//! # AAZ Editor Data Model
//!
//! File: cli/src/model/mod.rs
//!
//! Serializable documents shared by the workspace manager, the editor API
//! and the code generator:
//! - `schema`: typed response schema trees
//! - `operation`: HTTP operation descriptors
//! - `command`: command configurations, arguments, resources
//! - `tree`: the command tree and the workspace document
//!
pub mod command;
pub mod operation;
pub mod schema;
pub mod tree;

pub use command::{
    Arg, ArgGroup, ArgType, Command, CommandConfiguration, CommandGroup, Example, Help, Output,
    Resource, Stage,
};
pub use operation::{HttpAction, HttpMethod, HttpOperation, HttpParam, HttpRequest, HttpResponse};
pub use schema::{Property, Schema, SchemaKind};
pub use tree::{Plane, TreeLeaf, TreeNode, Workspace, COMMAND_TREE_ROOT_NAME};
