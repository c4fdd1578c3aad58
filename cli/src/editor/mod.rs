//! # Workspace Editing
//!
//! File: cli/src/editor/mod.rs
//!
//! State manipulation of editor workspaces. All reads and writes of
//! workspace folders go through `manager::WorkspaceManager`; the HTTP API
//! and the CLI subcommands are thin callers.
//!
pub mod manager;

#[cfg(test)]
pub mod testing;

pub use manager::{WorkspaceManager, WorkspaceSummary};
