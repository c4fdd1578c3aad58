//! # AAZ Editor Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Top-level commands of the `aaz-editor` CLI. Each module defines its
//! argument struct and an async `handle_*` entry point called from `main.rs`.
//!
//! - `serve`: the workspace editor HTTP API
//! - `workspace`: offline list, create, show and delete of workspaces
//! - `generate`: renders a workspace into Python command modules
//!

pub mod generate;
pub mod serve;
pub mod workspace;
