//! # AAZ Editor CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! is compiled as its own crate and runs the built `aaz-editor` binary.
//!

#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// The compiled `aaz-editor` binary.
pub fn aaz_editor_cmd() -> Command {
    Command::cargo_bin("aaz-editor").expect("Failed to find aaz-editor binary for testing")
}

/// `aaz-editor` isolated from the user's configuration, running in `root`
/// with its workspaces in `root/workspaces`.
pub fn isolated_cmd(root: &Path) -> Command {
    let mut cmd = aaz_editor_cmd();
    cmd.current_dir(root)
        .env("HOME", root)
        .env("XDG_CONFIG_HOME", root.join(".config"))
        .env("AAZ_EDITOR_WORKSPACES_DIR", root.join("workspaces"))
        .env_remove("RUST_LOG");
    cmd
}
