//! # AAZ Editor Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! Functionality lives in `io`; import from the submodule directly:
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! io::write_json(&folder.join("ws.json"), &workspace)?;
//! ```
//!

/// Directory creation, text and JSON file I/O, modification times.
pub mod io;
