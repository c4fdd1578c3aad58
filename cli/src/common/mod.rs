//! # AAZ Editor Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared helpers used by the editor, the generator and the API layer,
//! kept apart from command-specific logic (`commands::`) and core
//! infrastructure (`core::`).
//!
//! - **`encoding`**: URL-safe base64 for resource ids in URLs and folder names.
//! - **`fs`**: filesystem operations (directories, JSON documents, timestamps).
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{encoding, fs::io};
//!
//! io::ensure_dir_exists(&folder)?;
//! let segment = encoding::b64encode_str(&resource.id);
//! ```
//!

/// Base64 helpers for path-safe resource ids.
pub mod encoding;
/// Utilities for filesystem operations.
pub mod fs;
