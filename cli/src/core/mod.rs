//! # AAZ Editor Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by every command:
//! - `config`: configuration loading, merging and validation
//! - `error`: the `EditorError` enum and the `Result` alias
//! - `templating`: Tera template registry used by the code generator
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{EditorError, Result}; // For error handling
//! use crate::core::templating::TemplateSet; // For code generation
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
