//! # AAZ Editor Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types shared by the workspace manager, the
//! code generator and the editor API.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `EditorError`: A custom error enum using `thiserror` for the failures that
//!   callers need to tell apart (bad input, missing or conflicting resources).
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible propagation.
//!
//! The API layer downcasts an `anyhow::Error` back to `EditorError` to choose
//! the HTTP status code:
//!
//! ```rust
//! match err.downcast_ref::<EditorError>() {
//!     Some(EditorError::ResourceNotFound(_)) => StatusCode::NOT_FOUND,
//!     Some(EditorError::ResourceConflict(_)) => StatusCode::CONFLICT,
//!     Some(EditorError::InvalidApiUsage(_)) => StatusCode::BAD_REQUEST,
//!     _ => StatusCode::INTERNAL_SERVER_ERROR,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the editor.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("{0}")]
    InvalidApiUsage(String),

    #[error("{0}")]
    ResourceNotFound(String),

    #[error("{0}")]
    ResourceConflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },
}

impl EditorError {
    /// Shorthand for the most common 400 case.
    pub fn invalid(msg: impl Into<String>) -> Self {
        EditorError::InvalidApiUsage(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        EditorError::ResourceNotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        EditorError::ResourceConflict(msg.into())
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
