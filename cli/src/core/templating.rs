//! # AAZ Editor Template System
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! This module wraps the Tera templating engine for the code generator.
//! Templates are compiled once into a `TemplateSet` and rendered from any
//! `Serialize` context.
//!
//! ## Architecture
//!
//! 1. Register every template source under its name (`add_raw_templates`),
//!    so templates can `{% include %}` one another.
//! 2. Convert the caller's context with `tera::Context::from_serialize`.
//! 3. Render by name; Tera failures surface as `EditorError::Template` with
//!    the template name as context.
//!
//! Autoescaping only applies to `.html`/`.htm`/`.xml` names in Tera, so the
//! `.py` templates render verbatim.
//!
//! ## Examples
//!
//! ```rust
//! let templates = TemplateSet::from_raw(&[("hello.txt", "Hello {{ name }}")])?;
//! let text = templates.render("hello.txt", &serde_json::json!({"name": "aaz"}))?;
//! assert_eq!(text, "Hello aaz");
//! ```
//!
use crate::core::error::{EditorError, Result};
use anyhow::anyhow;
use serde::Serialize;
use tera::Tera;
use tracing::debug;

/// A compiled set of named templates.
#[derive(Debug)]
pub struct TemplateSet {
    tera: Tera,
}

impl TemplateSet {
    pub fn from_raw(templates: &[(&str, &str)]) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.iter().copied()).map_err(|e| {
            anyhow!(EditorError::Template { source: e }).context("Failed to compile templates")
        })?;
        debug!("Compiled {} template(s)", templates.len());
        Ok(Self { tera })
    }

    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        let tera_context = tera::Context::from_serialize(context).map_err(|e| {
            anyhow!(EditorError::Template { source: e })
                .context(format!("Failed to build context for template '{}'", name))
        })?;
        self.tera.render(name, &tera_context).map_err(|e| {
            anyhow!(EditorError::Template { source: e })
                .context(format!("Tera rendering failed for template '{}'", name))
        })
    }
}
