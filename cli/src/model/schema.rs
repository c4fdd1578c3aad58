//! # Response Schema Model
//!
//! File: cli/src/model/schema.rs
//!
//! ## Overview
//!
//! A typed tree describing the body of an HTTP response. Leaves are
//! primitives; inner nodes are objects (named properties), arrays and dicts
//! (a single element schema). The JSON form is internally tagged on `type`:
//!
//! ```json
//! {
//!   "type": "object",
//!   "props": [
//!     { "name": "nextLink", "type": "string" },
//!     { "name": "value", "type": "array", "item": { "type": "object", "props": [] } }
//!   ]
//! }
//! ```
//!
use serde::{Deserialize, Serialize};

/// Shape of a schema node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaKind {
    String,
    Integer,
    Float,
    Boolean,
    Object {
        #[serde(default)]
        props: Vec<Property>,
    },
    Array {
        item: Box<Schema>,
    },
    Dict {
        item: Box<Schema>,
    },
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A schema node: its kind plus the flags the generator emits.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(flatten)]
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub client_flatten: bool,
    /// Name of the shared definition this node was resolved from. Such
    /// nodes are built once per generated module and reused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls: Option<String>,
}

/// A named member of an object schema. `name` is the wire name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    #[serde(flatten)]
    pub schema: Schema,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            read_only: false,
            required: false,
            client_flatten: false,
            cls: None,
        }
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    pub fn object(props: Vec<Property>) -> Self {
        Self::new(SchemaKind::Object { props })
    }

    pub fn array(item: Schema) -> Self {
        Self::new(SchemaKind::Array {
            item: Box::new(item),
        })
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn client_flatten(mut self) -> Self {
        self.client_flatten = true;
        self
    }

    pub fn shared(mut self, name: &str) -> Self {
        self.cls = Some(name.to_string());
        self
    }

    pub fn prop(self, name: &str) -> Property {
        Property {
            name: name.to_string(),
            schema: self,
        }
    }

    /// Whether the node has children the generator must describe.
    pub fn has_children(&self) -> bool {
        match &self.kind {
            SchemaKind::Object { props } => !props.is_empty(),
            SchemaKind::Array { .. } | SchemaKind::Dict { .. } => true,
            _ => false,
        }
    }
}
