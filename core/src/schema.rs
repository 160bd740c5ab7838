//! Plugin-supplied type descriptions and compiled metadata schemas.

use std::fmt;

use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::keys::{KeySequence, Terminal};
use crate::normalize::{normalize_meta_schema, relax_meta_schema};

/// Errors raised while assembling a schema graph.
///
/// These indicate a buggy type description shipped by a plugin, not user
/// input: callers are expected to surface them loudly rather than degrade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A type description has an empty identifier.
    #[error("type identifier cannot be empty")]
    EmptyTypeId,

    /// The requested root type is not among the descriptions.
    #[error("unknown root type: {0}")]
    UnknownRootType(String),

    /// A child reference points at a type with no description.
    #[error("type {parent} references unknown child type {child}")]
    UnknownChildType {
        /// The referencing type.
        parent: String,
        /// The missing child identifier.
        child: String,
    },

    /// A metadata schema failed to compile as JSON Schema.
    #[error("invalid metadata schema for type {type_id}: {message}")]
    InvalidMetaSchema {
        /// The type whose schema is malformed.
        type_id: String,
        /// The underlying compilation error.
        message: String,
    },
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Description of one entry type, as supplied by a plugin.
///
/// Descriptions are flat: children are referenced by identifier, so cyclic
/// type graphs (a volume directory containing volume directories) are
/// expressed without recursion.
///
/// # Examples
///
/// ```
/// use vfind_core::TypeDescription;
/// use serde_json::json;
///
/// let dir = TypeDescription::new("vol/dir", "dir")
///     .with_child("vol/dir")
///     .with_child("vol/file")
///     .with_action("list");
/// assert_eq!(dir.children, vec!["vol/dir", "vol/file"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescription {
    /// Unique type identifier (e.g. "docker/container").
    pub type_id: String,
    /// Human-readable label.
    pub label: String,
    /// Whether at most one instance of this type exists under its parent.
    #[serde(default)]
    pub singleton: bool,
    /// Actions the type supports.
    #[serde(default)]
    pub actions: Vec<String>,
    /// Raw JSON-schema shape of the type's metadata, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_schema: Option<Value>,
    /// Identifiers of structural child types.
    #[serde(default)]
    pub children: Vec<String>,
}

impl TypeDescription {
    /// Creates a description with the given identifier and label.
    pub fn new(type_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            label: label.into(),
            singleton: false,
            actions: Vec::new(),
            meta_schema: None,
            children: Vec::new(),
        }
    }

    /// Marks the type as a singleton.
    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    /// Adds a supported action.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Sets the metadata shape schema.
    pub fn with_meta_schema(mut self, schema: Value) -> Self {
        self.meta_schema = Some(schema);
        self
    }

    /// Adds a child type reference.
    pub fn with_child(mut self, type_id: impl Into<String>) -> Self {
        self.children.push(type_id.into());
        self
    }
}

/// A metadata shape schema, normalized and pre-compiled for structural
/// queries.
///
/// Two validators back each schema: the standard normalization (which keeps
/// the coarse `minProperties: 1` standing in for `required`), and a fully
/// relaxed variant used by existence-only sequences.
pub struct CompiledMetaSchema {
    normalized: Value,
    standard: JSONSchema,
    relaxed: JSONSchema,
}

impl CompiledMetaSchema {
    /// Normalizes and compiles a raw metadata schema.
    ///
    /// Fails with [`SchemaError::InvalidMetaSchema`] when the schema is not
    /// valid JSON Schema — a plugin bug, surfaced loudly.
    pub fn compile(type_id: &str, raw: &Value) -> Result<Self> {
        let normalized = normalize_meta_schema(raw);
        let relaxed_value = relax_meta_schema(raw);
        let standard = JSONSchema::compile(&normalized).map_err(|e| {
            SchemaError::InvalidMetaSchema {
                type_id: type_id.to_string(),
                message: e.to_string(),
            }
        })?;
        let relaxed = JSONSchema::compile(&relaxed_value).map_err(|e| {
            SchemaError::InvalidMetaSchema {
                type_id: type_id.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            normalized,
            standard,
            relaxed,
        })
    }

    /// Checks whether a conforming metadata document could contain the key
    /// sequence.
    ///
    /// The sequence's canonical instance(s) are validated structurally;
    /// existence-only sequences try all three leaf kinds against the relaxed
    /// validator and admit on any hit.
    pub fn admits(&self, sequence: &KeySequence) -> bool {
        let validator = match sequence.terminal() {
            Terminal::Any => &self.relaxed,
            _ => &self.standard,
        };
        sequence
            .canonical_values()
            .iter()
            .any(|instance| validator.is_valid(instance))
    }

    /// The normalized schema document.
    pub fn normalized(&self) -> &Value {
        &self.normalized
    }
}

impl fmt::Debug for CompiledMetaSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMetaSchema")
            .field("normalized", &self.normalized)
            .finish_non_exhaustive()
    }
}

/// One assembled node of the schema graph.
#[derive(Debug)]
pub struct SchemaNode {
    type_id: String,
    label: String,
    singleton: bool,
    actions: Vec<String>,
    meta: Option<CompiledMetaSchema>,
    children: Vec<String>,
}

impl SchemaNode {
    pub(crate) fn from_description(description: TypeDescription) -> Result<Self> {
        if description.type_id.trim().is_empty() {
            return Err(SchemaError::EmptyTypeId);
        }
        let meta = match &description.meta_schema {
            Some(raw) => Some(CompiledMetaSchema::compile(&description.type_id, raw)?),
            None => None,
        };
        Ok(Self {
            type_id: description.type_id,
            label: description.label,
            singleton: description.singleton,
            actions: description.actions,
            meta,
            children: description.children,
        })
    }

    /// The unique type identifier.
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// The human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether at most one instance exists under the parent.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Actions the type supports.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Checks whether the type supports the named action.
    pub fn supports_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    /// The compiled metadata shape, when the plugin shipped one.
    pub fn meta_schema(&self) -> Option<&CompiledMetaSchema> {
        self.meta.as_ref()
    }

    /// Identifiers of structural child types.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<String> {
        &mut self.children
    }
}
