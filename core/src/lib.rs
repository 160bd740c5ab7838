//! Core data model for the vfind query engine.
//!
//! This crate defines the types the query compiler evaluates against:
//!
//! - [`Entry`] — one node of the virtual hierarchy (name, path, attributes,
//!   supported actions, optional metadata, type link).
//! - [`TypeDescription`] / [`SchemaNode`] / [`SchemaGraph`] — the universe of
//!   possible entry types as a directed graph (cycles and diamonds allowed),
//!   assembled from plugin-supplied descriptions and prunable against a
//!   schema predicate.
//! - [`KeySequence`] — an object/array access path through a JSON value with
//!   a terminal value-kind marker, renderable as a minimal canonical
//!   instance for structural schema checks.
//! - [`CompiledMetaSchema`] — a normalized, pre-compiled metadata shape that
//!   answers "could this type's metadata contain this key sequence" without
//!   fetching any instance data.
//!
//! # Example
//!
//! ```
//! use vfind_core::{KeySequence, SchemaGraph, TypeDescription};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": { "state": { "type": "string" } }
//! });
//! let container = TypeDescription::new("docker/container", "container")
//!     .with_meta_schema(schema);
//! let graph = SchemaGraph::assemble("docker/container", vec![container]).unwrap();
//!
//! let state = KeySequence::primitive().with_object_prefix("state");
//! let node = graph.node("docker/container").unwrap();
//! assert!(node.meta_schema().unwrap().admits(&state));
//!
//! let missing = KeySequence::primitive().with_object_prefix("nope");
//! assert!(!node.meta_schema().unwrap().admits(&missing));
//! ```

mod entry;
mod graph;
mod keys;
mod normalize;
mod schema;

pub use entry::{Entry, EntryAttributes};
pub use graph::SchemaGraph;
pub use keys::{KeySequence, Segment, Terminal};
pub use normalize::{normalize_meta_schema, relax_meta_schema};
pub use schema::{CompiledMetaSchema, SchemaError, SchemaNode, TypeDescription};
