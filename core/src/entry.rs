//! Entry data model.
//!
//! An [`Entry`] is one node of the virtual hierarchy: a container, a cloud
//! instance, a cluster object, a log file. The engine only ever reads these
//! fields; fetching them is the transport layer's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attributes reported for an entry.
///
/// Every field is optional except `meta`: heterogeneous backends rarely
/// support the full set, and a predicate over an absent attribute evaluates
/// to `false` rather than erroring.
///
/// # Examples
///
/// ```
/// use vfind_core::EntryAttributes;
///
/// let attrs = EntryAttributes::default().with_size(4096);
/// assert_eq!(attrs.size, Some(4096));
/// assert!(attrs.mtime.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryAttributes {
    /// Last access time.
    pub atime: Option<DateTime<Utc>>,
    /// Last modification time.
    pub mtime: Option<DateTime<Utc>>,
    /// Change time.
    pub ctime: Option<DateTime<Utc>>,
    /// Unix-style mode bits, where the backend has a notion of them.
    pub mode: Option<u32>,
    /// Size in bytes.
    pub size: Option<u64>,
    /// Partial metadata included with the attributes, as reported by the
    /// backend. `Value::Null` when the backend reports none.
    #[serde(default)]
    pub meta: Value,
}

impl EntryAttributes {
    /// Sets the size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the modification time.
    pub fn with_mtime(mut self, mtime: DateTime<Utc>) -> Self {
        self.mtime = Some(mtime);
        self
    }

    /// Sets the access time.
    pub fn with_atime(mut self, atime: DateTime<Utc>) -> Self {
        self.atime = Some(atime);
        self
    }

    /// Sets the change time.
    pub fn with_ctime(mut self, ctime: DateTime<Utc>) -> Self {
        self.ctime = Some(ctime);
        self
    }

    /// Sets the partial metadata.
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = meta;
        self
    }
}

/// One node of the virtual hierarchy.
///
/// # Examples
///
/// ```
/// use vfind_core::{Entry, EntryAttributes};
///
/// let entry = Entry::new("web-1", "docker/containers/web-1")
///     .with_attributes(EntryAttributes::default().with_size(1024))
///     .with_action("exec")
///     .with_type_id("docker/container");
///
/// assert_eq!(entry.canonical_name, "web-1");
/// assert!(entry.supports_action("exec"));
/// assert!(!entry.supports_action("stream"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Name uniquified within the parent, used by `-name`.
    pub canonical_name: String,
    /// Full path from the namespace root, used by `-path`.
    pub path: String,
    /// Attributes reported by the backend.
    #[serde(default)]
    pub attributes: EntryAttributes,
    /// Full metadata, present only when the walker has already fetched it.
    /// The meta primary prefers this over `attributes.meta`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Actions the backend supports on this entry (e.g. "exec", "stream").
    #[serde(default)]
    pub supported_actions: Vec<String>,
    /// Type identifier linking the entry to its [`SchemaNode`], when the
    /// backend ships a type schema at all.
    ///
    /// [`SchemaNode`]: crate::SchemaNode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
}

impl Entry {
    /// Creates an entry with the given canonical name and path.
    pub fn new(canonical_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            path: path.into(),
            attributes: EntryAttributes::default(),
            metadata: None,
            supported_actions: Vec::new(),
            type_id: None,
        }
    }

    /// Sets the attributes.
    pub fn with_attributes(mut self, attributes: EntryAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets the full metadata.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Adds a supported action.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.supported_actions.push(action.into());
        self
    }

    /// Sets the type identifier.
    pub fn with_type_id(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    /// Checks whether the entry supports the named action.
    pub fn supports_action(&self, action: &str) -> bool {
        self.supported_actions.iter().any(|a| a == action)
    }

    /// The metadata the meta primary evaluates: the full document when the
    /// walker has fetched it, otherwise the partial copy in the attributes.
    pub fn meta_value(&self) -> &Value {
        self.metadata.as_ref().unwrap_or(&self.attributes.meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_builders() {
        let entry = Entry::new("db-1", "aws/ec2/db-1")
            .with_action("exec")
            .with_type_id("aws/ec2Instance");

        assert_eq!(entry.path, "aws/ec2/db-1");
        assert!(entry.supports_action("exec"));
        assert_eq!(entry.type_id.as_deref(), Some("aws/ec2Instance"));
    }

    #[test]
    fn test_meta_value_prefers_full_metadata() {
        let partial = Entry::new("a", "p")
            .with_attributes(EntryAttributes::default().with_meta(json!({"partial": true})));
        assert_eq!(partial.meta_value(), &json!({"partial": true}));

        let full = partial.with_metadata(json!({"full": true}));
        assert_eq!(full.meta_value(), &json!({"full": true}));
    }

    #[test]
    fn test_entry_round_trips_through_json() {
        let entry = Entry::new("web-1", "docker/containers/web-1")
            .with_attributes(EntryAttributes::default().with_size(2048))
            .with_action("exec");

        let text = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&text).unwrap();
        assert_eq!(back.canonical_name, "web-1");
        assert_eq!(back.attributes.size, Some(2048));
        assert_eq!(back.supported_actions, vec!["exec".to_string()]);
    }
}
