//! Key sequences: access paths through JSON-shaped metadata.
//!
//! A [`KeySequence`] records how a metadata predicate will navigate a JSON
//! value — object accesses by key, array accesses — and what kind of value
//! it expects at the end. It is built bottom-up while the meta grammar
//! unwinds: the innermost (primitive) predicate starts the sequence and each
//! enclosing object/array predicate prepends its own segment.
//!
//! The same sequence doubles as a schema-analysis artifact: rendering it as
//! a minimal canonical JSON instance lets a schema validator answer "could a
//! conforming document contain this path" without any instance data.

use serde_json::{Map, Value, json};

/// One access step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object access with a key. Matching is case-insensitive, so the key is
    /// stored as written and upper-cased at render time.
    Object(String),
    /// Array access. Flavor (`[?]`, `[*]`, `[N]`) is irrelevant at the
    /// schema level, so the segment carries no payload.
    Array,
}

/// What the sequence expects at its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// A primitive value (string, number, boolean, null).
    Primitive,
    /// An object value.
    Object,
    /// An array value.
    Array,
    /// Existence only — the terminal kind is irrelevant.
    Any,
}

/// An ordered object/array access path with a terminal value-kind marker.
///
/// Every mutator returns a new value; sequences are immutable once built.
///
/// # Examples
///
/// ```
/// use vfind_core::KeySequence;
/// use serde_json::json;
///
/// // Built inside-out for the query `.containers[?].state <primitive>`:
/// let ks = KeySequence::primitive()
///     .with_object_prefix("state")
///     .with_array_prefix()
///     .with_object_prefix("containers");
///
/// assert_eq!(ks.canonical_values(), vec![json!({"CONTAINERS": [{"STATE": null}]})]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySequence {
    segments: Vec<Segment>,
    terminal: Terminal,
}

impl KeySequence {
    /// A sequence ending in a primitive value.
    pub fn primitive() -> Self {
        Self::ending_in(Terminal::Primitive)
    }

    /// A sequence ending in an object value.
    pub fn object() -> Self {
        Self::ending_in(Terminal::Object)
    }

    /// A sequence ending in an array value.
    pub fn array() -> Self {
        Self::ending_in(Terminal::Array)
    }

    /// A sequence that only asserts existence of the path.
    pub fn existence() -> Self {
        Self::ending_in(Terminal::Any)
    }

    fn ending_in(terminal: Terminal) -> Self {
        Self {
            segments: Vec::new(),
            terminal,
        }
    }

    /// Returns a new sequence with an object access prepended.
    pub fn with_object_prefix(&self, key: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.push(Segment::Object(key.into()));
        segments.extend(self.segments.iter().cloned());
        Self {
            segments,
            terminal: self.terminal,
        }
    }

    /// Returns a new sequence with an array access prepended.
    pub fn with_array_prefix(&self) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.push(Segment::Array);
        segments.extend(self.segments.iter().cloned());
        Self {
            segments,
            terminal: self.terminal,
        }
    }

    /// The access steps, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The terminal marker.
    pub fn terminal(&self) -> Terminal {
        self.terminal
    }

    /// Renders the minimal canonical instance(s) for this sequence.
    ///
    /// Object keys are upper-cased to line up with normalized schemas (see
    /// [`normalize_meta_schema`](crate::normalize_meta_schema)). A terminal
    /// of [`Terminal::Any`] yields three instances, one per possible leaf
    /// kind; the others yield exactly one.
    pub fn canonical_values(&self) -> Vec<Value> {
        let leaves: Vec<Value> = match self.terminal {
            Terminal::Primitive => vec![Value::Null],
            Terminal::Object => vec![json!({})],
            Terminal::Array => vec![json!([])],
            Terminal::Any => vec![Value::Null, json!({}), json!([])],
        };
        leaves
            .into_iter()
            .map(|leaf| self.wrap_leaf(leaf))
            .collect()
    }

    fn wrap_leaf(&self, leaf: Value) -> Value {
        self.segments.iter().rev().fold(leaf, |inner, segment| {
            match segment {
                Segment::Object(key) => {
                    let mut map = Map::with_capacity(1);
                    map.insert(key.to_uppercase(), inner);
                    Value::Object(map)
                }
                Segment::Array => Value::Array(vec![inner]),
            }
        })
    }
}
