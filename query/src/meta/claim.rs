//! The schema facet of metadata predicates.
//!
//! While the meta grammar builds value predicates, it builds a parallel
//! [`SchemaClaim`] tree recording what each predicate asserts about the
//! *shape* of conforming metadata. Claims stay symbolic — a tree of key
//! sequences under boolean connectives — until they are evaluated against a
//! concrete type's [`CompiledMetaSchema`], because object/array predicates
//! keep prepending path segments to every sequence underneath them as the
//! grammar unwinds.

use vfind_core::{CompiledMetaSchema, KeySequence};

/// What a metadata predicate asserts about a metadata schema.
///
/// Evaluation is deliberately two-sided — "could a conforming document
/// match" and "could one fail" — mirroring
/// [`SchemaPredicate`](crate::SchemaPredicate) so negation stays sound at
/// the type level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaClaim {
    /// Asserts nothing about shape; matches (or fails) regardless.
    Const(bool),
    /// Asserts that a conforming document can contain this path.
    Path(KeySequence),
    /// Complement.
    Not(Box<SchemaClaim>),
    /// Conjunction.
    And(Box<SchemaClaim>, Box<SchemaClaim>),
    /// Disjunction.
    Or(Box<SchemaClaim>, Box<SchemaClaim>),
}

impl SchemaClaim {
    /// The claim of a predicate over a primitive leaf value.
    pub fn primitive_leaf() -> Self {
        Self::Path(KeySequence::primitive())
    }

    /// The claim of an existence test: any leaf kind will do.
    pub fn existence_leaf() -> Self {
        Self::Path(KeySequence::existence())
    }

    /// Returns the claim with an object access prepended to every path
    /// underneath it.
    pub fn with_object_prefix(&self, key: &str) -> Self {
        self.map_paths(&|ks| ks.with_object_prefix(key))
    }

    /// Returns the claim with an array access prepended to every path
    /// underneath it.
    pub fn with_array_prefix(&self) -> Self {
        self.map_paths(&|ks| ks.with_array_prefix())
    }

    fn map_paths(&self, f: &dyn Fn(&KeySequence) -> KeySequence) -> Self {
        match self {
            Self::Const(b) => Self::Const(*b),
            Self::Path(ks) => Self::Path(f(ks)),
            Self::Not(inner) => Self::Not(Box::new(inner.map_paths(f))),
            Self::And(a, b) => Self::And(Box::new(a.map_paths(f)), Box::new(b.map_paths(f))),
            Self::Or(a, b) => Self::Or(Box::new(a.map_paths(f)), Box::new(b.map_paths(f))),
        }
    }

    /// Could a document conforming to `schema` satisfy the predicate this
    /// claim belongs to?
    pub fn can_match(&self, schema: &CompiledMetaSchema) -> bool {
        match self {
            Self::Const(b) => *b,
            Self::Path(ks) => schema.admits(ks),
            Self::Not(inner) => inner.can_fail(schema),
            Self::And(a, b) => a.can_match(schema) && b.can_match(schema),
            Self::Or(a, b) => a.can_match(schema) || b.can_match(schema),
        }
    }

    /// Could a conforming document fail the predicate?
    ///
    /// Path claims always answer yes: a schema admitting a path does not
    /// force every instance to contain it, let alone with a matching value.
    pub fn can_fail(&self, schema: &CompiledMetaSchema) -> bool {
        match self {
            Self::Const(b) => !*b,
            Self::Path(_) => true,
            Self::Not(inner) => inner.can_match(schema),
            Self::And(a, b) => a.can_fail(schema) || b.can_fail(schema),
            Self::Or(a, b) => a.can_fail(schema) && b.can_fail(schema),
        }
    }
}
