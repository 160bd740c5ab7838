//! Dual-facet predicates.
//!
//! Every compiled query is one value with two callable facets: a predicate
//! over concrete [`Entry`] values and a predicate over [`SchemaNode`]s. The
//! boolean operations apply to both facets together, so the two views can
//! never drift apart.
//!
//! The schema facet is deliberately a *pair* of closures — "could an entry
//! of this type match" and "could an entry of this type fail". Negation
//! swaps the pair and `and`/`or` combine the sides De Morgan-dually. That
//! keeps the schema level an over-approximation (false positives are fine,
//! false negatives would wrongly prune a satisfying subtree): negating
//! `-name foo`, whose failure set is unknowable per type, degrades to
//! "cannot prune", while negating `-kind`/`-action`, whose failure set is
//! exact, still prunes.

use std::fmt;
use std::sync::Arc;

use vfind_core::{Entry, SchemaNode};

/// Boolean composition shared by every predicate kind in the engine.
pub trait Predicate: Clone {
    /// Logical complement.
    fn negate(&self) -> Self;
    /// Logical conjunction.
    fn and(&self, other: &Self) -> Self;
    /// Logical disjunction.
    fn or(&self, other: &Self) -> Self;
}

type EntryFn = Arc<dyn Fn(&Entry) -> bool + Send + Sync>;
type NodeFn = Arc<dyn Fn(&SchemaNode) -> bool + Send + Sync>;

/// The schema facet: a sound, statically evaluable approximation of an
/// entry predicate over entry *types*.
#[derive(Clone)]
pub struct SchemaPredicate {
    can_match: NodeFn,
    can_fail: NodeFn,
}

impl SchemaPredicate {
    /// Builds a facet from its two sides.
    pub fn new<M, F>(can_match: M, can_fail: F) -> Self
    where
        M: Fn(&SchemaNode) -> bool + Send + Sync + 'static,
        F: Fn(&SchemaNode) -> bool + Send + Sync + 'static,
    {
        Self {
            can_match: Arc::new(can_match),
            can_fail: Arc::new(can_fail),
        }
    }

    /// The facet of a predicate every entry satisfies.
    pub fn always_true() -> Self {
        Self::new(|_| true, |_| false)
    }

    /// The facet of a predicate no entry satisfies.
    pub fn always_false() -> Self {
        Self::new(|_| false, |_| true)
    }

    /// The facet of a predicate the type level knows nothing about.
    pub fn unknown() -> Self {
        Self::new(|_| true, |_| true)
    }

    /// Could an entry of this type satisfy the predicate?
    pub fn is_satisfied_by(&self, node: &SchemaNode) -> bool {
        (self.can_match)(node)
    }

    /// Could an entry of this type fail the predicate?
    pub fn can_fail(&self, node: &SchemaNode) -> bool {
        (self.can_fail)(node)
    }
}

impl Predicate for SchemaPredicate {
    fn negate(&self) -> Self {
        Self {
            can_match: Arc::clone(&self.can_fail),
            can_fail: Arc::clone(&self.can_match),
        }
    }

    fn and(&self, other: &Self) -> Self {
        let (m1, m2) = (Arc::clone(&self.can_match), Arc::clone(&other.can_match));
        let (f1, f2) = (Arc::clone(&self.can_fail), Arc::clone(&other.can_fail));
        Self {
            can_match: Arc::new(move |node| m1(node) && m2(node)),
            can_fail: Arc::new(move |node| f1(node) || f2(node)),
        }
    }

    fn or(&self, other: &Self) -> Self {
        let (m1, m2) = (Arc::clone(&self.can_match), Arc::clone(&other.can_match));
        let (f1, f2) = (Arc::clone(&self.can_fail), Arc::clone(&other.can_fail));
        Self {
            can_match: Arc::new(move |node| m1(node) || m2(node)),
            can_fail: Arc::new(move |node| f1(node) && f2(node)),
        }
    }
}

impl fmt::Debug for SchemaPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SchemaPredicate(..)")
    }
}

/// A compiled query: an entry predicate carrying its schema facet.
///
/// Both facets are total over well-typed inputs: a predicate that does not
/// apply to a value's shape returns `false`, never an error. Evaluation has
/// no side effects, so compiled predicates are safe to share across
/// traversal workers.
#[derive(Clone)]
pub struct EntryPredicate {
    entry: EntryFn,
    schema: SchemaPredicate,
}

impl EntryPredicate {
    /// Builds a predicate from an entry closure and its schema facet.
    pub fn new<E>(entry: E, schema: SchemaPredicate) -> Self
    where
        E: Fn(&Entry) -> bool + Send + Sync + 'static,
    {
        Self {
            entry: Arc::new(entry),
            schema,
        }
    }

    /// The predicate every entry satisfies. An empty query compiles to
    /// this.
    pub fn always_true() -> Self {
        Self::new(|_| true, SchemaPredicate::always_true())
    }

    /// The predicate no entry satisfies.
    pub fn always_false() -> Self {
        Self::new(|_| false, SchemaPredicate::always_false())
    }

    /// Evaluates the entry facet.
    pub fn is_satisfied_by(&self, entry: &Entry) -> bool {
        (self.entry)(entry)
    }

    /// Evaluates the schema facet: could an entry of this type satisfy the
    /// query? The walker calls this before fetching anything.
    pub fn matches_type(&self, node: &SchemaNode) -> bool {
        self.schema.is_satisfied_by(node)
    }

    /// The schema facet, e.g. for handing to
    /// [`SchemaGraph::prune`](vfind_core::SchemaGraph::prune).
    pub fn schema_predicate(&self) -> &SchemaPredicate {
        &self.schema
    }
}

impl Predicate for EntryPredicate {
    fn negate(&self) -> Self {
        let entry = Arc::clone(&self.entry);
        Self {
            entry: Arc::new(move |e| !entry(e)),
            schema: self.schema.negate(),
        }
    }

    fn and(&self, other: &Self) -> Self {
        let (p1, p2) = (Arc::clone(&self.entry), Arc::clone(&other.entry));
        Self {
            entry: Arc::new(move |e| p1(e) && p2(e)),
            schema: self.schema.and(&other.schema),
        }
    }

    fn or(&self, other: &Self) -> Self {
        let (p1, p2) = (Arc::clone(&self.entry), Arc::clone(&other.entry));
        Self {
            entry: Arc::new(move |e| p1(e) || p2(e)),
            schema: self.schema.or(&other.schema),
        }
    }
}

impl fmt::Debug for EntryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntryPredicate(..)")
    }
}
