//! The dual-facet metadata predicate.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::claim::SchemaClaim;
use crate::predicate::Predicate;

type ValueFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A predicate over JSON-shaped metadata, carrying the schema claim the
/// meta grammar derived alongside it.
///
/// Like [`EntryPredicate`](crate::EntryPredicate), the boolean operations
/// apply to both facets together.
#[derive(Clone)]
pub struct MetaPredicate {
    value: ValueFn,
    claim: SchemaClaim,
}

impl MetaPredicate {
    /// Builds a predicate from a value closure and its schema claim.
    pub fn new<F>(value: F, claim: SchemaClaim) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            value: Arc::new(value),
            claim,
        }
    }

    /// Evaluates against a concrete metadata value.
    pub fn is_satisfied_by(&self, value: &Value) -> bool {
        (self.value)(value)
    }

    /// The schema claim, for type-level evaluation.
    pub fn claim(&self) -> &SchemaClaim {
        &self.claim
    }

    /// Wraps the predicate in a case-insensitive object key access.
    ///
    /// Lookup is first-match-wins over the object's iteration order; when
    /// two sibling keys differ only by case, which one wins is unspecified.
    /// Non-object values never satisfy the wrapped predicate.
    pub fn under_key(&self, key: &str) -> Self {
        let inner = self.clone();
        let wanted = key.to_uppercase();
        let claim = self.claim.with_object_prefix(key);
        Self::new(
            move |value| match value {
                Value::Object(map) => map
                    .iter()
                    .find(|(k, _)| k.to_uppercase() == wanted)
                    .is_some_and(|(_, v)| inner.is_satisfied_by(v)),
                _ => false,
            },
            claim,
        )
    }
}

impl Predicate for MetaPredicate {
    fn negate(&self) -> Self {
        let value = Arc::clone(&self.value);
        Self {
            value: Arc::new(move |v| !value(v)),
            claim: SchemaClaim::Not(Box::new(self.claim.clone())),
        }
    }

    fn and(&self, other: &Self) -> Self {
        let (p1, p2) = (Arc::clone(&self.value), Arc::clone(&other.value));
        Self {
            value: Arc::new(move |v| p1(v) && p2(v)),
            claim: SchemaClaim::And(
                Box::new(self.claim.clone()),
                Box::new(other.claim.clone()),
            ),
        }
    }

    fn or(&self, other: &Self) -> Self {
        let (p1, p2) = (Arc::clone(&self.value), Arc::clone(&other.value));
        Self {
            value: Arc::new(move |v| p1(v) || p2(v)),
            claim: SchemaClaim::Or(
                Box::new(self.claim.clone()),
                Box::new(other.claim.clone()),
            ),
        }
    }
}

impl fmt::Debug for MetaPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaPredicate")
            .field("claim", &self.claim)
            .finish_non_exhaustive()
    }
}
