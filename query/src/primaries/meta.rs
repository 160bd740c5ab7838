//! `-m`/`-meta`: bridges the meta sub-grammar into an entry predicate.
//!
//! The value facet evaluates against the entry's metadata (the full
//! document when fetched, otherwise the partial copy in the attributes).
//! The schema facet evaluates the parsed claim against the type's metadata
//! shape; types without one stay permissive in both directions.

use chrono::{DateTime, Utc};

use crate::error::{ParseError, Result};
use crate::predicate::{EntryPredicate, SchemaPredicate};
use crate::tokens::Tokens;

pub(super) fn parse(tokens: &mut Tokens, now: DateTime<Utc>) -> Result<EntryPredicate> {
    let Some(predicate) = crate::meta::parse_expression(tokens, now)? else {
        return Err(match tokens.peek() {
            Some(head) => ParseError::syntax(format!("{head}: unknown predicate")),
            None => ParseError::syntax("expected a predicate expression"),
        });
    };
    let claim = predicate.claim().clone();
    let claim_fails = claim.clone();
    let schema = SchemaPredicate::new(
        move |node| node.meta_schema().is_none_or(|s| claim.can_match(s)),
        move |node| node.meta_schema().is_none_or(|s| claim_fails.can_fail(s)),
    );
    Ok(EntryPredicate::new(
        move |entry| predicate.is_satisfied_by(entry.meta_value()),
        schema,
    ))
}
