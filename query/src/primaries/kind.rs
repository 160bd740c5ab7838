//! `-kind`: glob match over type identifiers.
//!
//! The type identifier is exactly what a schema node carries, so both sides
//! of the schema facet are exact and `-kind` (negated or not) prunes.
//! Entries without a type identifier never match.

use crate::error::Result;
use crate::predicate::{EntryPredicate, SchemaPredicate};
use crate::tokens::Tokens;

use super::pattern_argument;

pub(super) fn parse(_trigger: &str, tokens: &mut Tokens) -> Result<EntryPredicate> {
    let pattern = pattern_argument(tokens)?;
    let matches = pattern.clone();
    let fails = pattern.clone();
    let schema = SchemaPredicate::new(
        move |node| matches.matches(node.type_id()),
        move |node| !fails.matches(node.type_id()),
    );
    Ok(EntryPredicate::new(
        move |entry| {
            entry
                .type_id
                .as_deref()
                .is_some_and(|id| pattern.matches(id))
        },
        schema,
    ))
}
