//! The object predicate parser: `'.' Key (Predicate | '(' PredExpr ')')`.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::key::split_key;
use super::predicate::MetaPredicate;
use crate::error::Result;
use crate::tokens::Tokens;

pub(super) fn parse(tokens: &mut Tokens, now: DateTime<Utc>) -> Result<MetaPredicate> {
    let token = tokens.next().unwrap_or_default();
    let (key, rest) = split_key(&token)?;
    if !rest.is_empty() {
        tokens.push_front(rest);
    }
    debug!(key, "Parsed object access");
    let inner = super::parse_operand(tokens, now, &format!(".{key}"))?;
    Ok(inner.under_key(&key))
}
