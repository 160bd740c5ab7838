//! The meta sub-grammar: predicates over JSON-shaped metadata.
//!
//! A second instantiation of the expression parser whose atom is the
//! metadata predicate grammar:
//!
//! ```text
//! Predicate   := ObjectPredicate | ArrayPredicate | PrimitivePredicate
//! ObjectPred  := '-empty' | '.' Key (Predicate | '(' PredExpr ')')
//! ArrayPred   := '-empty' | ('[?]'|'[*]'|'[N]') (Predicate | '(' PredExpr ')')
//! ```
//!
//! Every parsed predicate carries a [`SchemaClaim`] built alongside it, so
//! the `-meta` primary can answer "could this entry *type* have matching
//! metadata" from a type's schema alone.

mod array;
mod claim;
mod key;
mod object;
mod predicate;
mod primitive;

use chrono::{DateTime, Utc};
use serde_json::Value;
use vfind_core::KeySequence;

pub use claim::SchemaClaim;
pub use predicate::MetaPredicate;

use crate::error::{ParseError, Result};
use crate::expr::{ExprParser, Registry};
use crate::tokens::Tokens;

/// Parses one metadata predicate expression from the head of the stream.
///
/// Returns `Ok(None)` when zero tokens were consumed. An unrecognized
/// token ends the expression without error and stays in the stream — it
/// belongs to the enclosing top-level grammar.
///
/// `now` anchors duration comparisons against timestamp values.
pub(crate) fn parse_expression(
    tokens: &mut Tokens,
    now: DateTime<Utc>,
) -> Result<Option<MetaPredicate>> {
    let registry = registry(now);
    ExprParser::new(&registry).parse(tokens)
}

fn registry(now: DateTime<Utc>) -> Registry<MetaPredicate> {
    Registry::new("unknown predicate")
        .register_fallback(move |tokens| parse_predicate(tokens, now))
}

fn parse_predicate(tokens: &mut Tokens, now: DateTime<Utc>) -> Result<MetaPredicate> {
    let Some(head) = tokens.peek() else {
        return Err(ParseError::NoMatch);
    };
    if head == "-empty" {
        tokens.next();
        return Ok(empty_predicate());
    }
    if head.starts_with('.') {
        return object::parse(tokens, now);
    }
    if head.starts_with('[') {
        return array::parse(tokens, now);
    }
    primitive::parse(tokens, now)
}

/// Parses the operand following an object/array access: either a single
/// predicate or a parenthesized predicate expression. `context` names the
/// access for error messages.
fn parse_operand(tokens: &mut Tokens, now: DateTime<Utc>, context: &str) -> Result<MetaPredicate> {
    let Some(head) = tokens.peek().map(str::to_string) else {
        return Err(ParseError::syntax(format!(
            "expected a predicate expression after {context}"
        )));
    };
    if head == "(" {
        let registry = registry(now);
        return ExprParser::new(&registry).parse_group(tokens);
    }
    match parse_predicate(tokens, now) {
        Err(e) if e.is_no_match() => {
            Err(ParseError::syntax(format!("{head}: unknown predicate")))
        }
        other => other,
    }
}

/// `-empty` matches an empty object or an empty array, nothing else.
fn empty_predicate() -> MetaPredicate {
    let claim = SchemaClaim::Or(
        Box::new(SchemaClaim::Path(KeySequence::object())),
        Box::new(SchemaClaim::Path(KeySequence::array())),
    );
    MetaPredicate::new(
        |value| match value {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        },
        claim,
    )
}
