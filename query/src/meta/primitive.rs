//! Primitive metadata predicates.
//!
//! Tried when the head token is neither an object nor an array access:
//! `-null`, `-exists`, `-true`, `-false`, the comparator sublanguage, and
//! finally exact string match. Unrecognized `-`-prefixed tokens are a
//! no-match (never a string literal), so the enclosing parser can report
//! them as unknown predicates or treat them as the end of the meta
//! expression.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use super::claim::SchemaClaim;
use super::predicate::MetaPredicate;
use crate::compare::{Comparator, Comparison, Magnitude};
use crate::error::{ParseError, Result};
use crate::tokens::Tokens;

pub(super) fn parse(tokens: &mut Tokens, now: DateTime<Utc>) -> Result<MetaPredicate> {
    let Some(head) = tokens.peek().map(str::to_string) else {
        return Err(ParseError::NoMatch);
    };
    let parsed = match head.as_str() {
        "-null" => MetaPredicate::new(Value::is_null, SchemaClaim::primitive_leaf()),
        "-exists" => MetaPredicate::new(|v: &Value| !v.is_null(), SchemaClaim::existence_leaf()),
        "-true" => MetaPredicate::new(
            |v: &Value| matches!(v, Value::Bool(true)),
            SchemaClaim::primitive_leaf(),
        ),
        "-false" => MetaPredicate::new(
            |v: &Value| matches!(v, Value::Bool(false)),
            SchemaClaim::primitive_leaf(),
        ),
        _ => match Comparator::parse(&head) {
            Ok(comparator) => comparator_predicate(comparator, now),
            Err(e) if e.is_no_match() => {
                if head.starts_with('-') || head == "(" || head == ")" {
                    return Err(ParseError::NoMatch);
                }
                string_predicate(&head)
            }
            Err(e) => return Err(e),
        },
    };
    tokens.next();
    Ok(parsed)
}

/// Numeric magnitudes compare against JSON numbers; a duration magnitude
/// turns the comparator into an age test over timestamp strings, relative
/// to the compilation-time reference instant.
fn comparator_predicate(comparator: Comparator, now: DateTime<Utc>) -> MetaPredicate {
    debug!(?comparator, "Parsed comparator predicate");
    match comparator.magnitude() {
        Magnitude::Duration => MetaPredicate::new(
            move |value| match value {
                Value::String(s) => parse_timestamp(s).is_some_and(|t| {
                    comparator.is_satisfied_by((now - t).num_seconds())
                }),
                _ => false,
            },
            SchemaClaim::primitive_leaf(),
        ),
        Magnitude::Integer | Magnitude::Size => MetaPredicate::new(
            move |value| match value.as_f64() {
                Some(n) => compare_f64(comparator.comparison(), n, comparator.reference() as f64),
                None => false,
            },
            SchemaClaim::primitive_leaf(),
        ),
    }
}

fn compare_f64(comparison: Comparison, value: f64, reference: f64) -> bool {
    match comparison {
        Comparison::Equal => value == reference,
        Comparison::Greater => value > reference,
        Comparison::Less => value < reference,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn string_predicate(token: &str) -> MetaPredicate {
    let wanted = token.to_string();
    MetaPredicate::new(
        move |value| matches!(value, Value::String(s) if *s == wanted),
        SchemaClaim::primitive_leaf(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn parse_one(token: &str) -> MetaPredicate {
        parse_one_at(token, Utc::now())
    }

    fn parse_one_at(token: &str, now: DateTime<Utc>) -> MetaPredicate {
        let mut tokens = Tokens::new([token]);
        let parsed = parse(&mut tokens, now).unwrap();
        assert!(tokens.is_empty());
        parsed
    }

    #[test]
    fn test_null_and_exists() {
        let null = parse_one("-null");
        assert!(null.is_satisfied_by(&Value::Null));
        assert!(!null.is_satisfied_by(&json!(0)));

        let exists = parse_one("-exists");
        assert!(exists.is_satisfied_by(&json!(0)));
        assert!(!exists.is_satisfied_by(&Value::Null));
    }

    #[test]
    fn test_boolean_literals_match_exactly() {
        let p = parse_one("-true");
        assert!(p.is_satisfied_by(&json!(true)));
        assert!(!p.is_satisfied_by(&json!("true")));
        assert!(!p.is_satisfied_by(&json!(1)));
    }

    #[test]
    fn test_numeric_comparison_covers_floats() {
        let p = parse_one("+2");
        assert!(p.is_satisfied_by(&json!(2.5)));
        assert!(!p.is_satisfied_by(&json!(2)));
        assert!(!p.is_satisfied_by(&json!("3")));
    }

    #[test]
    fn test_brace_negation() {
        let p = parse_one("{15}");
        assert!(p.is_satisfied_by(&json!(-15)));
        assert!(!p.is_satisfied_by(&json!(15)));
    }

    #[test]
    fn test_duration_compares_timestamp_age() {
        let now = Utc::now();
        let p = parse_one_at("+1h", now);
        let old = (now - Duration::hours(2)).to_rfc3339();
        let recent = (now - Duration::minutes(10)).to_rfc3339();
        assert!(p.is_satisfied_by(&json!(old)));
        assert!(!p.is_satisfied_by(&json!(recent)));
        assert!(!p.is_satisfied_by(&json!("not a timestamp")));
    }

    #[test]
    fn test_string_fallback_is_exact() {
        let p = parse_one("running");
        assert!(p.is_satisfied_by(&json!("running")));
        assert!(!p.is_satisfied_by(&json!("Running")));
        assert!(!p.is_satisfied_by(&json!(true)));
    }

    #[test]
    fn test_unknown_dash_token_is_no_match() {
        let mut tokens = Tokens::new(["-foo"]);
        let err = parse(&mut tokens, Utc::now()).unwrap_err();
        assert!(err.is_no_match());
        assert_eq!(tokens.peek(), Some("-foo"));
    }
}
