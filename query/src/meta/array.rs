//! The array predicate parser:
//! `('[?]'|'[*]'|'[N]') (Predicate | '(' PredExpr ')')`.
//!
//! The three flavors quantify differently over elements at evaluation
//! time, but share one schema claim: an array access is flavor-agnostic at
//! the type level, since "might this array contain a matching element" is
//! the only structural question a schema can answer.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use super::key::{Flavor, split_array};
use super::predicate::MetaPredicate;
use crate::error::Result;
use crate::tokens::Tokens;

pub(super) fn parse(tokens: &mut Tokens, now: DateTime<Utc>) -> Result<MetaPredicate> {
    let token = tokens.next().unwrap_or_default();
    let (flavor, rest) = split_array(&token)?;
    if !rest.is_empty() {
        tokens.push_front(rest);
    }
    debug!(flavor = %flavor.display(), "Parsed array access");
    let inner = super::parse_operand(tokens, now, &flavor.display())?;
    Ok(quantify(flavor, inner))
}

fn quantify(flavor: Flavor, inner: MetaPredicate) -> MetaPredicate {
    let claim = inner.claim().with_array_prefix();
    match flavor {
        Flavor::Some => MetaPredicate::new(
            move |value| {
                matches!(value, Value::Array(items)
                    if items.iter().any(|item| inner.is_satisfied_by(item)))
            },
            claim,
        ),
        Flavor::All => MetaPredicate::new(
            move |value| {
                matches!(value, Value::Array(items)
                    if items.iter().all(|item| inner.is_satisfied_by(item)))
            },
            claim,
        ),
        Flavor::Nth(index) => MetaPredicate::new(
            move |value| {
                matches!(value, Value::Array(items)
                    if items.get(index).is_some_and(|item| inner.is_satisfied_by(item)))
            },
            claim,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_all(input: &[&str]) -> MetaPredicate {
        let mut tokens = Tokens::new(input.iter().copied());
        let parsed = parse(&mut tokens, Utc::now()).unwrap();
        assert!(tokens.is_empty(), "unconsumed tokens: {tokens:?}");
        parsed
    }

    #[test]
    fn test_some_flavor() {
        let p = parse_all(&["[?]", "-true"]);
        assert!(p.is_satisfied_by(&json!([false, true])));
        assert!(!p.is_satisfied_by(&json!([false, false])));
        assert!(!p.is_satisfied_by(&json!([])));
        assert!(!p.is_satisfied_by(&json!(true)));
    }

    #[test]
    fn test_all_flavor_is_vacuously_true_on_empty() {
        let p = parse_all(&["[*]", "-true"]);
        assert!(p.is_satisfied_by(&json!([true, true])));
        assert!(!p.is_satisfied_by(&json!([true, false])));
        assert!(p.is_satisfied_by(&json!([])));
    }

    #[test]
    fn test_nth_flavor_is_false_out_of_bounds() {
        let p = parse_all(&["[0]", "-true"]);
        assert!(p.is_satisfied_by(&json!([true])));
        assert!(!p.is_satisfied_by(&json!([])));

        let p = parse_all(&["[1]", "-true"]);
        assert!(p.is_satisfied_by(&json!([false, true])));
    }

    #[test]
    fn test_nested_array_access_in_one_token() {
        let p = parse_all(&["[?][?]", "-true"]);
        assert!(p.is_satisfied_by(&json!([[false], [true]])));
        assert!(!p.is_satisfied_by(&json!([false, true])));
    }
}
