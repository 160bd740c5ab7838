//! The top-level primaries: named, token-consuming predicate factories.
//!
//! Each primary parses its arguments from the stream and returns an
//! [`EntryPredicate`] whose schema facet is as sharp as the primary allows:
//! `-kind` and `-action` read fields a type description carries, so both
//! sides of their facet are exact; name, path, size, and time primaries
//! depend on per-instance data the type level cannot see, so their facet
//! stays permissive; `-meta` evaluates its schema claim against the type's
//! metadata shape.

mod action;
mod kind;
mod meta;
mod name;
mod size;
mod time;

use chrono::{DateTime, Utc};
use glob::Pattern;

use crate::error::{ParseError, Result};
use crate::expr::Registry;
use crate::predicate::EntryPredicate;
use crate::tokens::Tokens;

/// Builds the top-level registry. `now` anchors the time primaries and the
/// meta grammar's duration comparisons.
pub(crate) fn registry(now: DateTime<Utc>) -> Registry<EntryPredicate> {
    Registry::new("unknown primary or operator")
        .register(&["-name"], name::parse_name)
        .register(&["-path"], name::parse_path)
        .register(&["-size"], size::parse)
        .register(&["-mtime", "-ctime", "-atime"], move |trigger, tokens| {
            time::parse(trigger, tokens, now)
        })
        .register(&["-kind"], kind::parse)
        .register(&["-action"], action::parse)
        .register(&["-true"], |_, _: &mut Tokens| Ok(EntryPredicate::always_true()))
        .register(&["-false"], |_, _: &mut Tokens| Ok(EntryPredicate::always_false()))
        .register(&["-m", "-meta"], move |_, tokens| meta::parse(tokens, now))
}

fn pattern_argument(tokens: &mut Tokens) -> Result<Pattern> {
    let Some(token) = tokens.next() else {
        return Err(ParseError::syntax("requires a pattern argument"));
    };
    Pattern::new(&token).map_err(|e| ParseError::syntax(format!("invalid glob: {e}")))
}
