//! `find(1)`-style query compiler for virtual hierarchies.
//!
//! Compiles a shell-split token stream into one [`EntryPredicate`] with two
//! callable facets: `is_satisfied_by(entry)` for concrete entries and
//! `matches_type(schema_node)` for type-level pruning, so a walker can skip
//! whole subtrees before fetching anything. The grammar is the familiar
//! `find` expression language — primaries, `!`/`-not`, `-a`/`-o`, implicit
//! AND, parentheses — plus a nested metadata sub-grammar behind `-m`/`-meta`
//! for querying JSON-shaped metadata by key path.
//!
//! ```
//! use vfind_core::Entry;
//!
//! let query = vfind_query::compile(["-name", "*.log", "-o", "-name", "*.txt"]).unwrap();
//!
//! assert!(query.is_satisfied_by(&Entry::new("app.log", "docker/volumes/v/app.log")));
//! assert!(!query.is_satisfied_by(&Entry::new("app.gz", "docker/volumes/v/app.gz")));
//! ```
//!
//! Compiled predicates are pure values: evaluation has no side effects, so
//! they are safe to share across traversal workers, and the schema facet can
//! be handed to [`SchemaGraph::prune`](vfind_core::SchemaGraph::prune) to cut
//! the type graph down before the walk starts.

pub mod compare;
mod error;
mod expr;
mod meta;
mod predicate;
mod primaries;
mod tokens;

pub use error::{ParseError, Result};
pub use expr::{BinaryRule, ExprParser, FallbackAtom, KeyedAtom, Registry};
pub use meta::{MetaPredicate, SchemaClaim};
pub use predicate::{EntryPredicate, Predicate, SchemaPredicate};
pub use tokens::Tokens;

use chrono::{DateTime, Utc};
use tracing::debug;

/// Compiles a token stream into an entry predicate.
///
/// An empty stream compiles to an always-true predicate, matching `find`'s
/// behavior with no expression. Time comparisons are anchored at the
/// current instant; use [`compile_at`] to pin them.
pub fn compile<I, S>(tokens: I) -> Result<EntryPredicate>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    compile_at(Utc::now(), tokens)
}

/// Compiles a token stream with an explicit reference instant for
/// `-mtime`-family primaries and meta duration comparisons.
pub fn compile_at<I, S>(now: DateTime<Utc>, tokens: I) -> Result<EntryPredicate>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tokens = Tokens::new(tokens);
    let registry = primaries::registry(now);
    let parsed = ExprParser::new(&registry).parse(&mut tokens)?;
    if let Some(head) = tokens.peek() {
        if head == ")" {
            return Err(ParseError::syntax("): no beginning '('"));
        }
        return Err(ParseError::syntax(format!(
            "{head}: unknown primary or operator"
        )));
    }
    debug!(
        remaining = tokens.len(),
        empty = parsed.is_none(),
        "Compiled query"
    );
    Ok(parsed.unwrap_or_else(EntryPredicate::always_true))
}
