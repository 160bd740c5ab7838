//! Parse errors.
//!
//! Two classes run through every parser in this crate:
//!
//! - [`ParseError::NoMatch`] — this parser does not recognize the token;
//!   the caller tries the next alternative. Never surfaced to the user.
//! - [`ParseError::Syntax`] — the parser recognized the start of a
//!   construct but it is malformed. Always surfaced, and re-wrapped with
//!   the trigger token by the nearest enclosing registry dispatch, so a
//!   failure deep inside the meta sub-grammar reads
//!   `-m: expected a key sequence after '.'` at the top level.

use thiserror::Error;

/// Errors produced while compiling a token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No parser recognized the token. Internal control flow only.
    #[error("no matching parser")]
    NoMatch,

    /// Malformed construct. The message carries the offending token for
    /// context, e.g. `-a: no expression after -a`.
    #[error("{0}")]
    Syntax(String),
}

impl ParseError {
    /// Creates a syntax error from a message.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    /// Whether this is the internal try-next-alternative condition.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }

    /// Re-wraps a syntax error under the trigger token that dispatched to
    /// the failing rule. `NoMatch` passes through untouched.
    pub fn wrap(self, trigger: &str) -> Self {
        match self {
            Self::Syntax(message) => Self::Syntax(format!("{trigger}: {message}")),
            Self::NoMatch => Self::NoMatch,
        }
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
