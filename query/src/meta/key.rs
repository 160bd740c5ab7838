//! Key-sequence token splitting.
//!
//! A single command-line token can encode an entire path (`.key1.key2[?]`),
//! so the object and array parsers split their own leading piece off the
//! head token and re-inject whatever remains as the new head of the stream.

use crate::error::{ParseError, Result};

/// Splits `.key...` into the key and the unconsumed remainder.
///
/// The key runs until the next unescaped `.`, `[`, or `]`, or the end of
/// the token; `\` escapes any character, including the terminators.
pub(super) fn split_key(token: &str) -> Result<(String, String)> {
    let body = token.strip_prefix('.').unwrap_or(token);
    let mut key = String::new();
    let mut rest_start = body.len();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => key.push(escaped),
                None => key.push('\\'),
            },
            '.' | '[' | ']' => {
                rest_start = i;
                break;
            }
            _ => key.push(c),
        }
    }
    if key.is_empty() {
        return Err(ParseError::syntax("expected a key sequence after '.'"));
    }
    Ok((key, body[rest_start..].to_string()))
}

/// How an array predicate quantifies over elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    /// `[?]` — some element satisfies.
    Some,
    /// `[*]` — every element satisfies (vacuously true when empty).
    All,
    /// `[N]` — the element at index N satisfies.
    Nth(usize),
}

impl Flavor {
    pub(super) fn display(&self) -> String {
        match self {
            Self::Some => "[?]".to_string(),
            Self::All => "[*]".to_string(),
            Self::Nth(n) => format!("[{n}]"),
        }
    }
}

/// Splits `[?]...`/`[*]...`/`[N]...` into the flavor and the unconsumed
/// remainder.
pub(super) fn split_array(token: &str) -> Result<(Flavor, String)> {
    let body = token.strip_prefix('[').unwrap_or(token);
    let Some(end) = body.find(']') else {
        return Err(ParseError::syntax(format!("{token}: missing closing ']'")));
    };
    let inside = &body[..end];
    let rest = body[end + 1..].to_string();
    let flavor = match inside {
        "?" => Flavor::Some,
        "*" => Flavor::All,
        _ => match inside.parse::<usize>() {
            Ok(n) => Flavor::Nth(n),
            Err(_) => {
                return Err(ParseError::syntax(format!(
                    "[{inside}]: expected '?', '*', or an element index"
                )));
            }
        },
    };
    Ok((flavor, rest))
}
