//! Token stream.
//!
//! The CLI layer hands the engine an ordered, already shell-split sequence
//! of strings. Parsers consume a prefix and leave the remainder in place;
//! none of them looks behind. [`Tokens::push_front`] supports the meta
//! grammar's partial-token re-injection: after `.key1` is split off the
//! head of `.key1.key2`, the remainder `.key2` becomes the new head.

use std::collections::VecDeque;

/// An owned, consumable stream of command-line tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    items: VecDeque<String>,
}

impl Tokens {
    /// Creates a stream from anything yielding strings.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// The head token, without consuming it.
    pub fn peek(&self) -> Option<&str> {
        self.items.front().map(String::as_str)
    }

    /// Consumes and returns the head token.
    pub fn next(&mut self) -> Option<String> {
        self.items.pop_front()
    }

    /// Re-injects a token as the new head.
    pub fn push_front(&mut self, token: impl Into<String>) {
        self.items.push_front(token.into());
    }

    /// Whether the stream is exhausted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remaining token count.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl FromIterator<String> for Tokens {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<String>> for Tokens {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_in_order() {
        let mut tokens = Tokens::new(["-name", "*.log"]);
        assert_eq!(tokens.peek(), Some("-name"));
        assert_eq!(tokens.next().as_deref(), Some("-name"));
        assert_eq!(tokens.next().as_deref(), Some("*.log"));
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_push_front_reinjects_head() {
        let mut tokens = Tokens::new(["-true"]);
        tokens.push_front(".key2");
        assert_eq!(tokens.peek(), Some(".key2"));
        assert_eq!(tokens.len(), 2);
    }
}
