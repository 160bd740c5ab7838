//! `-size`: compares an entry's size attribute.
//!
//! A bare integer counts 512-byte blocks (rounded up, as `find` does); a
//! suffixed magnitude compares bytes exactly. Entries without a size never
//! match.

use crate::compare::{Comparator, Magnitude, div_ceil};
use crate::error::{ParseError, Result};
use crate::predicate::{EntryPredicate, SchemaPredicate};
use crate::tokens::Tokens;

pub(super) fn parse(_trigger: &str, tokens: &mut Tokens) -> Result<EntryPredicate> {
    let Some(token) = tokens.next() else {
        return Err(ParseError::syntax("requires a size argument"));
    };
    let comparator = Comparator::parse_with(&token, &[Magnitude::Integer, Magnitude::Size])
        .map_err(|_| ParseError::syntax(format!("invalid size '{token}'")))?;
    Ok(EntryPredicate::new(
        move |entry| {
            let Some(size) = entry.attributes.size else {
                return false;
            };
            let value = match comparator.magnitude() {
                Magnitude::Integer => div_ceil(size as i64, 512),
                _ => size as i64,
            };
            comparator.is_satisfied_by(value)
        },
        SchemaPredicate::unknown(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfind_core::{Entry, EntryAttributes};

    fn sized(size: u64) -> Entry {
        Entry::new("e", "p").with_attributes(EntryAttributes::default().with_size(size))
    }

    fn parse_one(token: &str) -> EntryPredicate {
        let mut tokens = Tokens::new([token]);
        parse("-size", &mut tokens).unwrap()
    }

    #[test]
    fn test_bare_integer_counts_512_byte_blocks() {
        let p = parse_one("2");
        assert!(p.is_satisfied_by(&sized(513)));
        assert!(p.is_satisfied_by(&sized(1024)));
        assert!(!p.is_satisfied_by(&sized(512)));
    }

    #[test]
    fn test_suffixed_magnitude_compares_bytes() {
        let p = parse_one("+1k");
        assert!(p.is_satisfied_by(&sized(2048)));
        assert!(!p.is_satisfied_by(&sized(1024)));
    }

    #[test]
    fn test_missing_size_attribute_is_false() {
        let p = parse_one("+0");
        assert!(!p.is_satisfied_by(&Entry::new("e", "p")));
    }

    #[test]
    fn test_invalid_size_errors() {
        let mut tokens = Tokens::new(["huge"]);
        let err = parse("-size", &mut tokens).unwrap_err();
        assert_eq!(err.to_string(), "invalid size 'huge'");
    }
}
