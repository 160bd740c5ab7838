//! `-name` and `-path`: glob matches over an entry's name and full path.

use crate::error::Result;
use crate::predicate::{EntryPredicate, SchemaPredicate};
use crate::tokens::Tokens;

use super::pattern_argument;

pub(super) fn parse_name(_trigger: &str, tokens: &mut Tokens) -> Result<EntryPredicate> {
    let pattern = pattern_argument(tokens)?;
    Ok(EntryPredicate::new(
        move |entry| pattern.matches(&entry.canonical_name),
        SchemaPredicate::unknown(),
    ))
}

pub(super) fn parse_path(_trigger: &str, tokens: &mut Tokens) -> Result<EntryPredicate> {
    let pattern = pattern_argument(tokens)?;
    Ok(EntryPredicate::new(
        move |entry| pattern.matches(&entry.path),
        SchemaPredicate::unknown(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfind_core::Entry;

    #[test]
    fn test_name_globs_the_canonical_name() {
        let mut tokens = Tokens::new(["*.log"]);
        let p = parse_name("-name", &mut tokens).unwrap();
        assert!(p.is_satisfied_by(&Entry::new("app.log", "/svc/app.log")));
        assert!(!p.is_satisfied_by(&Entry::new("app.txt", "/svc/app.txt")));
    }

    #[test]
    fn test_path_globs_the_full_path() {
        let mut tokens = Tokens::new(["/svc/*"]);
        let p = parse_path("-path", &mut tokens).unwrap();
        assert!(p.is_satisfied_by(&Entry::new("app.log", "/svc/app.log")));
        assert!(!p.is_satisfied_by(&Entry::new("app.log", "/other/app.log")));
    }

    #[test]
    fn test_missing_and_invalid_patterns_error() {
        let mut tokens = Tokens::new(Vec::<String>::new());
        let err = parse_name("-name", &mut tokens).unwrap_err();
        assert_eq!(err.to_string(), "requires a pattern argument");

        let mut tokens = Tokens::new(["a[b"]);
        let err = parse_name("-name", &mut tokens).unwrap_err();
        assert!(err.to_string().starts_with("invalid glob:"));
    }
}
