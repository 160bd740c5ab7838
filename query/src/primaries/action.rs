//! `-action`: exact match against an entry's supported actions.
//!
//! Type descriptions list their actions, so the schema facet is exact on
//! both sides, like `-kind`.

use crate::error::{ParseError, Result};
use crate::predicate::{EntryPredicate, SchemaPredicate};
use crate::tokens::Tokens;

pub(super) fn parse(_trigger: &str, tokens: &mut Tokens) -> Result<EntryPredicate> {
    let Some(action) = tokens.next() else {
        return Err(ParseError::syntax("requires an action argument"));
    };
    let supported = action.clone();
    let unsupported = action.clone();
    let schema = SchemaPredicate::new(
        move |node| node.supports_action(&supported),
        move |node| !node.supports_action(&unsupported),
    );
    Ok(EntryPredicate::new(
        move |entry| entry.supports_action(&action),
        schema,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfind_core::{Entry, SchemaGraph, TypeDescription};

    #[test]
    fn test_matches_supported_actions() {
        let mut tokens = Tokens::new(["exec"]);
        let p = parse("-action", &mut tokens).unwrap();
        assert!(p.is_satisfied_by(&Entry::new("c", "p").with_action("exec")));
        assert!(!p.is_satisfied_by(&Entry::new("c", "p").with_action("stream")));
    }

    #[test]
    fn test_schema_facet_reads_type_actions() {
        let graph = SchemaGraph::assemble(
            "t",
            vec![TypeDescription::new("t", "t").with_action("exec")],
        )
        .unwrap();
        let mut tokens = Tokens::new(["stream"]);
        let p = parse("-action", &mut tokens).unwrap();
        assert!(!p.matches_type(graph.root()));
    }

    #[test]
    fn test_missing_argument_errors() {
        let mut tokens = Tokens::new(Vec::<String>::new());
        let err = parse("-action", &mut tokens).unwrap_err();
        assert_eq!(err.to_string(), "requires an action argument");
    }
}
