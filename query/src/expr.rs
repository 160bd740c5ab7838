//! The shared expression parser.
//!
//! One precedence-climbing parser serves both grammars: the top-level
//! `find`-style expression over entry primaries, and the meta sub-grammar
//! over metadata predicates. The two differ only in what counts as an atom,
//! so a parser is parameterized by a [`Registry`] — keyed atom rules
//! (primaries dispatched by trigger token), an optional fallback atom rule
//! (the meta grammar, whose atoms have no fixed trigger), and binary
//! operator rules with integer precedence (OR binds loosest at 0, AND at 1).
//!
//! Negation and grouping are part of the parser core: `!`/`-not` binds to
//! exactly the next atom, and `(`/`)` groups by depth-counted splitting and
//! recursive self-invocation, so nested sub-grammars can re-enter the parser
//! freely.
//!
//! The parser stops — without error — at an unmatched `)` or a token nothing
//! recognizes, leaving it in the stream. The caller decides what that means:
//! the meta primary treats it as the end of *its* expression and resumes at
//! the top level; the top-level compiler reports it.

use tracing::debug;

use crate::error::{ParseError, Result};
use crate::predicate::Predicate;
use crate::tokens::Tokens;

/// An atom rule dispatched by exact trigger-token match.
///
/// The dispatcher consumes the trigger before invoking the rule and
/// re-wraps any syntax error under it, so a rule only reports what went
/// wrong, not where.
pub struct KeyedAtom<P> {
    /// Tokens that select this rule (e.g. `["-m", "-meta"]`).
    pub triggers: &'static [&'static str],
    /// Parses the rule's arguments. Receives the matched trigger and the
    /// stream positioned just past it.
    pub parse: Box<dyn Fn(&str, &mut Tokens) -> Result<P>>,
}

/// An atom rule tried when no trigger matches. Must leave the stream
/// untouched when it returns [`ParseError::NoMatch`].
pub type FallbackAtom<P> = Box<dyn Fn(&mut Tokens) -> Result<P>>;

/// A binary operator rule.
pub struct BinaryRule<P> {
    /// Tokens that select this operator (e.g. `["-a", "-and"]`).
    pub triggers: &'static [&'static str],
    /// Binding strength; lower binds looser.
    pub precedence: u8,
    /// Combines the two operands.
    pub combine: fn(&P, &P) -> P,
}

fn and_combine<P: Predicate>(a: &P, b: &P) -> P {
    a.and(b)
}

fn or_combine<P: Predicate>(a: &P, b: &P) -> P {
    a.or(b)
}

/// The open set of rules a parser instantiation understands.
///
/// New primaries and operators are added by registering rules, never by
/// touching the parser.
pub struct Registry<P> {
    keyed: Vec<KeyedAtom<P>>,
    fallback: Option<FallbackAtom<P>>,
    binary: Vec<BinaryRule<P>>,
    implicit: BinaryRule<P>,
    unknown_message: &'static str,
}

impl<P: Predicate> Registry<P> {
    /// Creates a registry with the standard boolean operators (`-a`/`-and`
    /// at precedence 1, `-o`/`-or` at precedence 0) and the given message
    /// for tokens nothing recognizes.
    pub fn new(unknown_message: &'static str) -> Self {
        Self {
            keyed: Vec::new(),
            fallback: None,
            binary: vec![
                BinaryRule {
                    triggers: &["-o", "-or"],
                    precedence: 0,
                    combine: or_combine::<P>,
                },
                BinaryRule {
                    triggers: &["-a", "-and"],
                    precedence: 1,
                    combine: and_combine::<P>,
                },
            ],
            implicit: BinaryRule {
                triggers: &["-a", "-and"],
                precedence: 1,
                combine: and_combine::<P>,
            },
            unknown_message,
        }
    }

    /// Registers a keyed atom rule.
    pub fn register<F>(mut self, triggers: &'static [&'static str], parse: F) -> Self
    where
        F: Fn(&str, &mut Tokens) -> Result<P> + 'static,
    {
        self.keyed.push(KeyedAtom {
            triggers,
            parse: Box::new(parse),
        });
        self
    }

    /// Registers the fallback atom rule.
    pub fn register_fallback<F>(mut self, parse: F) -> Self
    where
        F: Fn(&mut Tokens) -> Result<P> + 'static,
    {
        self.fallback = Some(Box::new(parse));
        self
    }

    /// Message appended to tokens nothing recognizes.
    pub fn unknown_message(&self) -> &'static str {
        self.unknown_message
    }

    fn keyed_rule(&self, token: &str) -> Option<&KeyedAtom<P>> {
        self.keyed.iter().find(|rule| rule.triggers.contains(&token))
    }

    fn binary_rule(&self, token: &str) -> Option<&BinaryRule<P>> {
        self.binary
            .iter()
            .find(|rule| rule.triggers.contains(&token))
    }

    fn is_binary(&self, token: &str) -> bool {
        self.binary_rule(token).is_some()
    }
}

enum StackEntry<'r, P> {
    Operand(P),
    Operator { rule: &'r BinaryRule<P>, token: String },
}

/// The reusable expression parser.
pub struct ExprParser<'r, P: Predicate> {
    registry: &'r Registry<P>,
}

impl<'r, P: Predicate> ExprParser<'r, P> {
    /// Creates a parser over the given registry.
    pub fn new(registry: &'r Registry<P>) -> Self {
        Self { registry }
    }

    /// Parses one expression from the head of the stream.
    ///
    /// Returns `Ok(None)` when zero atoms were consumed (empty input, or an
    /// immediately unrecognized token — left in the stream). Otherwise the
    /// stream is positioned at the first token past the expression: the
    /// end, an unmatched `)`, or an unrecognized token.
    pub fn parse(&self, tokens: &mut Tokens) -> Result<Option<P>> {
        let mut stack: Vec<StackEntry<'r, P>> = Vec::new();
        loop {
            let Some(head) = tokens.peek().map(str::to_string) else {
                break;
            };
            if head == ")" {
                break;
            }

            if let Some(rule) = self.registry.binary_rule(&head) {
                match stack.last() {
                    Some(StackEntry::Operand(_)) => {
                        tokens.next();
                        debug!(token = %head, precedence = rule.precedence, "Parsed binary operator");
                        push_operator(&mut stack, rule, head);
                        continue;
                    }
                    Some(StackEntry::Operator { token, .. }) => {
                        return Err(ParseError::syntax(format!(
                            "{token}: no expression after {token}"
                        )));
                    }
                    None => {
                        return Err(ParseError::syntax(format!(
                            "{head}: no expression before {head}"
                        )));
                    }
                }
            }

            match self.parse_atom(tokens) {
                Ok(predicate) => {
                    if matches!(stack.last(), Some(StackEntry::Operand(_))) {
                        // Adjacent atoms conjoin: `p1 p2` == `p1 -a p2`.
                        let rule = &self.registry.implicit;
                        push_operator(&mut stack, rule, rule.triggers[0].to_string());
                    }
                    stack.push(StackEntry::Operand(predicate));
                }
                Err(e) if e.is_no_match() => {
                    debug!(token = %head, "Stopping at unrecognized token");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        finish(stack)
    }

    /// Parses a parenthesized group; the head token must be `(`.
    ///
    /// The matching `)` is located by depth counting and the enclosed
    /// tokens are parsed by recursive self-invocation. Inside a group,
    /// unrecognized tokens cannot extend anything and are errors.
    pub fn parse_group(&self, tokens: &mut Tokens) -> Result<P> {
        tokens.next();
        let mut inner: Vec<String> = Vec::new();
        let mut depth = 1usize;
        loop {
            let Some(token) = tokens.next() else {
                return Err(ParseError::syntax("(: missing closing ')'"));
            };
            if token == "(" {
                depth += 1;
            } else if token == ")" {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            inner.push(token);
        }
        if inner.is_empty() {
            return Err(ParseError::syntax("(): empty inner expression"));
        }

        let mut enclosed = Tokens::new(inner);
        match self.parse(&mut enclosed)? {
            Some(predicate) if enclosed.is_empty() => Ok(predicate),
            _ => {
                let token = enclosed.peek().unwrap_or(")").to_string();
                Err(ParseError::syntax(format!(
                    "{token}: {}",
                    self.registry.unknown_message
                )))
            }
        }
    }

    fn parse_atom(&self, tokens: &mut Tokens) -> Result<P> {
        let Some(head) = tokens.peek().map(str::to_string) else {
            return Err(ParseError::NoMatch);
        };
        if head == "!" || head == "-not" {
            tokens.next();
            return self.parse_negation(&head, tokens);
        }
        if head == "(" {
            return self.parse_group(tokens);
        }
        if let Some(rule) = self.registry.keyed_rule(&head) {
            tokens.next();
            debug!(token = %head, "Dispatching atom rule");
            return (rule.parse)(&head, tokens).map_err(|e| e.wrap(&head));
        }
        if let Some(fallback) = &self.registry.fallback {
            return fallback(tokens);
        }
        Err(ParseError::NoMatch)
    }

    /// Negation binds to exactly the next atom: `! (` negates the group,
    /// `! !` double-negates.
    fn parse_negation(&self, operator: &str, tokens: &mut Tokens) -> Result<P> {
        let next = tokens.peek().map(str::to_string);
        match next.as_deref() {
            None => {
                return Err(ParseError::syntax(format!(
                    "{operator}: no following expression"
                )));
            }
            Some(token) if token == ")" || self.registry.is_binary(token) => {
                return Err(ParseError::syntax(format!(
                    "{operator}: no following expression"
                )));
            }
            _ => {}
        }
        match self.parse_atom(tokens) {
            Ok(predicate) => Ok(predicate.negate()),
            Err(e) if e.is_no_match() => {
                let token = next.unwrap_or_default();
                Err(ParseError::syntax(format!(
                    "{token}: {}",
                    self.registry.unknown_message
                )))
            }
            Err(e) => Err(e),
        }
    }
}

fn push_operator<'r, P: Predicate>(
    stack: &mut Vec<StackEntry<'r, P>>,
    rule: &'r BinaryRule<P>,
    token: String,
) {
    // Reduce while the pending operator binds at least as tightly, which
    // keeps same-precedence operators left-associative.
    while stack.len() >= 3 {
        let pending = match &stack[stack.len() - 2] {
            StackEntry::Operator { rule, .. } => rule.precedence,
            StackEntry::Operand(_) => break,
        };
        if rule.precedence > pending {
            break;
        }
        reduce_once(stack);
    }
    stack.push(StackEntry::Operator { rule, token });
}

fn reduce_once<P: Predicate>(stack: &mut Vec<StackEntry<'_, P>>) {
    let Some(StackEntry::Operand(right)) = stack.pop() else {
        return;
    };
    let Some(StackEntry::Operator { rule, .. }) = stack.pop() else {
        return;
    };
    let Some(StackEntry::Operand(left)) = stack.pop() else {
        return;
    };
    stack.push(StackEntry::Operand((rule.combine)(&left, &right)));
}

fn finish<P: Predicate>(mut stack: Vec<StackEntry<'_, P>>) -> Result<Option<P>> {
    match stack.last() {
        None => return Ok(None),
        Some(StackEntry::Operator { token, .. }) => {
            return Err(ParseError::syntax(format!(
                "{token}: no expression after {token}"
            )));
        }
        Some(StackEntry::Operand(_)) => {}
    }
    while stack.len() >= 3 {
        reduce_once(&mut stack);
    }
    match (stack.pop(), stack.pop()) {
        (Some(StackEntry::Operand(predicate)), None) => Ok(Some(predicate)),
        // Unreachable by construction; kept total.
        _ => Err(ParseError::syntax("malformed expression")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A transparent test predicate recording its boolean structure.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Shape {
        Leaf(String),
        Not(Box<Shape>),
        And(Box<Shape>, Box<Shape>),
        Or(Box<Shape>, Box<Shape>),
    }

    impl Predicate for Shape {
        fn negate(&self) -> Self {
            Shape::Not(Box::new(self.clone()))
        }
        fn and(&self, other: &Self) -> Self {
            Shape::And(Box::new(self.clone()), Box::new(other.clone()))
        }
        fn or(&self, other: &Self) -> Self {
            Shape::Or(Box::new(self.clone()), Box::new(other.clone()))
        }
    }

    fn registry() -> Registry<Shape> {
        Registry::new("unknown primary or operator").register_fallback(|tokens| {
            match tokens.peek() {
                Some(token) if !token.starts_with('-') && token != "(" && token != ")" => {
                    let token = tokens.next().unwrap_or_default();
                    Ok(Shape::Leaf(token))
                }
                _ => Err(ParseError::NoMatch),
            }
        })
    }

    fn parse(input: &[&str]) -> Result<Option<Shape>> {
        let registry = registry();
        let parser = ExprParser::new(&registry);
        let mut tokens = Tokens::new(input.iter().copied());
        let parsed = parser.parse(&mut tokens)?;
        assert!(tokens.is_empty(), "unconsumed tokens: {tokens:?}");
        Ok(parsed)
    }

    fn leaf(name: &str) -> Shape {
        Shape::Leaf(name.to_string())
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        // a -o a -a b == a -o (a -a b)
        let parsed = parse(&["a", "-o", "a", "-a", "b"]).unwrap().unwrap();
        assert_eq!(parsed, leaf("a").or(&leaf("a").and(&leaf("b"))));
    }

    #[test]
    fn test_implicit_and_equals_explicit() {
        assert_eq!(
            parse(&["a", "b"]).unwrap(),
            parse(&["a", "-a", "b"]).unwrap()
        );
    }

    #[test]
    fn test_same_precedence_is_left_associative() {
        let parsed = parse(&["a", "-o", "b", "-o", "c"]).unwrap().unwrap();
        assert_eq!(parsed, leaf("a").or(&leaf("b")).or(&leaf("c")));
    }

    #[test]
    fn test_parenthesization_overrides_precedence() {
        // ( a -o a ) -a b
        let parsed = parse(&["(", "a", "-o", "a", ")", "-a", "b"])
            .unwrap()
            .unwrap();
        assert_eq!(parsed, leaf("a").or(&leaf("a")).and(&leaf("b")));
    }

    #[test]
    fn test_wrapping_in_parens_is_identity() {
        assert_eq!(
            parse(&["(", "a", "-a", "b", ")"]).unwrap(),
            parse(&["a", "-a", "b"]).unwrap()
        );
    }

    #[test]
    fn test_negation_binds_one_atom() {
        let parsed = parse(&["!", "a", "-a", "b"]).unwrap().unwrap();
        assert_eq!(parsed, leaf("a").negate().and(&leaf("b")));
    }

    #[test]
    fn test_negation_of_group_and_double_negation() {
        let parsed = parse(&["!", "(", "a", "-o", "b", ")"]).unwrap().unwrap();
        assert_eq!(parsed, leaf("a").or(&leaf("b")).negate());

        let parsed = parse(&["!", "!", "a"]).unwrap().unwrap();
        assert_eq!(parsed, leaf("a").negate().negate());
    }

    #[test]
    fn test_empty_input_parses_to_none() {
        assert_eq!(parse(&[]).unwrap(), None);
    }

    #[test]
    fn test_dangling_operator_errors() {
        let err = parse(&["a", "-a"]).unwrap_err();
        assert_eq!(err.to_string(), "-a: no expression after -a");

        let err = parse(&["-o", "a"]).unwrap_err();
        assert_eq!(err.to_string(), "-o: no expression before -o");

        let err = parse(&["a", "-a", "-o", "b"]).unwrap_err();
        assert_eq!(err.to_string(), "-a: no expression after -a");
    }

    #[test]
    fn test_empty_group_errors() {
        let err = parse(&["(", ")"]).unwrap_err();
        assert_eq!(err.to_string(), "(): empty inner expression");
    }

    #[test]
    fn test_unterminated_group_errors() {
        let err = parse(&["(", "a"]).unwrap_err();
        assert_eq!(err.to_string(), "(: missing closing ')'");
    }

    #[test]
    fn test_negation_without_operand_errors() {
        let err = parse(&["!"]).unwrap_err();
        assert_eq!(err.to_string(), "!: no following expression");

        let err = parse(&["a", "-a", "!", "-o", "b"]).unwrap_err();
        assert_eq!(err.to_string(), "!: no following expression");
    }

    #[test]
    fn test_unknown_token_stops_without_error() {
        let registry = registry();
        let parser = ExprParser::new(&registry);
        let mut tokens = Tokens::new(["a", "-weird", "b"]);
        let parsed = parser.parse(&mut tokens).unwrap();
        assert_eq!(parsed, Some(leaf("a")));
        assert_eq!(tokens.peek(), Some("-weird"));
    }

    #[test]
    fn test_unknown_token_inside_group_errors() {
        let err = parse(&["(", "a", "-weird", ")"]).unwrap_err();
        assert_eq!(err.to_string(), "-weird: unknown primary or operator");
    }

    #[test]
    fn test_unmatched_close_paren_is_left_for_caller() {
        let registry = registry();
        let parser = ExprParser::new(&registry);
        let mut tokens = Tokens::new(["a", ")"]);
        let parsed = parser.parse(&mut tokens).unwrap();
        assert_eq!(parsed, Some(leaf("a")));
        assert_eq!(tokens.peek(), Some(")"));
    }
}
