//! The numeric/size/duration comparator sublanguage.
//!
//! Shared by the meta primitive predicate and the `-size`/`-mtime`-family
//! primaries. A comparator token is `(+|-)?` followed by a magnitude, either
//! bare or brace-wrapped (`{n}` negates the enclosed magnitude, so `+{200}`
//! reads "strictly greater than −200"). Magnitude parsers are tried in a
//! fixed order — integer, size, duration — and the winning parser's identity
//! travels with the parsed comparator so callers can post-process
//! (a bare integer means whole days to `-mtime` and 512-byte blocks to
//! `-size`, while suffixed magnitudes are taken literally).

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{ParseError, Result};

/// The three-way comparison selected by the token's leading sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// No sign: exact equality.
    Equal,
    /// Leading `+`: strictly greater than the reference.
    Greater,
    /// Leading `-`: strictly less than the reference.
    Less,
}

impl Comparison {
    /// Applies the comparison with `value` on the left.
    pub fn compare(self, value: i64, reference: i64) -> bool {
        match self {
            Self::Equal => value == reference,
            Self::Greater => value > reference,
            Self::Less => value < reference,
        }
    }
}

/// Which magnitude parser accepted the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    /// A bare non-negative integer. Unit is caller-defined.
    Integer,
    /// A byte count with a `c`/`k`/`M`/`G`/`T`/`P` suffix (1024-multiples).
    Size,
    /// A summable duration in seconds, e.g. `1h30m`.
    Duration,
}

static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)([ckMGTP])$").expect("static regex must compile")
});

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]+[smhdw])+$").expect("static regex must compile")
});

static DURATION_PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)([smhdw])").expect("static regex must compile"));

fn parse_integer(token: &str) -> Option<i64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn size_multiplier(suffix: &str) -> i64 {
    match suffix {
        "c" => 1,
        "k" => 1 << 10,
        "M" => 1 << 20,
        "G" => 1 << 30,
        "T" => 1 << 40,
        _ => 1 << 50,
    }
}

fn parse_size(token: &str) -> Option<i64> {
    let captures = SIZE_RE.captures(token)?;
    let count: i64 = captures.get(1)?.as_str().parse().ok()?;
    count.checked_mul(size_multiplier(captures.get(2)?.as_str()))
}

fn duration_multiplier(suffix: &str) -> i64 {
    match suffix {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        _ => 604_800,
    }
}

fn parse_duration(token: &str) -> Option<i64> {
    if !DURATION_RE.is_match(token) {
        return None;
    }
    let mut total: i64 = 0;
    for part in DURATION_PART_RE.captures_iter(token) {
        let count: i64 = part.get(1)?.as_str().parse().ok()?;
        let seconds = count.checked_mul(duration_multiplier(part.get(2)?.as_str()))?;
        total = total.checked_add(seconds)?;
    }
    Some(total)
}

fn parse_magnitude(token: &str, accepted: &[Magnitude]) -> Option<(i64, Magnitude)> {
    for kind in accepted {
        let parsed = match kind {
            Magnitude::Integer => parse_integer(token),
            Magnitude::Size => parse_size(token),
            Magnitude::Duration => parse_duration(token),
        };
        if let Some(value) = parsed {
            return Some((value, *kind));
        }
    }
    None
}

/// A parsed comparator: a three-way comparison against a reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparator {
    comparison: Comparison,
    reference: i64,
    magnitude: Magnitude,
}

impl Comparator {
    /// Parses a comparator token with every magnitude parser enabled.
    ///
    /// Returns [`ParseError::NoMatch`] when the token is not a comparator
    /// at all, so callers with a fallback (the meta primitive parser's
    /// exact-string match) can try their next alternative.
    ///
    /// # Examples
    ///
    /// ```
    /// use vfind_query::compare::Comparator;
    ///
    /// let cmp = Comparator::parse("+1k").unwrap();
    /// assert!(cmp.is_satisfied_by(2048));
    /// assert!(!cmp.is_satisfied_by(1024));
    ///
    /// // Brace-wrapping negates the magnitude.
    /// let cmp = Comparator::parse("{15}").unwrap();
    /// assert!(cmp.is_satisfied_by(-15));
    /// ```
    pub fn parse(token: &str) -> Result<Self> {
        Self::parse_with(
            token,
            &[Magnitude::Integer, Magnitude::Size, Magnitude::Duration],
        )
    }

    /// Parses a comparator token, trying the given magnitude parsers in
    /// order. The first that accepts the unsigned token wins.
    pub fn parse_with(token: &str, accepted: &[Magnitude]) -> Result<Self> {
        let (comparison, rest) = match token.strip_prefix('+') {
            Some(rest) => (Comparison::Greater, rest),
            None => match token.strip_prefix('-') {
                Some(rest) => (Comparison::Less, rest),
                None => (Comparison::Equal, token),
            },
        };

        let (negated, unsigned) = match rest.strip_prefix('{') {
            Some(inner) => match inner.strip_suffix('}') {
                Some(inner) => (true, inner),
                None => return Err(ParseError::NoMatch),
            },
            None => (false, rest),
        };

        let Some((value, magnitude)) = parse_magnitude(unsigned, accepted) else {
            return Err(ParseError::NoMatch);
        };
        let reference = if negated { -value } else { value };
        debug!(token, reference, ?comparison, ?magnitude, "Parsed comparator");
        Ok(Self {
            comparison,
            reference,
            magnitude,
        })
    }

    /// Applies the comparison with `value` on the left.
    pub fn is_satisfied_by(&self, value: i64) -> bool {
        self.comparison.compare(value, self.reference)
    }

    /// Which magnitude parser accepted the token. Callers use this to
    /// choose unit post-processing.
    pub fn magnitude(&self) -> Magnitude {
        self.magnitude
    }

    /// The parsed comparison.
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// The reference value in the magnitude parser's base unit (bytes for
    /// sizes, seconds for durations, unitless for integers).
    pub fn reference(&self) -> i64 {
        self.reference
    }
}

/// Division rounding toward positive infinity, for callers that bucket
/// byte counts into blocks or second diffs into whole days.
pub(crate) fn div_ceil(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    if value % divisor != 0 && (value > 0) == (divisor > 0) {
        quotient + 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_integer_equality() {
        let cmp = Comparator::parse("200").unwrap();
        assert_eq!(cmp.magnitude(), Magnitude::Integer);
        assert!(cmp.is_satisfied_by(200));
        assert!(!cmp.is_satisfied_by(199));
    }

    #[test]
    fn test_plus_is_strictly_greater() {
        let cmp = Comparator::parse("+2").unwrap();
        assert!(cmp.is_satisfied_by(3));
        assert!(!cmp.is_satisfied_by(2));
    }

    #[test]
    fn test_minus_is_strictly_less() {
        let cmp = Comparator::parse("-2").unwrap();
        assert!(cmp.is_satisfied_by(1));
        assert!(!cmp.is_satisfied_by(2));
    }

    #[test]
    fn test_braces_negate_magnitude() {
        let cmp = Comparator::parse("{15}").unwrap();
        assert_eq!(cmp.reference(), -15);
        assert!(cmp.is_satisfied_by(-15));

        let cmp = Comparator::parse("+{200}").unwrap();
        assert!(cmp.is_satisfied_by(-199));
        assert!(!cmp.is_satisfied_by(-200));
    }

    #[test]
    fn test_size_suffixes_are_1024_multiples() {
        assert_eq!(Comparator::parse("1c").unwrap().reference(), 1);
        assert_eq!(Comparator::parse("2k").unwrap().reference(), 2048);
        assert_eq!(Comparator::parse("1M").unwrap().reference(), 1 << 20);
        assert_eq!(Comparator::parse("1G").unwrap().reference(), 1 << 30);
        assert_eq!(Comparator::parse("1T").unwrap().reference(), 1 << 40);
        assert_eq!(Comparator::parse("1P").unwrap().reference(), 1 << 50);
        assert_eq!(Comparator::parse("1k").unwrap().magnitude(), Magnitude::Size);
    }

    #[test]
    fn test_durations_sum() {
        let cmp = Comparator::parse("1h30m").unwrap();
        assert_eq!(cmp.magnitude(), Magnitude::Duration);
        assert_eq!(cmp.reference(), 5_400);

        assert_eq!(Comparator::parse("1w").unwrap().reference(), 604_800);
        assert_eq!(Comparator::parse("2d12h").unwrap().reference(), 216_000);
    }

    #[test]
    fn test_parser_order_gives_integer_priority() {
        // "5" matches the integer parser before anything else.
        assert_eq!(Comparator::parse("5").unwrap().magnitude(), Magnitude::Integer);
    }

    #[test]
    fn test_restricted_parser_set() {
        let err = Comparator::parse_with("1h30m", &[Magnitude::Integer, Magnitude::Size])
            .unwrap_err();
        assert!(err.is_no_match());
    }

    #[test]
    fn test_non_numeric_is_no_match() {
        for token in ["foo", "", "+", "{}", "{foo}", "{5", "12x", "-"] {
            let err = Comparator::parse(token).unwrap_err();
            assert!(err.is_no_match(), "{token:?} should be NoMatch");
        }
    }

    #[test]
    fn test_div_ceil_rounds_up() {
        assert_eq!(div_ceil(0, 512), 0);
        assert_eq!(div_ceil(1, 512), 1);
        assert_eq!(div_ceil(512, 512), 1);
        assert_eq!(div_ceil(513, 512), 2);
        assert_eq!(div_ceil(86_401, 86_400), 2);
    }
}
