//! `-mtime`, `-ctime`, `-atime`: compare an entry timestamp's age.
//!
//! Age is measured from the compilation-time reference instant. A bare
//! integer counts whole days, with partial days rounded up (so `-mtime 1`
//! matches anything modified within the last 24 hours, matching `find`); an
//! explicit duration like `+1h30m` compares seconds unrounded. Entries
//! without the timestamp never match.

use chrono::{DateTime, Utc};

use crate::compare::{Comparator, Magnitude, div_ceil};
use crate::error::{ParseError, Result};
use crate::predicate::{EntryPredicate, SchemaPredicate};
use crate::tokens::Tokens;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Clone, Copy)]
enum Field {
    Atime,
    Mtime,
    Ctime,
}

pub(super) fn parse(
    trigger: &str,
    tokens: &mut Tokens,
    now: DateTime<Utc>,
) -> Result<EntryPredicate> {
    let Some(token) = tokens.next() else {
        return Err(ParseError::syntax("requires a time argument"));
    };
    let comparator = Comparator::parse_with(&token, &[Magnitude::Integer, Magnitude::Duration])
        .map_err(|_| ParseError::syntax(format!("invalid time '{token}'")))?;
    let field = match trigger {
        "-atime" => Field::Atime,
        "-ctime" => Field::Ctime,
        _ => Field::Mtime,
    };
    Ok(EntryPredicate::new(
        move |entry| {
            let stamp = match field {
                Field::Atime => entry.attributes.atime,
                Field::Mtime => entry.attributes.mtime,
                Field::Ctime => entry.attributes.ctime,
            };
            let Some(stamp) = stamp else {
                return false;
            };
            let age = (now - stamp).num_seconds();
            let value = match comparator.magnitude() {
                Magnitude::Integer => div_ceil(age, SECONDS_PER_DAY),
                _ => age,
            };
            comparator.is_satisfied_by(value)
        },
        SchemaPredicate::unknown(),
    ))
}
