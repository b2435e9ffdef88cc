//! RRULE line parser.

use chrono::{DateTime, Utc};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::values::{parse_byday, parse_int_list, parse_positive, parse_until, parse_weekday};
use crate::rfc::rrule::core::{Frequency, Rule, Weekday, WeekdayNum};

/// Literal prefix every rule line starts with.
pub const RRULE_PREFIX: &str = "RRULE";

/// Rule parts collected before the cross-part checks run.
#[derive(Debug, Default)]
struct Draft {
    frequency: Option<Frequency>,
    interval: Option<u32>,
    until: Option<(DateTime<Utc>, usize)>,
    count: Option<(u32, usize)>,
    week_start: Option<Weekday>,
    by_second: Vec<i32>,
    by_minute: Vec<i32>,
    by_hour: Vec<i32>,
    by_day: Vec<WeekdayNum>,
    by_month_day: Vec<i32>,
    by_year_day: Vec<i32>,
    by_week_number: Vec<i32>,
    by_month: Vec<i32>,
    by_set_position: Vec<i32>,
}

/// ## Summary
/// Parses an `RRULE:KEY=VALUE;...` line into a [`Rule`].
///
/// Returns `Ok(None)` when the text does not start with `RRULE`, so callers
/// can run every line of a larger document through it. Whitespace anywhere
/// in the rule body is ignored and unknown keys are skipped.
///
/// ## Errors
/// Returns an error if a part is malformed, FREQ is missing or not one of
/// the seven canonical names, a value does not parse, or both UNTIL and
/// COUNT are present (in either order).
pub fn parse_rrule(text: &str) -> ParseResult<Option<Rule>> {
    let Some(rest) = text.strip_prefix(RRULE_PREFIX) else {
        return Ok(None);
    };

    let body: String = rest
        .strip_prefix(':')
        .unwrap_or(rest)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut draft = Draft::default();
    let mut offset = 0;

    for part in body.split(';') {
        let column = offset + 1;
        offset += part.len() + 1;

        if part.is_empty() {
            continue;
        }

        let (key, value) = part.split_once('=').ok_or_else(|| {
            ParseError::new(ParseErrorKind::MalformedPart, column).with_context(part.to_string())
        })?;

        parse_part(&mut draft, key, value, column)?;
    }

    finish(draft).map(Some)
}

/// Parses a single RRULE key-value pair into the draft.
fn parse_part(draft: &mut Draft, key: &str, value: &str, column: usize) -> ParseResult<()> {
    match key {
        "FREQ" => {
            draft.frequency = Some(value.parse().map_err(|()| {
                ParseError::new(ParseErrorKind::InvalidFrequency, column)
                    .with_context(value.to_string())
            })?);
        }
        "UNTIL" => draft.until = Some((parse_until(value, column)?, column)),
        "COUNT" => draft.count = Some((parse_positive(key, value, column)?, column)),
        "INTERVAL" => draft.interval = Some(parse_positive(key, value, column)?),
        "WKST" => draft.week_start = Some(parse_weekday(value, column)?),
        "BYSECOND" => draft.by_second = parse_int_list(key, value, column)?,
        "BYMINUTE" => draft.by_minute = parse_int_list(key, value, column)?,
        "BYHOUR" => draft.by_hour = parse_int_list(key, value, column)?,
        "BYDAY" => draft.by_day = parse_byday(value, column)?,
        "BYMONTHDAY" => draft.by_month_day = parse_int_list(key, value, column)?,
        "BYYEARDAY" => draft.by_year_day = parse_int_list(key, value, column)?,
        "BYWEEKNO" => draft.by_week_number = parse_int_list(key, value, column)?,
        "BYMONTH" => draft.by_month = parse_int_list(key, value, column)?,
        "BYSETPOS" => draft.by_set_position = parse_int_list(key, value, column)?,
        _ => tracing::trace!(key, column, "Ignoring unknown rule part"),
    }
    Ok(())
}

/// Runs the checks that need the whole rule and builds the final value.
fn finish(draft: Draft) -> ParseResult<Rule> {
    if let (Some((_, until_column)), Some((_, count_column))) = (draft.until, draft.count) {
        return Err(ParseError::new(
            ParseErrorKind::MutuallyExclusiveConstraint,
            until_column.max(count_column),
        ));
    }

    let frequency = draft
        .frequency
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingFrequency, 1))?;

    Ok(Rule {
        frequency,
        interval: draft.interval,
        until: draft.until.map(|(until, _)| until),
        count: draft.count.map(|(count, _)| count),
        week_start: draft.week_start,
        by_second: draft.by_second,
        by_minute: draft.by_minute,
        by_hour: draft.by_hour,
        by_day: draft.by_day,
        by_month_day: draft.by_month_day,
        by_year_day: draft.by_year_day,
        by_week_number: draft.by_week_number,
        by_month: draft.by_month,
        by_set_position: draft.by_set_position,
    })
}
