//! Value parsers for the individual rule parts.
//!
//! Error sources are discarded during parsing (`map_err_ignore`): the kind
//! and the offending text carry everything a caller can act on.
#![expect(
    clippy::map_err_ignore,
    reason = "Value parsers report the offending text instead of the std parse error"
)]

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::rrule::core::{Weekday, WeekdayNum};

/// Parses a compact DATE-TIME value (RFC 5545 §3.3.5).
///
/// Format: `YYYYMMDD"T"HHMMSS[Z]` (e.g., "19970902T090000", "19971224T000000Z").
/// Returns the wall-clock value and whether the `Z` (UTC) suffix was present.
///
/// ## Errors
/// Returns `MalformedTimestamp` unless the input has exactly this shape and
/// names a real calendar date and time of day.
pub fn parse_compact_datetime(s: &str, column: usize) -> ParseResult<(NaiveDateTime, bool)> {
    let malformed = || {
        ParseError::new(ParseErrorKind::MalformedTimestamp, column)
            .with_context(format!("expected YYYYMMDDTHHMMSS[Z], got {s:?}"))
    };

    let (body, is_utc) = match s.strip_suffix('Z') {
        Some(stripped) => (stripped, true),
        None => (s, false),
    };

    let bytes = body.as_bytes();
    if bytes.len() != 15 || bytes[8] != b'T' {
        return Err(malformed());
    }
    let digits_ok = bytes[..8]
        .iter()
        .chain(&bytes[9..])
        .all(u8::is_ascii_digit);
    if !digits_ok {
        return Err(malformed());
    }

    let field = |range: std::ops::Range<usize>| -> ParseResult<u32> {
        body[range].parse().map_err(|_| malformed())
    };

    let year = i32::try_from(field(0..4)?).map_err(|_| malformed())?;
    let date = NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?).ok_or_else(malformed)?;
    let time = NaiveTime::from_hms_opt(field(9..11)?, field(11..13)?, field(13..15)?)
        .ok_or_else(malformed)?;

    Ok((NaiveDateTime::new(date, time), is_utc))
}

/// Parses an UNTIL value, which must be a UTC DATE-TIME (`YYYYMMDDTHHMMSSZ`).
///
/// ## Errors
/// Returns `MalformedTimestamp` for any other shape, including local times.
pub fn parse_until(s: &str, column: usize) -> ParseResult<DateTime<Utc>> {
    let (naive, is_utc) = parse_compact_datetime(s, column)?;
    if !is_utc {
        return Err(ParseError::new(ParseErrorKind::MalformedTimestamp, column)
            .with_context(format!("UNTIL must be UTC (trailing Z), got {s:?}")));
    }
    Ok(naive.and_utc())
}

/// Parses a strictly positive base-10 integer (COUNT, INTERVAL).
pub(crate) fn parse_positive(key: &str, s: &str, column: usize) -> ParseResult<u32> {
    let invalid = || {
        ParseError::new(ParseErrorKind::InvalidInteger, column)
            .with_context(format!("{key} must be a positive integer, got {s:?}"))
    };
    match s.parse::<u32>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(n) => Ok(n),
    }
}

/// Parses a comma-separated integer list, keeping the input order.
pub(crate) fn parse_int_list<T: FromStr>(key: &str, s: &str, column: usize) -> ParseResult<Vec<T>> {
    s.split(',')
        .map(|v| {
            v.parse().map_err(|_| {
                ParseError::new(ParseErrorKind::InvalidInteger, column)
                    .with_context(format!("{key} entry {v:?}"))
            })
        })
        .collect()
}

/// Parses a single two-letter weekday code (WKST).
pub(crate) fn parse_weekday(s: &str, column: usize) -> ParseResult<Weekday> {
    Weekday::parse(s).ok_or_else(|| {
        ParseError::new(ParseErrorKind::InvalidWeekday, column).with_context(s.to_string())
    })
}

/// Parses a BYDAY value (weekdays with optional ordinals).
pub(crate) fn parse_byday(s: &str, column: usize) -> ParseResult<Vec<WeekdayNum>> {
    s.split(',')
        .map(|v| parse_weekday_num(v, column))
        .collect()
}

/// Parses a single weekday with optional ordinal (e.g., "MO", "1MO", "-1FR").
fn parse_weekday_num(s: &str, column: usize) -> ParseResult<WeekdayNum> {
    // The weekday code is always the last two characters.
    if s.len() < 2 || !s.is_char_boundary(s.len() - 2) {
        return Err(
            ParseError::new(ParseErrorKind::InvalidWeekday, column).with_context(s.to_string())
        );
    }

    let (ordinal_str, weekday_str) = s.split_at(s.len() - 2);
    let weekday = parse_weekday(weekday_str, column)?;

    if ordinal_str.is_empty() {
        return Ok(WeekdayNum::every(weekday));
    }

    let ordinal = ordinal_str
        .parse::<i8>()
        .ok()
        .filter(|n| *n != 0 && (-53..=53).contains(n))
        .ok_or_else(|| {
            ParseError::new(ParseErrorKind::InvalidInteger, column)
                .with_context(format!("BYDAY ordinal {ordinal_str:?}"))
        })?;

    Ok(WeekdayNum::nth(ordinal, weekday))
}
