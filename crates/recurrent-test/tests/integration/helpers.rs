//! Shared constructors for integration tests.

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;
use recurrent_test::rrule::core::Rule;
use recurrent_test::rrule::expand::ZonedDateTime;
use recurrent_test::rrule::parse::parse_rrule;

/// 09:00 local time in New York on the given date.
pub fn eastern_nine_am(y: i32, m: u32, d: u32) -> ZonedDateTime {
    Tz::America__New_York
        .with_ymd_and_hms(y, m, d, 9, 0, 0)
        .single()
        .expect("09:00 is unambiguous in New York")
}

/// 09:00 UTC on the given date.
pub fn utc_nine_am(y: i32, m: u32, d: u32) -> ZonedDateTime {
    Tz::UTC
        .with_ymd_and_hms(y, m, d, 9, 0, 0)
        .single()
        .expect("UTC has no gaps")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Parses a rule line that is known to be valid.
pub fn rule(text: &str) -> Rule {
    parse_rrule(text)
        .unwrap_or_else(|err| panic!("{text:?} should parse: {err}"))
        .unwrap_or_else(|| panic!("{text:?} is not an RRULE line"))
}
