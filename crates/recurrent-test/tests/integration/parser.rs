use recurrent_test::rrule::core::{Frequency, Weekday, WeekdayNum};
use recurrent_test::rrule::parse::{ParseErrorKind, parse_rrule};

use super::helpers::rule;

#[test]
fn lines_without_prefix_are_not_rules() {
    for text in [
        "",
        "FREQ=DAILY",
        "rrule:FREQ=DAILY",
        " RRULE:FREQ=DAILY",
        "DTSTART;TZID=US-Eastern:19970902T090000",
        "EXRULE:FREQ=DAILY",
    ] {
        assert_eq!(parse_rrule(text), Ok(None), "{text:?}");
    }
}

#[test]
fn non_canonical_frequencies_are_rejected() {
    for text in [
        "RRULE:FREQ=daily",
        "RRULE:FREQ=Weekly",
        "RRULE:FREQ=FORTNIGHTLY",
        "RRULE:FREQ=",
    ] {
        let err = parse_rrule(text).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidFrequency, "{text:?}");
    }
}

#[test]
fn until_and_count_conflict_in_any_order() {
    for text in [
        "RRULE:FREQ=DAILY;UNTIL=19971224T000000Z;COUNT=3",
        "RRULE:FREQ=DAILY;COUNT=3;UNTIL=19971224T000000Z",
        "RRULE:COUNT=3;FREQ=DAILY;UNTIL=19971224T000000Z",
        "RRULE:UNTIL=19971224T000000Z;COUNT=3",
    ] {
        let err = parse_rrule(text).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MutuallyExclusiveConstraint,
            "{text:?}"
        );
    }
}

#[test]
fn malformed_until_is_reported() {
    for text in [
        "RRULE:FREQ=DAILY;UNTIL=1997",
        "RRULE:FREQ=DAILY;UNTIL=19971224",
        "RRULE:FREQ=DAILY;UNTIL=19971324T000000Z",
        "RRULE:FREQ=DAILY;UNTIL=1997-12-24T00:00:00Z",
    ] {
        let err = parse_rrule(text).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedTimestamp, "{text:?}");
        assert_eq!(err.column, 12, "{text:?}");
    }
}

#[test]
fn rules_from_calendar_clients_parse() {
    let parsed = rule("RRULE:FREQ=MONTHLY;INTERVAL=2;COUNT=10;BYDAY=1SU,-1SU");
    assert_eq!(parsed.frequency, Frequency::Monthly);
    assert_eq!(parsed.interval(), 2);
    assert_eq!(
        parsed.by_day,
        vec![
            WeekdayNum::nth(1, Weekday::Sunday),
            WeekdayNum::nth(-1, Weekday::Sunday)
        ]
    );

    let folded = rule("RRULE:FREQ=MONTHLY;INTERVAL=18;COUNT=10;BYMONTHDAY=10,11,12,13,14,\n 15");
    assert_eq!(folded.by_month_day, vec![10, 11, 12, 13, 14, 15]);
}

#[test]
fn normalized_form_parses_to_the_same_rule() {
    for text in [
        "RRULE:FREQ=WEEKLY;INTERVAL=2;COUNT=4;BYDAY=TU,SU;WKST=SU",
        "RRULE:FREQ=YEARLY;UNTIL=20000131T090000Z;BYMONTH=1;BYDAY=SU,MO,TU,WE,TH,FR,SA",
        "RRULE:FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-2",
    ] {
        let parsed = rule(text);
        let normalized = format!("RRULE:{parsed}");
        assert_eq!(rule(&normalized), parsed, "{text:?}");
    }
}
