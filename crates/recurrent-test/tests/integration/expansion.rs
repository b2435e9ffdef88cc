use chrono::{TimeZone, Utc};
use recurrent_test::config::ExpansionConfig;
use recurrent_test::error::RfcError;
use recurrent_test::rrule::expand::{ExpansionOptions, expand_rrule};

use super::helpers::{date, eastern_nine_am};

#[test_log::test]
fn window_of_unbounded_rule() {
    let options = ExpansionOptions::with_range(
        Utc.with_ymd_and_hms(1997, 10, 20, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(1997, 11, 1, 0, 0, 0).unwrap(),
    );

    let occurrences = expand_rrule(
        "RRULE:FREQ=WEEKLY;BYDAY=MO,TH",
        eastern_nine_am(1997, 9, 1),
        &options,
    )
    .expect("expansion should succeed");

    let dates: Vec<_> = occurrences.iter().map(chrono::DateTime::date_naive).collect();
    assert_eq!(
        dates,
        vec![
            date(1997, 10, 20),
            date(1997, 10, 23),
            date(1997, 10, 27),
            date(1997, 10, 30)
        ]
    );
    assert_eq!(occurrences[2].to_rfc3339(), "1997-10-27T09:00:00-05:00");
}

#[test]
fn configured_limit_applies() {
    let config = ExpansionConfig {
        max_instances: 25,
        default_tzid: "America/New_York".to_string(),
    };

    let occurrences = expand_rrule(
        "RRULE:FREQ=DAILY",
        eastern_nine_am(1997, 9, 2),
        &ExpansionOptions::from(&config),
    )
    .expect("expansion should succeed");

    assert_eq!(occurrences.len(), 25);
    assert_eq!(occurrences[24].date_naive(), date(1997, 9, 26));
}

#[test]
fn count_is_applied_before_the_window() {
    let options =
        ExpansionOptions::default().starting_at(Utc.with_ymd_and_hms(1997, 9, 5, 0, 0, 0).unwrap());

    let occurrences = expand_rrule(
        "RRULE:FREQ=DAILY;COUNT=5",
        eastern_nine_am(1997, 9, 2),
        &options,
    )
    .expect("expansion should succeed");

    let dates: Vec<_> = occurrences.iter().map(chrono::DateTime::date_naive).collect();
    assert_eq!(dates, vec![date(1997, 9, 5), date(1997, 9, 6)]);
}

#[test]
fn errors_surface_through_rfc_error() {
    let start = eastern_nine_am(1997, 9, 2);
    let options = ExpansionOptions::default();

    for (text, check) in [
        ("DTSTART:19970902T090000", "Not a recurrence rule"),
        ("RRULE:FREQ=DAILY;COUNT=0", "Parse error"),
        ("RRULE:FREQ=MONTHLY", "Generation error"),
    ] {
        let err: RfcError = expand_rrule(text, start, &options).unwrap_err();
        assert!(err.to_string().starts_with(check), "{text:?}: {err}");
    }
}
