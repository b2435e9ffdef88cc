//! Civil-calendar arithmetic for occurrence generation.
//!
//! Dates are stepped as plain calendar dates and only turned into zoned
//! timestamps when an occurrence is produced, so the wall-clock time of the
//! start survives daylight-saving transitions unchanged.

use chrono::{
    DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone,
};
use chrono_tz::Tz;

use crate::rfc::rrule::core::Weekday;

/// Timestamp carrying an IANA zone, the unit of every produced occurrence.
pub type ZonedDateTime = DateTime<Tz>;

/// Zone and wall-clock time shared by every occurrence of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    tz: Tz,
    time: NaiveTime,
}

impl Anchor {
    /// Captures the zone and local time of day of `start`.
    #[must_use]
    pub fn of(start: &ZonedDateTime) -> Self {
        Self {
            tz: start.timezone(),
            time: start.time(),
        }
    }

    /// Places the anchor's wall-clock time on `date` in the anchor's zone.
    #[must_use]
    pub fn at(&self, date: NaiveDate) -> Option<ZonedDateTime> {
        localize(self.tz, date.and_time(self.time))
    }
}

/// ## Summary
/// Resolves a local wall-clock value in `tz`.
///
/// Ambiguous values (DST fold) take the earlier instant. Values inside a gap
/// are read with the offset in force before the transition, which lands them
/// past it by the length of the gap: one hour for a DST change, a whole day
/// for a zone that skips a date. Returns `None` only outside chrono's range.
#[must_use]
pub fn localize(tz: Tz, local: NaiveDateTime) -> Option<ZonedDateTime> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _latest) => Some(earliest),
        LocalResult::None => {
            // No gap is longer than a day, so a day earlier is before the transition.
            let before = local.checked_sub_signed(TimeDelta::days(1))?;
            let offset = tz.offset_from_utc_datetime(&before).fix();
            let utc = local
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))?;
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

#[must_use]
pub fn weekday(date: NaiveDate) -> Weekday {
    Weekday::from(date.weekday())
}

#[must_use]
pub fn add_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

#[must_use]
pub fn add_weeks(date: NaiveDate, weeks: u32) -> Option<NaiveDate> {
    add_days(date, weeks.checked_mul(7)?)
}

/// Adds whole years; Feb 29 lands on Feb 28 in common years.
#[must_use]
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(years.checked_mul(12)?))
}

/// `month`/`day` in `year`. Feb 29 falls back to Feb 28 in common years.
#[must_use]
pub fn anniversary(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
        (month == 2 && day == 29)
            .then(|| NaiveDate::from_ymd_opt(year, 2, 28))
            .flatten()
    })
}

/// Every date of `month` in `year`, in order. Empty for an invalid month.
pub fn days_of_month(year: i32, month: u32) -> impl Iterator<Item = NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .into_iter()
        .flat_map(move |first| first.iter_days().take_while(move |d| d.month() == month))
}
