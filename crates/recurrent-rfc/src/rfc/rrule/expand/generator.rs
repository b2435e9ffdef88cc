//! Occurrence generation for parsed recurrence rules.
//!
//! A generation run is an explicit state machine. The rule is compiled once
//! into a [`Plan`]; each call to [`Plan::cycle`] expands the candidates of a
//! single frequency period (one day, one week, one year) starting at the
//! cursor date and reports where the next period starts. [`Occurrences`]
//! drains those candidates one at a time, applying COUNT on every yield and
//! UNTIL at the start of every period.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use super::calendar::{
    Anchor, ZonedDateTime, add_days, add_weeks, add_years, anniversary, days_of_month, weekday,
};
use crate::rfc::rrule::core::{Frequency, Rule, Weekday, WeekdaySet};

/// Error raised before any occurrence of a run is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// The frequency has no generation algorithm.
    #[error("Unsupported frequency: {0}")]
    UnsupportedFrequency(Frequency),

    /// A rule part combination has no generation algorithm.
    #[error("Unsupported {part}: {reason}")]
    UnsupportedRulePart {
        part: &'static str,
        reason: &'static str,
    },

    /// The rule carries both UNTIL and COUNT.
    #[error("UNTIL and COUNT are mutually exclusive")]
    MutuallyExclusiveConstraint,

    /// BYMONTH value outside 1-12.
    #[error("BYMONTH value out of range: {0}")]
    InvalidByMonth(i32),
}

/// Per-frequency expansion strategy compiled from a [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Plan {
    Daily {
        interval: u32,
        by_day: Option<WeekdaySet>,
    },
    Weekly {
        interval: u32,
        by_day: Option<WeekdaySet>,
        week_start: Weekday,
    },
    YearlyByMonth {
        interval: u32,
        months: Vec<u32>,
        by_day: Option<WeekdaySet>,
    },
    YearlyOnAnchorDay {
        interval: u32,
        month: u32,
        day: u32,
    },
    /// The rule can never match; produces nothing.
    Empty,
}

/// Candidates of one frequency period and the cursor date of the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cycle {
    pub(crate) candidates: Vec<NaiveDate>,
    /// `None` once the calendar runs out of representable dates.
    pub(crate) next: Option<NaiveDate>,
}

impl Plan {
    /// ## Summary
    /// Compiles `rule` for a run starting on `start`.
    ///
    /// ## Errors
    /// Returns an error for frequencies and rule part combinations that have
    /// no generation algorithm, for rules carrying both UNTIL and COUNT, and
    /// for BYMONTH values outside 1-12.
    pub(crate) fn for_rule(rule: &Rule, start: NaiveDate) -> Result<Self, GenerateError> {
        if rule.until.is_some() && rule.count.is_some() {
            return Err(GenerateError::MutuallyExclusiveConstraint);
        }

        if rule.by_day.iter().any(|d| d.ordinal.is_some()) {
            return Err(GenerateError::UnsupportedRulePart {
                part: "BYDAY",
                reason: "ordinal weekday entries are not supported",
            });
        }

        let interval = rule.interval();
        if interval == 0 {
            return Err(GenerateError::UnsupportedRulePart {
                part: "INTERVAL",
                reason: "interval must be positive",
            });
        }
        let by_day = rule.by_day_set();

        match rule.frequency {
            Frequency::Daily => {
                // Stepping by whole weeks never leaves the start weekday.
                if let Some(days) = by_day
                    && interval % 7 == 0
                    && !days.contains(weekday(start))
                {
                    tracing::debug!(interval, "BYDAY can never match the stepped dates");
                    return Ok(Self::Empty);
                }
                Ok(Self::Daily { interval, by_day })
            }
            Frequency::Weekly => Ok(Self::Weekly {
                interval,
                by_day,
                week_start: rule.week_start(),
            }),
            Frequency::Yearly if !rule.by_month.is_empty() => {
                let months = rule
                    .by_month
                    .iter()
                    .map(|&m| {
                        u32::try_from(m)
                            .ok()
                            .filter(|month| (1..=12).contains(month))
                            .ok_or(GenerateError::InvalidByMonth(m))
                    })
                    .collect::<Result<_, _>>()?;
                Ok(Self::YearlyByMonth {
                    interval,
                    months,
                    by_day,
                })
            }
            Frequency::Yearly if by_day.is_some() => Err(GenerateError::UnsupportedRulePart {
                part: "BYDAY",
                reason: "yearly rules need BYMONTH alongside BYDAY",
            }),
            Frequency::Yearly => Ok(Self::YearlyOnAnchorDay {
                interval,
                month: start.month(),
                day: start.day(),
            }),
            Frequency::Monthly | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
                Err(GenerateError::UnsupportedFrequency(rule.frequency))
            }
        }
    }

    /// ## Summary
    /// Expands the period that starts at `cursor`.
    ///
    /// Candidates earlier than `not_before` (the start date) are dropped.
    pub(crate) fn cycle(&self, cursor: NaiveDate, not_before: NaiveDate) -> Cycle {
        match self {
            Self::Daily { interval, by_day } => Cycle {
                candidates: matches(*by_day, cursor).then_some(cursor).into_iter().collect(),
                next: add_days(cursor, *interval),
            },
            Self::Weekly {
                interval,
                by_day: None,
                ..
            } => Cycle {
                candidates: vec![cursor],
                next: add_weeks(cursor, *interval),
            },
            Self::Weekly {
                interval,
                by_day: Some(days),
                week_start,
            } => weekly_cycle(cursor, *days, *week_start, *interval),
            Self::YearlyByMonth {
                interval,
                months,
                by_day,
            } => Cycle {
                candidates: months
                    .iter()
                    .flat_map(|&month| days_of_month(cursor.year(), month))
                    .filter(|&d| d >= not_before && matches(*by_day, d))
                    .collect(),
                next: add_years(cursor, *interval),
            },
            Self::YearlyOnAnchorDay {
                interval,
                month,
                day,
            } => Cycle {
                // Years without the anchor day (Feb 29) are skipped.
                candidates: NaiveDate::from_ymd_opt(cursor.year(), *month, *day)
                    .filter(|&d| d >= not_before)
                    .into_iter()
                    .collect(),
                // Taken from the anchor day each year, so Feb 29 returns in leap years.
                next: i32::try_from(*interval)
                    .ok()
                    .and_then(|years| cursor.year().checked_add(years))
                    .and_then(|year| anniversary(year, *month, *day)),
            },
            Self::Empty => Cycle {
                candidates: Vec::new(),
                next: None,
            },
        }
    }
}

fn matches(by_day: Option<WeekdaySet>, date: NaiveDate) -> bool {
    by_day.is_none_or(|days| days.contains(weekday(date)))
}

/// Scans from `cursor` up to (excluding) the next `week_start` day, then
/// skips `interval - 1` further weeks.
fn weekly_cycle(cursor: NaiveDate, days: WeekdaySet, week_start: Weekday, interval: u32) -> Cycle {
    let mut candidates = Vec::new();
    let mut day = cursor;

    loop {
        if days.contains(weekday(day)) {
            candidates.push(day);
        }
        let Some(following) = add_days(day, 1) else {
            return Cycle {
                candidates,
                next: None,
            };
        };
        day = following;
        if weekday(day) == week_start {
            break;
        }
    }

    Cycle {
        candidates,
        next: add_weeks(day, interval.saturating_sub(1)),
    }
}

/// Mutable position of a generation run. Never shared outside its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    /// Start of the next period; `None` once the run is exhausted.
    date: Option<NaiveDate>,
    /// Occurrences produced so far.
    emitted: u32,
}

/// Lazy, single-pass sequence of occurrences.
///
/// Created by [`generate`]. Unbounded rules never end on their own; the
/// consumer decides when to stop pulling.
#[derive(Debug)]
pub struct Occurrences {
    plan: Plan,
    anchor: Anchor,
    start_date: NaiveDate,
    until: Option<DateTime<Utc>>,
    count: Option<u32>,
    cursor: Cursor,
    pending: VecDeque<NaiveDate>,
}

/// ## Summary
/// Starts generating the occurrences of `rule` from `start`.
///
/// Every occurrence keeps the zone and wall-clock time of `start`; its UTC
/// offset is recomputed per date so daylight-saving changes are honored.
/// Calling this twice with the same arguments yields identical sequences.
///
/// ## Errors
/// Returns a [`GenerateError`] before any occurrence is produced when the
/// rule requests something this generator does not implement.
pub fn generate(start: ZonedDateTime, rule: &Rule) -> Result<Occurrences, GenerateError> {
    let start_date = start.date_naive();
    let plan = Plan::for_rule(rule, start_date)?;

    tracing::debug!(%start, rule = %rule, "Starting occurrence generation");

    let mut pending = VecDeque::new();

    // The start of a weekly rule is always an occurrence, even off its BYDAY.
    if let Plan::Weekly {
        by_day: Some(days), ..
    } = &plan
        && !days.contains(weekday(start_date))
    {
        pending.push_back(start_date);
    }

    let date = (plan != Plan::Empty).then_some(start_date);

    Ok(Occurrences {
        plan,
        anchor: Anchor::of(&start),
        start_date,
        until: rule.until,
        count: rule.count,
        cursor: Cursor { date, emitted: 0 },
        pending,
    })
}

impl Occurrences {
    fn exhaust(&mut self) {
        self.cursor.date = None;
        self.pending.clear();
    }
}

impl Iterator for Occurrences {
    type Item = ZonedDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.count.is_some_and(|count| self.cursor.emitted >= count) {
                return None;
            }

            if let Some(date) = self.pending.pop_front() {
                let Some(occurrence) = self.anchor.at(date) else {
                    tracing::warn!(%date, "Occurrence outside the representable range, ending run");
                    self.exhaust();
                    return None;
                };
                self.cursor.emitted = self.cursor.emitted.saturating_add(1);
                return Some(occurrence);
            }

            let date = self.cursor.date?;

            let Some(position) = self.anchor.at(date) else {
                tracing::warn!(%date, "Cursor outside the representable range, ending run");
                self.exhaust();
                return None;
            };

            if self
                .until
                .is_some_and(|until| position.with_timezone(&Utc) > until)
            {
                tracing::trace!(%position, "Cursor passed UNTIL");
                self.exhaust();
                return None;
            }

            let cycle = self.plan.cycle(date, self.start_date);
            tracing::trace!(%date, candidates = cycle.candidates.len(), "Expanded period");

            if cycle.next.is_none() {
                tracing::warn!(%date, "Calendar range exhausted, ending run after this period");
            }
            self.pending.extend(cycle.candidates);
            self.cursor.date = cycle.next;
        }
    }
}

impl FusedIterator for Occurrences {}
