//! Bounded expansion of RRULE text into a list of occurrences.

use chrono::{DateTime, Utc};
use recurrent_core::config::ExpansionConfig;

use super::calendar::ZonedDateTime;
use super::generator::generate;
use crate::error::{RfcError, RfcResult};
use crate::rfc::rrule::parse::parse_rrule;

/// Options for recurrence expansion.
#[derive(Debug, Clone)]
pub struct ExpansionOptions {
    /// Maximum number of occurrences to return.
    pub max_instances: usize,

    /// Start of time range filter (inclusive).
    pub range_start: Option<DateTime<Utc>>,

    /// End of time range filter (exclusive).
    pub range_end: Option<DateTime<Utc>>,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            max_instances: 1000,
            range_start: None,
            range_end: None,
        }
    }
}

impl From<&ExpansionConfig> for ExpansionOptions {
    fn from(config: &ExpansionConfig) -> Self {
        Self::default().with_max_instances(config.max_instances)
    }
}

impl ExpansionOptions {
    /// Creates expansion options with a time range.
    #[must_use]
    pub fn with_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            range_start: Some(start),
            range_end: Some(end),
            ..Self::default()
        }
    }

    /// Sets the maximum number of instances.
    #[must_use]
    pub fn with_max_instances(mut self, max: usize) -> Self {
        self.max_instances = max;
        self
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.range_start = Some(start);
        self
    }

    /// Sets the exclusive upper bound.
    #[must_use]
    pub fn ending_before(mut self, end: DateTime<Utc>) -> Self {
        self.range_end = Some(end);
        self
    }

    fn admits(&self, occurrence: &ZonedDateTime) -> bool {
        self.range_start.is_none_or(|start| *occurrence >= start)
    }

    fn reached_end(&self, occurrence: &ZonedDateTime) -> bool {
        self.range_end.is_some_and(|end| *occurrence >= end)
    }
}

/// ## Summary
/// Parses an RRULE line and collects its occurrences from `start`.
///
/// Occurrences before `range_start` are skipped. Expansion stops at the first
/// occurrence at or after `range_end`, or once `max_instances` occurrences
/// have been collected, whichever comes first. Unbounded rules therefore need
/// a range end or rely on the instance limit.
///
/// ## Errors
///
/// Returns an error if:
/// - The text is not an RRULE line
/// - The rule text is malformed
/// - The rule requests a frequency or rule part combination the generator
///   does not support
///
/// ## Side Effects
///
/// None - expansion is performed in memory.
pub fn expand_rrule(
    rrule_text: &str,
    start: ZonedDateTime,
    options: &ExpansionOptions,
) -> RfcResult<Vec<ZonedDateTime>> {
    let rule = parse_rrule(rrule_text)?
        .ok_or_else(|| RfcError::NotARecurrenceRule(rrule_text.to_string()))?;

    let occurrences: Vec<_> = generate(start, &rule)?
        .filter(|o| options.admits(o))
        .take_while(|o| !options.reached_end(o))
        .take(options.max_instances)
        .collect();

    tracing::debug!(
        count = occurrences.len(),
        limit = options.max_instances,
        "Expanded recurrence rule"
    );

    Ok(occurrences)
}
