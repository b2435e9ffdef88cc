//! TZID lookup for rule start times.
//!
//! Calendar clients name zones in several dialects: IANA names and their
//! legacy aliases, Windows display names, and vendor-prefixed paths. ICU4X
//! maps each of them onto a canonical IANA name that chrono-tz understands.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;

use super::calendar::ZonedDateTime;

/// Path prefixes some clients put in front of IANA names.
const VENDOR_PREFIXES: [&str; 2] = ["/mozilla.org/", "/softwarestudio.org/"];

/// Failure to place a start time in a zone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("Unrecognized TZID {0:?}")]
    UnknownTimezone(String),

    /// The wall-clock value is skipped by a DST transition.
    #[error("{local} does not exist in {tzid} (DST gap)")]
    NonExistentTime { local: NaiveDateTime, tzid: String },
}

/// Memoizing TZID lookup.
///
/// Entries are keyed by the spelling the caller used, so aliases and Windows
/// names hit the cache as well.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    resolved: HashMap<String, Tz>,
}

impl TimeZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Maps a TZID onto a `chrono_tz::Tz`.
    ///
    /// The canonical ICU name is tried first. The caller's spelling is the
    /// fallback, for links chrono-tz knows under a newer canonical name.
    ///
    /// ## Errors
    /// Returns `ConversionError::UnknownTimezone` when no dialect recognizes `tzid`.
    pub fn resolve(&mut self, tzid: &str) -> Result<Tz, ConversionError> {
        if let Some(&tz) = self.resolved.get(tzid) {
            return Ok(tz);
        }

        let tz = [canonical_name(tzid), Cow::Borrowed(tzid)]
            .iter()
            .find_map(|name| name.parse::<Tz>().ok())
            .ok_or_else(|| ConversionError::UnknownTimezone(tzid.to_owned()))?;

        tracing::trace!(tzid, zone = tz.name(), "Resolved TZID");
        self.resolved.insert(tzid.to_owned(), tz);
        Ok(tz)
    }
}

fn strip_vendor_prefix(tzid: &str) -> &str {
    VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| tzid.strip_prefix(prefix))
        .unwrap_or(tzid)
}

/// Canonical IANA name for `tzid`, or the prefix-stripped input when ICU
/// does not recognize it.
fn canonical_name(tzid: &str) -> Cow<'_, str> {
    let name = strip_vendor_prefix(tzid);
    let iana = IanaParserExtended::new();

    if let Some(windows_zone) = WindowsParser::new().parse(name, None)
        && let Some(entry) = iana.iter().find(|entry| entry.time_zone == windows_zone)
    {
        return Cow::Owned(entry.canonical.to_string());
    }

    let parsed = iana.parse(name);
    if parsed.time_zone == icu::time::TimeZone::UNKNOWN {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(parsed.canonical.to_string())
    }
}

/// ## Summary
/// Places a wall-clock start time in the zone named by `tzid`.
///
/// A value that occurs twice (DST fold) resolves to its first instant. Start
/// times are taken literally, unlike generated occurrences, which are moved
/// out of DST gaps.
///
/// ## Errors
/// Returns an error if `tzid` is unknown or `local_time` falls into a DST gap.
pub fn convert_to_zoned(
    local_time: NaiveDateTime,
    tzid: &str,
    resolver: &mut TimeZoneResolver,
) -> Result<ZonedDateTime, ConversionError> {
    let tz = resolver.resolve(tzid)?;

    tz.from_local_datetime(&local_time)
        .earliest()
        .ok_or_else(|| ConversionError::NonExistentTime {
            local: local_time,
            tzid: tzid.to_owned(),
        })
}
