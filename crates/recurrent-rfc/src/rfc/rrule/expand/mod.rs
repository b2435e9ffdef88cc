//! Recurrence expansion.
//!
//! [`generate`] turns a parsed [`Rule`](crate::rfc::rrule::core::Rule) and a
//! zoned start into a lazy sequence of occurrences; [`expand_rrule`] parses
//! and collects in one call under [`ExpansionOptions`].

mod calendar;
mod expander;
mod generator;
mod timezone;

pub use calendar::{Anchor, ZonedDateTime, localize};
pub use expander::{ExpansionOptions, expand_rrule};
pub use generator::{GenerateError, Occurrences, generate};
pub use timezone::{ConversionError, TimeZoneResolver, convert_to_zoned};
