//! Recurrence rule model.
//!
//! A [`Rule`] is produced once by the parser and only read afterwards by the
//! generator.

mod rule;

pub use rule::{Frequency, Rule, Weekday, WeekdayNum, WeekdaySet};
