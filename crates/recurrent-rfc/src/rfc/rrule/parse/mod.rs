//! Recurrence rule parsing (RFC 5545 §3.3.10 subset).
//!
//! ## Usage
//!
//! ```rust
//! use recurrent_rfc::rfc::rrule::core::Frequency;
//! use recurrent_rfc::rfc::rrule::parse::parse_rrule;
//!
//! let rule = parse_rrule("RRULE:FREQ=DAILY;COUNT=10").unwrap().unwrap();
//! assert_eq!(rule.frequency, Frequency::Daily);
//! assert_eq!(rule.count, Some(10));
//!
//! // Lines that are not recurrence rules are passed over.
//! assert!(parse_rrule("DTSTART:19970902T090000").unwrap().is_none());
//! ```

mod error;
mod parser;
mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use parser::{RRULE_PREFIX, parse_rrule};
pub use values::{parse_compact_datetime, parse_until};
