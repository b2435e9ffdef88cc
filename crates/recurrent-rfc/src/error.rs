use thiserror::Error;

use crate::rfc::rrule::expand::{ConversionError, GenerateError};
use crate::rfc::rrule::parse::ParseError;

/// Recurrence parsing and expansion errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Generation error: {0}")]
    GenerateError(#[from] GenerateError),

    #[error("Timezone error: {0}")]
    ConversionError(#[from] ConversionError),

    #[error("Not a recurrence rule: {0}")]
    NotARecurrenceRule(String),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
