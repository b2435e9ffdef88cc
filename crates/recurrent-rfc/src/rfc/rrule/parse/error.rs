//! Recurrence rule parsing error types.

use std::fmt;

/// Result type for rule parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Error type for rule parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Kind of error.
    pub kind: ParseErrorKind,
    /// 1-based byte offset of the offending `KEY=VALUE` segment, after whitespace removal.
    pub column: usize,
    /// Additional context about the error.
    pub context: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, column: usize) -> Self {
        Self {
            kind,
            column,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at column {}", self.kind, self.column)?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {ctx}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Kinds of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Rule part without a `=` separator.
    MalformedPart,
    /// No FREQ part in the rule.
    MissingFrequency,
    /// FREQ value outside the canonical names.
    InvalidFrequency,
    /// UNTIL and COUNT are mutually exclusive.
    MutuallyExclusiveConstraint,
    /// UNTIL value is not a `YYYYMMDDTHHMMSSZ` timestamp.
    MalformedTimestamp,
    /// Invalid integer value.
    InvalidInteger,
    /// Invalid weekday code.
    InvalidWeekday,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPart => write!(f, "malformed rule part"),
            Self::MissingFrequency => write!(f, "missing FREQ"),
            Self::InvalidFrequency => write!(f, "invalid frequency"),
            Self::MutuallyExclusiveConstraint => {
                write!(f, "UNTIL and COUNT are mutually exclusive")
            }
            Self::MalformedTimestamp => write!(f, "malformed timestamp"),
            Self::InvalidInteger => write!(f, "invalid integer value"),
            Self::InvalidWeekday => write!(f, "invalid weekday"),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
