//! Recurrence rule parsing and occurrence generation.

pub mod error;
pub mod rfc;
