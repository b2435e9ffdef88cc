//! RFC 5545 recurrence rules: model, parser and occurrence generation.

pub mod core;
pub mod expand;
pub mod parse;
