//! Integration tests for rule parsing and occurrence generation.

mod expansion;
mod helpers;
mod parser;
