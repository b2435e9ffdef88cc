//! Recurrent - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `recurrent_test::` paths.

pub use recurrent_core::config;
pub use recurrent_rfc::error;
pub use recurrent_rfc::rfc::rrule;
