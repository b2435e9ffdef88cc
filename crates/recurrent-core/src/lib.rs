//! Shared configuration and error types for the recurrent workspace.

pub mod config;
pub mod error;
