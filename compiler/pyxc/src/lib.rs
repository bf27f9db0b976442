//! Pyx command-line driver.
//!
//! The binary in `main.rs` only dispatches on the command name; each
//! command lives in `commands` so it can be tested without a process.

pub mod commands;
mod error;
pub mod tracing_setup;

pub use error::CliError;
