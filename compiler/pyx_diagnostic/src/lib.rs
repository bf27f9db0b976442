//! Diagnostic system for Pyx.
//!
//! Every reported problem carries:
//! - an error code, for `pyx explain`
//! - a message saying what went wrong
//! - a primary span saying where
//! - a suggestion saying how to fix it, when one exists
//!
//! The terminal emitter renders the offending source line with a caret and
//! tilde underline when it is given the source text.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
