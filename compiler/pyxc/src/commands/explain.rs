//! The `explain` command: print the documentation for an error code.

use pyx_diagnostic::{ErrorCode, ErrorDocs};

use crate::CliError;

/// Documentation for a code such as `E6001`.
pub fn explain_error(code: &str) -> Result<&'static str, CliError> {
    let parsed: ErrorCode = code
        .parse()
        .map_err(|()| CliError::UnknownCode(code.to_string()))?;
    ErrorDocs::get(parsed).ok_or_else(|| CliError::Undocumented(parsed.to_string()))
}
