//! Failures of the driver itself, as opposed to diagnostics about the
//! program being run.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("missing {what}")]
    Missing { what: &'static str },
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("option '{flag}' expects a non-negative integer, got '{value}'")]
    InvalidNumber { flag: &'static str, value: String },
    #[error("option '--color' expects auto, always or never, got '{0}'")]
    InvalidColor(String),
    #[error("unknown error code '{0}'")]
    UnknownCode(String),
    #[error("no documentation for {0}")]
    Undocumented(String),
}
