//! Error types for fieldkit-core.

use thiserror::Error;

/// Errors raised by core parsing and setup routines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A `property: value` declaration could not be parsed.
    #[error("invalid style declaration: '{0}'")]
    InvalidDeclaration(String),

    /// A length was not a plain number or a `px` value.
    #[error("invalid pixel length: '{0}'")]
    InvalidLength(String),

    /// Log filter directives did not parse.
    #[error("invalid log filter: {0}")]
    LogFilter(String),

    /// The tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}
