//! Errors raised while installing the log subscriber.

use std::path::PathBuf;

use thiserror::Error;

/// Why logging could not be set up.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level or one of the directives is not a valid filter.
    #[error("invalid log filter `{filter}`: {reason}")]
    InvalidFilter {
        /// The rejected level or directive.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A format name other than `pretty`, `compact`, `json` or `full`.
    #[error("unknown log format `{0}`")]
    UnknownFormat(String),

    /// The log directory could not be created or opened for appending.
    #[error("cannot log to {}: {reason}", path.display())]
    LogDirectory {
        /// Target directory.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// Another global subscriber was installed first.
    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Shorthand for telemetry results.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
