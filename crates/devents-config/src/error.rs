//! Errors raised while loading configuration.

use std::io;

use thiserror::Error;

/// Everything that can go wrong between reading a config file and handing
/// out a validated [`Config`](crate::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Offending file.
        path: String,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// The file is larger than the loader accepts.
    #[error("{path} is {len} bytes; config files are limited to {limit} bytes")]
    TooLarge {
        /// Offending file.
        path: String,
        /// Actual size.
        len: u64,
        /// Accepted maximum.
        limit: u64,
    },

    /// TOML syntax or a value of the wrong type. `path` names the layer
    /// when the failure is not tied to a file.
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// Offending file or layer.
        path: String,
        /// Deserializer failure.
        #[source]
        source: toml::de::Error,
    },

    /// A well-typed value outside its allowed range.
    #[error("invalid `{field}`: {message}")]
    Invalid {
        /// Dotted field path, e.g. `emitter.all_channel`.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// A `DEVENTS_*` variable that cannot be used.
    #[error("environment variable {var}: {message}")]
    Env {
        /// Variable name.
        var: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Shorthand for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
