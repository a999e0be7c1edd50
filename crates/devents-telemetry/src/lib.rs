//! Devents Telemetry - logging setup for applications embedding devents.
//!
//! The engine only emits `tracing` events. This crate installs a global
//! `tracing-subscriber` to print them:
//! - Pretty, compact, JSON or full output
//! - stdout, stderr or a rotating log file
//! - Per-target filter directives (e.g. `devents=trace`)
//!
//! # Example
//!
//! ```rust,no_run
//! use devents_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), devents_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("devents=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_logging};
