//! Event channel error types.

use thiserror::Error;

/// Errors raised by registration operations.
///
/// Only registration can fail. Removing handlers, triggering events and
/// stopping listeners are no-ops when there is nothing to act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The call named no events, or a named registration had no callback.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the arguments.
        reason: String,
    },

    /// The emitter rejects duplicates and this binding already exists.
    #[error("handler already registered for event '{event}'")]
    DuplicateHandler {
        /// Event name the duplicate was registered under.
        event: String,
    },

    /// A foreign event target refused a registration.
    #[error("event target rejected registration: {message}")]
    Target {
        /// Description supplied by the target.
        message: String,
    },
}

impl EventError {
    /// Shorthand for [`EventError::InvalidArgument`].
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Result type for event operations.
pub type EventResult<T> = Result<T, EventError>;
