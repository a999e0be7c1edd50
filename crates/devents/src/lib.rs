//! Devents - an embeddable, synchronous event channel.
//!
//! This crate provides:
//! - [`Emitter`], a named-event registry with `on`/`off`/`once`/`trigger`
//! - A broadcast channel (`"all"` by default) that observes every event
//! - Cross-object listening through [`Emitter::listen_to`], tracked so that
//!   [`Emitter::stop_listening`] can undo it from the listener side
//! - The [`Events`] trait, which adds the same surface to any host type
//!
//! # Architecture
//!
//! Dispatch is synchronous and single-threaded. A trigger copies the handler
//! lists, releases every internal borrow and then invokes the handlers, so
//! handlers may freely register, remove, trigger or listen while an event is
//! being dispatched.
//!
//! Handlers are [`Callback`]s: shared closures taking a receiver
//! [`Context`] and a `serde_json::Value` argument list. Callbacks and
//! contexts are compared by identity.
//!
//! Objects other than emitters can take part in listening by implementing
//! [`EventTarget`]. Their subscriptions are tracked on the listener side.
//!
//! # Example
//!
//! ```rust
//! use devents::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), EventError> {
//! let emitter = Emitter::new();
//! let greet = Callback::new(|_ctx, args| println!("hello {}", args[0]));
//!
//! emitter.once("greet", &greet, None)?;
//! emitter.trigger("greet", &[json!("world")]);
//! emitter.trigger("greet", &[json!("again")]);
//!
//! assert!(!emitter.has_handlers("greet"));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod callback;
mod emitter;
mod error;
mod listening;
mod mixin;
mod options;
mod registry;
mod spec;
mod util;

pub use callback::{Callback, Context, OnceState};
pub use emitter::Emitter;
pub use error::{EventError, EventResult};
pub use listening::{
    AsEventTarget, DEFAULT_LISTEN_ID_PREFIX, EventTarget, ListenId, ListenIdCell, Listening,
};
pub use mixin::Events;
pub use options::{DEFAULT_ALL_CHANNEL, DuplicatePolicy, EmitterOptions};
pub use spec::{EventFilter, EventMap, EventSpec};
pub use util::{is_blank, unique_id};

/// Argument payload type handed to every handler.
pub use serde_json::Value;
