//! Prelude module - commonly used types for convenient import.
//!
//! Use `use devents::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use devents::prelude::*;
//!
//! # fn main() -> Result<(), EventError> {
//! let model = Emitter::new();
//! let view = Emitter::new();
//! let render = Callback::new(|_, _| {});
//!
//! view.listen_to(Some(&model), "change", &render)?;
//! assert!(view.is_listening_to(&model));
//! # Ok(())
//! # }
//! ```

// Emitter
pub use crate::{DuplicatePolicy, Emitter, EmitterOptions, Events};

// Handlers
pub use crate::{Callback, Context, EventFilter, EventMap, EventSpec, Value};

// Listening
pub use crate::{AsEventTarget, EventTarget, ListenId, Listening};

// Errors
pub use crate::{EventError, EventResult};
