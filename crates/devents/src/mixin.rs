//! Event methods for host types.
//!
//! A type that owns an [`Emitter`] implements [`Events`] and gains the full
//! emitter surface as methods that return the host for chaining.
//!
//! ```rust
//! use devents::{Callback, Emitter, Events};
//!
//! struct Model {
//!     events: Emitter,
//! }
//!
//! impl Events for Model {
//!     fn events(&self) -> &Emitter {
//!         &self.events
//!     }
//! }
//!
//! # fn main() -> Result<(), devents::EventError> {
//! let model = Model { events: Emitter::new() };
//! let saved = Callback::new(|_, _| {});
//! model.on("save", &saved, None)?.trigger("save", &[]);
//! # Ok(())
//! # }
//! ```

use serde_json::Value;

use crate::callback::{Callback, Context};
use crate::emitter::Emitter;
use crate::error::EventResult;
use crate::listening::AsEventTarget;
use crate::spec::{EventFilter, EventSpec};

/// Forwarding facade over an owned [`Emitter`].
///
/// Handlers registered without a context receive the emitter, not the host.
/// To listen to a host, pass its emitter: `listen_to(Some(host.events()), ..)`.
pub trait Events {
    /// The emitter backing this host.
    fn events(&self) -> &Emitter;

    /// See [`Emitter::on`].
    ///
    /// # Errors
    ///
    /// Same as [`Emitter::on`].
    fn on<'a>(
        &self,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> EventResult<&Self> {
        self.events().on(spec, callback, context)?;
        Ok(self)
    }

    /// See [`Emitter::off`].
    fn off<'a>(
        &self,
        name: impl Into<EventFilter>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> &Self {
        self.events().off(name, callback, context);
        self
    }

    /// See [`Emitter::once`].
    ///
    /// # Errors
    ///
    /// Same as [`Emitter::once`].
    fn once<'a>(
        &self,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> EventResult<&Self> {
        self.events().once(spec, callback, context)?;
        Ok(self)
    }

    /// See [`Emitter::trigger`].
    fn trigger(&self, name: &str, args: &[Value]) -> &Self {
        self.events().trigger(name, args);
        self
    }

    /// See [`Emitter::listen_to`].
    ///
    /// # Errors
    ///
    /// Same as [`Emitter::listen_to`].
    fn listen_to<'a>(
        &self,
        target: Option<&dyn AsEventTarget>,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
    ) -> EventResult<&Self> {
        self.events().listen_to(target, spec, callback)?;
        Ok(self)
    }

    /// See [`Emitter::listen_to_once`].
    ///
    /// # Errors
    ///
    /// Same as [`Emitter::listen_to_once`].
    fn listen_to_once<'a>(
        &self,
        target: Option<&dyn AsEventTarget>,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
    ) -> EventResult<&Self> {
        self.events().listen_to_once(target, spec, callback)?;
        Ok(self)
    }

    /// See [`Emitter::stop_listening`].
    fn stop_listening<'a>(
        &self,
        target: Option<&dyn AsEventTarget>,
        name: impl Into<EventFilter>,
        callback: impl Into<Option<&'a Callback>>,
    ) -> &Self {
        self.events().stop_listening(target, name, callback);
        self
    }

    /// Alias for [`Events::on`].
    ///
    /// # Errors
    ///
    /// Same as [`Emitter::on`].
    fn bind<'a>(
        &self,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> EventResult<&Self> {
        self.on(spec, callback, context)
    }

    /// Alias for [`Events::on`].
    ///
    /// # Errors
    ///
    /// Same as [`Emitter::on`].
    fn add_listener<'a>(
        &self,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> EventResult<&Self> {
        self.on(spec, callback, context)
    }

    /// Alias for [`Events::off`].
    fn unbind<'a>(
        &self,
        name: impl Into<EventFilter>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> &Self {
        self.off(name, callback, context)
    }

    /// Alias for [`Events::off`].
    fn remove_listener<'a>(
        &self,
        name: impl Into<EventFilter>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> &Self {
        self.off(name, callback, context)
    }

    /// Alias for [`Events::trigger`].
    fn emit(&self, name: &str, args: &[Value]) -> &Self {
        self.trigger(name, args)
    }
}

impl Events for Emitter {
    fn events(&self) -> &Emitter {
        self
    }
}
