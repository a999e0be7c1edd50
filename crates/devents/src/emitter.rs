//! The event emitter.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::callback::{Callback, Context, Removal};
use crate::error::{EventError, EventResult};
use crate::listening::{AsEventTarget, EventTarget, ListenId, ListenIdCell, Listening};
use crate::options::{DuplicatePolicy, EmitterOptions};
use crate::registry::{HandlerRecord, Registry};
use crate::spec::{EventFilter, EventMap, EventSpec, events_api};

/// State shared by every handle to one emitter.
pub(crate) struct EmitterState {
    options: EmitterOptions,
    listen_id: ListenIdCell,
    registry: RefCell<Registry>,
    /// Listenings that target this emitter, keyed by listener id.
    listeners: RefCell<HashMap<ListenId, Rc<Listening>>>,
    /// Listenings this emitter created, keyed by target id.
    listening_to: RefCell<HashMap<ListenId, Rc<Listening>>>,
}

impl EmitterState {
    fn new(options: EmitterOptions) -> Self {
        Self {
            options,
            listen_id: ListenIdCell::new(),
            registry: RefCell::new(Registry::default()),
            listeners: RefCell::new(HashMap::new()),
            listening_to: RefCell::new(HashMap::new()),
        }
    }

    /// Add handlers for every binding in `spec`.
    ///
    /// Everything is validated before the registry is touched, so a failed
    /// call leaves no partial registration behind.
    fn register(
        &self,
        spec: &EventSpec,
        callback: Option<&Callback>,
        context: Option<&Context>,
        listening: Option<&Rc<Listening>>,
    ) -> EventResult<()> {
        let bindings = spec.bindings(callback)?;

        if self.options.duplicates == DuplicatePolicy::Reject {
            self.check_duplicates(&bindings, context)?;
        }

        {
            let mut registry = self.registry.borrow_mut();
            for (name, callback) in bindings {
                if let Some(listening) = listening {
                    listening.increment();
                }
                registry.add(
                    &name,
                    HandlerRecord::new(callback, context.cloned(), listening.cloned()),
                );
                trace!(event = %name, "Handler registered");
            }
        }

        if let Some(listening) = listening {
            self.listeners
                .borrow_mut()
                .insert(listening.id().clone(), Rc::clone(listening));
            listening.confirm_standard();
        }

        Ok(())
    }

    fn check_duplicates(
        &self,
        bindings: &[(String, Callback)],
        context: Option<&Context>,
    ) -> EventResult<()> {
        let registry = self.registry.borrow();
        for (index, (name, callback)) in bindings.iter().enumerate() {
            let repeated_in_call = bindings
                .iter()
                .take(index)
                .any(|(earlier, other)| earlier == name && other.ptr_eq(callback));

            if repeated_in_call || registry.contains(name, callback, context) {
                warn!(event = %name, "Duplicate handler rejected");
                return Err(EventError::DuplicateHandler {
                    event: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Remove handlers matching every supplied filter.
    fn unregister(&self, name: Option<&str>, callback: Option<&Callback>, context: Option<&Context>) {
        if name.is_none() && callback.is_none() && context.is_none() {
            self.reset();
            return;
        }

        let removed = {
            let mut registry = self.registry.borrow_mut();
            match name {
                Some(name) => events_api(
                    |mut removed: Vec<(String, Rc<HandlerRecord>)>, name, _| {
                        removed.extend(
                            registry
                                .remove(name, callback, context)
                                .into_iter()
                                .map(|handler| (name.to_owned(), handler)),
                        );
                        removed
                    },
                    Vec::new(),
                    &EventSpec::from(name),
                    None,
                ),
                None => registry.remove_matching(callback, context),
            }
        };

        for (name, handler) in &removed {
            if let Some(listening) = &handler.listening {
                listening.off(Some(name.as_str()), callback);
            }
        }
    }

    /// Drop every handler and sever every listening that targets us.
    fn reset(&self) {
        let removed = self.registry.borrow_mut().clear();
        let listeners: Vec<Rc<Listening>> = self
            .listeners
            .borrow_mut()
            .drain()
            .map(|(_, listening)| listening)
            .collect();

        debug!(
            handlers = removed,
            listeners = listeners.len(),
            "All handlers removed"
        );

        for listening in listeners {
            listening.cleanup();
        }
    }

    /// Drop the listening for `target_id` from the listener side.
    pub(crate) fn forget_target(&self, target_id: &ListenId) {
        self.listening_to.borrow_mut().remove(target_id);
    }
}

impl EventTarget for EmitterState {
    fn listen_id(&self) -> &ListenIdCell {
        &self.listen_id
    }

    fn subscribe(
        &self,
        spec: &EventSpec,
        callback: Option<&Callback>,
        context: Option<&Context>,
    ) -> EventResult<()> {
        self.register(spec, callback, context, None)
    }

    fn unsubscribe(&self, name: Option<&str>, callback: Option<&Callback>, context: Option<&Context>) {
        self.unregister(name, callback, context);
    }

    fn subscribe_listening(
        &self,
        spec: &EventSpec,
        callback: Option<&Callback>,
        context: Option<&Context>,
        listening: &Rc<Listening>,
    ) -> EventResult<()> {
        self.register(spec, callback, context, Some(listening))
    }

    fn release_listening(&self, id: &ListenId) {
        self.listeners.borrow_mut().remove(id);
    }
}

/// An in-process, synchronous event channel.
///
/// `Emitter` is a cheap handle: clones share the same registry. Handlers
/// run on the calling thread, in registration order, and may call back into
/// the emitter. The type is deliberately `!Send`.
///
/// **WARNING:** a handler registered with an explicit [`Context`], or
/// through [`Emitter::listen_to`], keeps that context alive for as long as
/// the handler stays registered. An emitter that listens to itself forms a
/// reference cycle until it calls [`Emitter::stop_listening`] or
/// [`Emitter::off`].
///
/// # Example
///
/// ```rust
/// use devents::{Callback, Emitter};
/// use serde_json::json;
///
/// # fn main() -> Result<(), devents::EventError> {
/// let model = Emitter::new();
/// let view = Emitter::new();
///
/// let render = Callback::new(|_ctx, args| println!("render {args:?}"));
/// view.listen_to(Some(&model), "change", &render)?;
///
/// model.trigger("change", &[json!({"title": "hello"})]);
///
/// view.stop_listening(Some(&model), None, None);
/// assert!(!model.has_handlers("change"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Emitter {
    inner: Rc<EmitterState>,
}

impl Emitter {
    /// Create an emitter with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(EmitterOptions::default())
    }

    /// Create an emitter with the given options.
    #[must_use]
    pub fn with_options(options: EmitterOptions) -> Self {
        Self {
            inner: Rc::new(EmitterState::new(options)),
        }
    }

    pub(crate) fn upgrade(state: &Weak<EmitterState>) -> Option<Self> {
        state.upgrade().map(|inner| Self { inner })
    }

    /// Recover the emitter a context was created from.
    #[must_use]
    pub fn from_context(context: &Context) -> Option<Self> {
        context
            .downcast_rc::<EmitterState>()
            .map(|inner| Self { inner })
    }

    /// Options this emitter was created with.
    #[must_use]
    pub fn options(&self) -> &EmitterOptions {
        &self.inner.options
    }

    /// Returns `true` if both handles refer to the same emitter.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Bind `callback` to one or more events.
    ///
    /// `spec` is an event name, several names separated by whitespace, or an
    /// [`EventMap`] whose entries supply their own callbacks. Handlers run
    /// with `context` as their receiver, or this emitter if none is given.
    /// Binding the broadcast channel (`"all"` by default) receives every
    /// triggered event with its name prepended to the arguments.
    ///
    /// # Errors
    ///
    /// - [`EventError::InvalidArgument`] if no event is named or a named
    ///   binding has no callback.
    /// - [`EventError::DuplicateHandler`] if duplicates are rejected and the
    ///   exact binding already exists.
    pub fn on<'a>(
        &self,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> EventResult<&Self> {
        self.inner
            .register(&spec.into(), callback.into(), context.into(), None)?;
        Ok(self)
    }

    /// Remove handlers.
    ///
    /// With no arguments every handler is removed and every listening that
    /// targets this emitter is severed. Otherwise a handler is removed when
    /// it matches all supplied filters: the event name (whitespace-separated
    /// names allowed), the callback or the original of a once-only wrapper,
    /// and the registration context. An [`EventMap`] removes each entry's
    /// callback from its own event.
    pub fn off<'a>(
        &self,
        name: impl Into<EventFilter>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> &Self {
        let filter = name.into();
        let context = context.into();
        for (name, callback) in filter.removals(callback.into()) {
            self.inner.unregister(name, callback, context);
        }
        self
    }

    /// Bind `callback` so it runs at most once per named event.
    ///
    /// The handler removes itself before the callback runs. Passing the
    /// original callback to [`Emitter::off`] removes it before it fires.
    ///
    /// # Errors
    ///
    /// Same as [`Emitter::on`].
    pub fn once<'a>(
        &self,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> EventResult<&Self> {
        let weak = Rc::downgrade(&self.inner);
        let map = once_map(&spec.into(), callback.into(), || Removal::Off(weak.clone()))?;
        self.on(map, None, context)
    }

    /// Fire `name` with `args`.
    ///
    /// Handlers for `name` run first, in registration order, each receiving
    /// `args`. Handlers on the broadcast channel then run with the event
    /// name prepended. A handler removed while the event is being
    /// dispatched is skipped; handlers added meanwhile wait for the next
    /// trigger. When both lists exist the broadcast list is a snapshot taken
    /// before any handler runs.
    pub fn trigger(&self, name: &str, args: &[Value]) -> &Self {
        let all_channel = self.inner.options.all_channel.as_str();
        let (handlers, all_handlers) = {
            let registry = self.inner.registry.borrow();
            (registry.snapshot(name), registry.snapshot(all_channel))
        };

        if handlers.is_none() && all_handlers.is_none() {
            return self;
        }

        trace!(
            event = name,
            handlers = handlers.as_ref().map_or(0, Vec::len),
            all_handlers = all_handlers.as_ref().map_or(0, Vec::len),
            "Triggering event"
        );

        let owner = Context::from(self);
        let all_is_snapshot = handlers.is_some();

        if let Some(handlers) = handlers {
            dispatch(&handlers, &owner, args, true);
        }

        if let Some(all_handlers) = all_handlers {
            let mut all_args = Vec::with_capacity(args.len().saturating_add(1));
            all_args.push(Value::String(name.to_owned()));
            all_args.extend_from_slice(args);
            dispatch(&all_handlers, &owner, &all_args, !all_is_snapshot);
        }

        self
    }

    /// Have this emitter bind `callback` on `target`, tracking the
    /// subscription so [`Emitter::stop_listening`] can undo it.
    ///
    /// Handlers run with this emitter as their receiver. A `None` target is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Whatever the target's registration returns, unchanged.
    pub fn listen_to<'a>(
        &self,
        target: Option<&dyn AsEventTarget>,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
    ) -> EventResult<&Self> {
        let Some(target) = target else {
            return Ok(self);
        };
        let spec = spec.into();
        let callback = callback.into();
        let target = target.event_target();
        let prefix = self.inner.options.listen_id_prefix.as_str();
        let target_id = target.listen_id().get_or_assign(prefix);

        let existing = self.inner.listening_to.borrow().get(&target_id).cloned();
        let (listening, created) = if let Some(listening) = existing {
            (listening, false)
        } else {
            let id = self.inner.listen_id.get_or_assign(prefix);
            let listening = Rc::new(Listening::new(
                id,
                target_id.clone(),
                Rc::downgrade(&self.inner),
                Rc::downgrade(&target),
            ));
            self.inner
                .listening_to
                .borrow_mut()
                .insert(target_id.clone(), Rc::clone(&listening));
            debug!(listener = %listening.id(), target = %target_id, "Listening created");
            (listening, true)
        };

        let context = Context::from(self);
        if let Err(err) = target.subscribe_listening(&spec, callback, Some(&context), &listening) {
            if created && listening.is_unused() {
                self.inner.forget_target(&target_id);
            }
            debug!(target = %target_id, error = %err, "Target rejected listening");
            return Err(err);
        }

        if listening.is_interop() {
            listening.track(&spec, callback);
        }

        Ok(self)
    }

    /// Undo subscriptions made with [`Emitter::listen_to`].
    ///
    /// With a target, only that target is affected; without one, every
    /// target this emitter listens to. `name` and `callback` narrow the
    /// removal the same way they do for [`Emitter::off`], map form included.
    pub fn stop_listening<'a>(
        &self,
        target: Option<&dyn AsEventTarget>,
        name: impl Into<EventFilter>,
        callback: impl Into<Option<&'a Callback>>,
    ) -> &Self {
        let listenings: Vec<Rc<Listening>> = {
            let listening_to = self.inner.listening_to.borrow();
            if listening_to.is_empty() {
                return self;
            }
            match target {
                Some(target) => {
                    let target = target.event_target();
                    target
                        .listen_id()
                        .get()
                        .and_then(|id| listening_to.get(id))
                        .cloned()
                        .into_iter()
                        .collect()
                },
                None => listening_to.values().cloned().collect(),
            }
        };

        let filter = name.into();
        for (name, callback) in filter.removals(callback.into()) {
            self.stop(&listenings, name, callback);
        }
        self
    }

    /// [`Emitter::listen_to`], but each handler runs at most once.
    ///
    /// # Errors
    ///
    /// Same as [`Emitter::listen_to`], plus
    /// [`EventError::InvalidArgument`] for a spec without bindings.
    pub fn listen_to_once<'a>(
        &self,
        target: Option<&dyn AsEventTarget>,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
    ) -> EventResult<&Self> {
        let Some(target) = target else {
            return Ok(self);
        };
        let target_id = target
            .event_target()
            .listen_id()
            .get_or_assign(&self.inner.options.listen_id_prefix);
        let listener = Rc::downgrade(&self.inner);
        let map = once_map(&spec.into(), callback.into(), || Removal::StopListening {
            listener: listener.clone(),
            target: target_id.clone(),
        })?;
        self.listen_to(Some(target), map, None)
    }

    /// [`Emitter::stop_listening`] for the target with the given listen id.
    pub(crate) fn stop_listening_id(
        &self,
        target_id: &ListenId,
        name: Option<&str>,
        callback: Option<&Callback>,
    ) {
        let listening = self.inner.listening_to.borrow().get(target_id).cloned();
        if let Some(listening) = listening {
            self.stop(&[listening], name, callback);
        }
    }

    fn stop(&self, listenings: &[Rc<Listening>], name: Option<&str>, callback: Option<&Callback>) {
        let context = Context::from(self);
        for listening in listenings {
            let Some(target) = listening.target() else {
                listening.cleanup();
                continue;
            };
            target.unsubscribe(name, callback, Some(&context));
            if listening.is_interop() {
                listening.off(name, callback);
            }
        }
    }

    // ----- Back-compatible aliases -----

    /// Alias for [`Emitter::on`].
    ///
    /// # Errors
    ///
    /// Same as [`Emitter::on`].
    pub fn bind<'a>(
        &self,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> EventResult<&Self> {
        self.on(spec, callback, context)
    }

    /// Alias for [`Emitter::on`].
    ///
    /// # Errors
    ///
    /// Same as [`Emitter::on`].
    pub fn add_listener<'a>(
        &self,
        spec: impl Into<EventSpec>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> EventResult<&Self> {
        self.on(spec, callback, context)
    }

    /// Alias for [`Emitter::off`].
    pub fn unbind<'a>(
        &self,
        name: impl Into<EventFilter>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> &Self {
        self.off(name, callback, context)
    }

    /// Alias for [`Emitter::off`].
    pub fn remove_listener<'a>(
        &self,
        name: impl Into<EventFilter>,
        callback: impl Into<Option<&'a Callback>>,
        context: impl Into<Option<&'a Context>>,
    ) -> &Self {
        self.off(name, callback, context)
    }

    /// Alias for [`Emitter::trigger`].
    pub fn emit(&self, name: &str, args: &[Value]) -> &Self {
        self.trigger(name, args)
    }

    // ----- Introspection -----

    /// This emitter's listen id, once it has taken part in a listening.
    #[must_use]
    pub fn listen_id(&self) -> Option<ListenId> {
        self.inner.listen_id.get().cloned()
    }

    /// Returns `true` if any handler is bound to `name`.
    #[must_use]
    pub fn has_handlers(&self, name: &str) -> bool {
        self.handler_count(name) > 0
    }

    /// Number of handlers bound to `name`.
    #[must_use]
    pub fn handler_count(&self, name: &str) -> usize {
        self.inner.registry.borrow().handler_count(name)
    }

    /// Names with at least one handler, sorted.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.inner.registry.borrow().names()
    }

    /// The listening this emitter holds for `target`, if any.
    #[must_use]
    pub fn listening(&self, target: &dyn AsEventTarget) -> Option<Rc<Listening>> {
        let target = target.event_target();
        let id = target.listen_id().get()?;
        self.inner.listening_to.borrow().get(id).cloned()
    }

    /// Returns `true` if this emitter listens to `target`.
    #[must_use]
    pub fn is_listening_to(&self, target: &dyn AsEventTarget) -> bool {
        self.listening(target).is_some()
    }

    /// Number of live targets this emitter listens to.
    ///
    /// Listenings whose target has been dropped are not counted. Their
    /// records are released by the next [`Emitter::stop_listening`] that
    /// reaches them.
    #[must_use]
    pub fn listening_count(&self) -> usize {
        self.inner
            .listening_to
            .borrow()
            .values()
            .filter(|listening| listening.has_target())
            .count()
    }

    /// Number of listeners tracked on this emitter as a target.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl AsEventTarget for Emitter {
    fn event_target(&self) -> Rc<dyn EventTarget> {
        Rc::clone(&self.inner) as Rc<dyn EventTarget>
    }
}

impl From<&Emitter> for Context {
    fn from(emitter: &Emitter) -> Self {
        Context::from_rc(Rc::clone(&emitter.inner))
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listen_id", &self.inner.listen_id.get())
            .field("events", &self.event_names())
            .field("listening_to", &self.listening_count())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Run a handler list. With `live` set, handlers removed since the list
/// was copied are skipped.
fn dispatch(handlers: &[Rc<HandlerRecord>], owner: &Context, args: &[Value], live: bool) {
    for handler in handlers {
        if (live && !handler.is_live()) || handler.callback.is_spent() {
            continue;
        }
        let receiver = handler.receiver(owner);
        handler.callback.call(&receiver, args);
    }
}

/// Wrap every binding of `spec` in a once-only callback.
fn once_map(
    spec: &EventSpec,
    callback: Option<&Callback>,
    removal: impl Fn() -> Removal,
) -> EventResult<EventMap> {
    let map = spec
        .bindings(callback)?
        .into_iter()
        .map(|(name, callback)| {
            let wrapper = Callback::once(callback, name.clone(), removal());
            (name, wrapper)
        })
        .collect();
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn counter() -> (Callback, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0_usize));
        let sink = Rc::clone(&count);
        let callback = Callback::new(move |_, _| sink.set(sink.get().saturating_add(1)));
        (callback, count)
    }

    #[test]
    fn test_default_receiver_is_emitter() {
        let emitter = Emitter::new();
        let seen = Rc::new(Cell::new(false));
        let sink = Rc::clone(&seen);
        let expected = emitter.clone();
        let callback = Callback::new(move |ctx, _| {
            let receiver = Emitter::from_context(ctx).unwrap();
            sink.set(receiver.ptr_eq(&expected));
        });

        emitter.on("x", &callback, None).unwrap();
        emitter.trigger("x", &[]);
        assert!(seen.get());
    }

    #[test]
    fn test_registry_does_not_own_emitter() {
        let emitter = Emitter::new();
        let (callback, _) = counter();
        emitter.on("x", &callback, None).unwrap();

        let weak = Rc::downgrade(&emitter.inner);
        drop(emitter);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_reject_policy_leaves_no_partial_state() {
        let emitter =
            Emitter::with_options(EmitterOptions::new().with_duplicates(DuplicatePolicy::Reject));
        let (callback, _) = counter();

        emitter.on("b", &callback, None).unwrap();
        let err = emitter.on("a b", &callback, None).unwrap_err();

        assert_eq!(err, EventError::DuplicateHandler { event: "b".into() });
        assert!(!emitter.has_handlers("a"));
        assert_eq!(emitter.handler_count("b"), 1);
    }

    #[test]
    fn test_reject_policy_within_one_call() {
        let emitter =
            Emitter::with_options(EmitterOptions::new().with_duplicates(DuplicatePolicy::Reject));
        let (callback, _) = counter();

        assert!(emitter.on("a a", &callback, None).is_err());
        assert!(emitter.event_names().is_empty());
    }

    #[test]
    fn test_reject_policy_distinguishes_context() {
        let emitter =
            Emitter::with_options(EmitterOptions::new().with_duplicates(DuplicatePolicy::Reject));
        let (callback, count) = counter();
        let ctx = Context::new(());

        emitter.on("a", &callback, None).unwrap();
        emitter.on("a", &callback, &ctx).unwrap();
        emitter.trigger("a", &[]);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_custom_all_channel() {
        let emitter = Emitter::with_options(EmitterOptions::new().with_all_channel("*"));
        let args = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&args);
        let callback = Callback::new(move |_, a| sink.borrow_mut().push(a.to_vec()));

        emitter.on("*", &callback, None).unwrap();
        emitter.trigger("x", &[json!(1)]);
        assert_eq!(args.borrow()[0], vec![json!("x"), json!(1)]);
    }

    #[test]
    fn test_listen_id_prefix() {
        let listener =
            Emitter::with_options(EmitterOptions::new().with_listen_id_prefix("view"));
        let target = Emitter::new();
        let (callback, _) = counter();

        listener.listen_to(Some(&target), "x", &callback).unwrap();
        assert!(listener.listen_id().unwrap().as_str().starts_with("view"));
        assert!(target.listen_id().unwrap().as_str().starts_with("view"));
    }

    #[test]
    fn test_forget_target_empties_map() {
        let listener = Emitter::new();
        let target = Emitter::new();
        let (callback, _) = counter();

        listener.listen_to(Some(&target), "x", &callback).unwrap();
        let id = target.listen_id().unwrap();
        listener.inner.forget_target(&id);
        assert_eq!(listener.listening_count(), 0);
    }

    #[test]
    fn test_dropped_target_is_not_counted_until_released() {
        let listener = Emitter::new();
        let target = Emitter::new();
        let (callback, _) = counter();

        listener.listen_to(Some(&target), "x", &callback).unwrap();
        drop(target);

        assert_eq!(listener.listening_count(), 0);
        assert_eq!(listener.inner.listening_to.borrow().len(), 1);

        listener.stop_listening(None, None, None);
        assert!(listener.inner.listening_to.borrow().is_empty());
    }

}
