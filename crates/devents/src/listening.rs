//! Cross-object listening.
//!
//! A [`Listening`] records that one emitter (the listener) has subscribed to
//! another object (the target) through
//! [`Emitter::listen_to`](crate::Emitter::listen_to). The listener keeps it
//! in its `listening_to` map and a standard target keeps it in its
//! `listeners` map. The listening holds only weak references to both sides
//! and removes itself from both maps once its last subscription is gone.
//!
//! Targets that are not [`Emitter`](crate::Emitter)s implement
//! [`EventTarget`] directly. Their registrations never report back to the
//! listening, which therefore stays in *interop* mode and tracks the
//! subscriptions in a private shadow registry instead of a counter.

use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::callback::{Callback, Context};
use crate::emitter::EmitterState;
use crate::error::EventResult;
use crate::registry::{HandlerRecord, Registry};
use crate::spec::{EventSpec, events_api};
use crate::util::{split_names, unique_id};

/// Prefix for generated listen ids unless an emitter is configured otherwise.
pub const DEFAULT_LISTEN_ID_PREFIX: &str = "l";

/// Identifier assigned to an object the first time it takes part in a
/// listening relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenId(String);

impl ListenId {
    /// Generate a fresh id with the given prefix.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        Self(unique_id(prefix))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lazily assigned [`ListenId`] slot.
#[derive(Debug, Default)]
pub struct ListenIdCell(OnceCell<ListenId>);

impl ListenIdCell {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The id, if one has been assigned.
    #[must_use]
    pub fn get(&self) -> Option<&ListenId> {
        self.0.get()
    }

    /// The id, assigning one with `prefix` on first use.
    pub fn get_or_assign(&self, prefix: &str) -> ListenId {
        self.0.get_or_init(|| ListenId::generate(prefix)).clone()
    }
}

/// Registration contract of an object that can be listened to.
///
/// [`Emitter`](crate::Emitter) implements this through its shared state.
/// Other types implement the two required registration methods and inherit
/// defaults that keep listenings in interop mode.
pub trait EventTarget {
    /// Slot holding this target's listen id.
    fn listen_id(&self) -> &ListenIdCell;

    /// Register handlers, with `context` as the receiver.
    ///
    /// # Errors
    ///
    /// Any error is returned unchanged to the caller of `listen_to`.
    fn subscribe(
        &self,
        spec: &EventSpec,
        callback: Option<&Callback>,
        context: Option<&Context>,
    ) -> EventResult<()>;

    /// Remove handlers matching every supplied filter.
    fn unsubscribe(&self, name: Option<&str>, callback: Option<&Callback>, context: Option<&Context>);

    /// Register handlers on behalf of `listening`.
    ///
    /// The default forwards to [`EventTarget::subscribe`], leaving the
    /// listening in interop mode.
    ///
    /// # Errors
    ///
    /// Any error is returned unchanged to the caller of `listen_to`.
    fn subscribe_listening(
        &self,
        spec: &EventSpec,
        callback: Option<&Callback>,
        context: Option<&Context>,
        listening: &Rc<Listening>,
    ) -> EventResult<()> {
        let _ = listening;
        self.subscribe(spec, callback, context)
    }

    /// Forget a listening registered through [`EventTarget::subscribe_listening`].
    fn release_listening(&self, id: &ListenId) {
        let _ = id;
    }
}

/// Conversion into a shared [`EventTarget`] that a listening can point back to.
pub trait AsEventTarget {
    /// Shared handle to the target.
    fn event_target(&self) -> Rc<dyn EventTarget>;
}

/// A listener → target subscription relationship.
pub struct Listening {
    /// The listener's listen id.
    id: ListenId,
    /// The target's listen id, the key in the listener's map.
    target_id: ListenId,
    listener: Weak<EmitterState>,
    target: Weak<dyn EventTarget>,
    /// Shadow registry, used in interop mode only.
    events: RefCell<Registry>,
    interop: Cell<bool>,
    count: Cell<usize>,
}

impl Listening {
    pub(crate) fn new(
        id: ListenId,
        target_id: ListenId,
        listener: Weak<EmitterState>,
        target: Weak<dyn EventTarget>,
    ) -> Self {
        Self {
            id,
            target_id,
            listener,
            target,
            events: RefCell::new(Registry::default()),
            interop: Cell::new(true),
            count: Cell::new(0),
        }
    }

    /// The listener's listen id.
    #[must_use]
    pub fn id(&self) -> &ListenId {
        &self.id
    }

    /// The target's listen id.
    #[must_use]
    pub fn target_id(&self) -> &ListenId {
        &self.target_id
    }

    /// Returns `true` until a standard emitter has accepted a registration.
    #[must_use]
    pub fn is_interop(&self) -> bool {
        self.interop.get()
    }

    /// Live subscriptions counted through the standard path.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.get()
    }

    pub(crate) fn target(&self) -> Option<Rc<dyn EventTarget>> {
        self.target.upgrade()
    }

    /// Returns `true` while the target is still alive.
    pub(crate) fn has_target(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// The target registered through the standard path.
    pub(crate) fn confirm_standard(&self) {
        self.interop.set(false);
    }

    pub(crate) fn increment(&self) {
        self.count.set(self.count.get().saturating_add(1));
    }

    /// Returns `true` if nothing has been registered through this listening.
    pub(crate) fn is_unused(&self) -> bool {
        self.count.get() == 0 && self.events.borrow().is_empty()
    }

    /// Shadow-register bindings the target did not report back.
    pub(crate) fn track(&self, spec: &EventSpec, callback: Option<&Callback>) {
        let mut events = self.events.borrow_mut();
        events_api(
            |registry, name, callback| {
                if let Some(callback) = callback {
                    registry.add(name, HandlerRecord::new(callback.clone(), None, None));
                }
                registry
            },
            &mut *events,
            spec,
            callback,
        );
    }

    /// Account for removed subscriptions, cleaning up once none remain.
    pub(crate) fn off(&self, name: Option<&str>, callback: Option<&Callback>) {
        let cleanup = if self.interop.get() {
            let mut events = self.events.borrow_mut();
            match name {
                Some(name) => {
                    for name in split_names(name) {
                        events.remove(name, callback, None);
                    }
                },
                None => {
                    events.remove_matching(callback, None);
                },
            }
            events.is_empty()
        } else {
            let count = self.count.get().saturating_sub(1);
            self.count.set(count);
            count == 0
        };

        if cleanup {
            self.cleanup();
        }
    }

    /// Remove this listening from the listener and, when registered through
    /// the standard path, from the target.
    pub(crate) fn cleanup(&self) {
        if let Some(listener) = self.listener.upgrade() {
            listener.forget_target(&self.target_id);
        }
        if !self.interop.get()
            && let Some(target) = self.target.upgrade()
        {
            target.release_listening(&self.id);
        }
        debug!(
            listener = %self.id,
            target = %self.target_id,
            interop = self.interop.get(),
            "Listening cleaned up"
        );
    }
}

impl fmt::Debug for Listening {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listening")
            .field("id", &self.id)
            .field("target_id", &self.target_id)
            .field("interop", &self.interop.get())
            .field("count", &self.count.get())
            .finish_non_exhaustive()
    }
}
