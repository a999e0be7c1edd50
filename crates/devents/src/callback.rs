//! Callbacks and invocation receivers.
//!
//! A [`Callback`] is a shared closure compared by identity: cloning it keeps
//! the clone matchable by [`Emitter::off`](crate::Emitter::off). A
//! [`Context`] is the receiver a callback is invoked with, also compared by
//! identity.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::emitter::{Emitter, EmitterState};
use crate::listening::ListenId;

/// Closure signature every handler is stored as.
type HandlerFn = dyn Fn(&Context, &[Value]);

/// Opaque receiver handed to callbacks.
///
/// Two contexts are equal when they share the same allocation. An
/// [`Emitter`] converts into a context and back again with
/// [`Emitter::from_context`].
#[derive(Clone)]
pub struct Context(Rc<dyn Any>);

impl Context {
    /// Wrap a value in a new context.
    #[must_use]
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value) as Rc<dyn Any>)
    }

    /// Share an existing allocation as a context.
    #[must_use]
    pub fn from_rc<T: Any>(value: Rc<T>) -> Self {
        Self(value as Rc<dyn Any>)
    }

    /// Borrow the wrapped value if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Returns `true` if both contexts point at the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    pub(crate) fn downcast_rc<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.0).downcast::<T>().ok()
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Context {}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Context")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Lifecycle of a once-only callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnceState {
    /// Not yet invoked.
    Armed,
    /// Invoked; further calls do nothing.
    Fired,
}

/// How a once-only callback unregisters itself before running.
pub(crate) enum Removal {
    /// `off(name, wrapper)` on the emitter that holds the handler.
    Off(Weak<EmitterState>),
    /// `stop_listening(target, name, wrapper)` on the listening emitter.
    StopListening {
        listener: Weak<EmitterState>,
        target: ListenId,
    },
}

impl Removal {
    fn run(&self, name: &str, wrapper: &Callback) {
        match self {
            Self::Off(emitter) => {
                if let Some(emitter) = Emitter::upgrade(emitter) {
                    emitter.off(name, wrapper, None);
                }
            },
            Self::StopListening { listener, target } => {
                if let Some(listener) = Emitter::upgrade(listener) {
                    listener.stop_listening_id(target, Some(name), Some(wrapper));
                }
            },
        }
    }
}

/// Once-only wrapper around an original callback.
struct OnceCallback {
    original: Callback,
    name: String,
    state: Cell<OnceState>,
    removal: Removal,
}

enum CallbackKind {
    Plain(Box<HandlerFn>),
    Once(OnceCallback),
}

/// A shareable event handler.
///
/// # Example
///
/// ```rust
/// use devents::{Callback, Emitter};
/// use serde_json::json;
///
/// let emitter = Emitter::new();
/// let log = Callback::new(|_ctx, args| println!("changed: {args:?}"));
///
/// emitter.on("change", &log, None).unwrap();
/// emitter.trigger("change", &[json!(42)]);
/// emitter.off("change", &log, None);
/// ```
#[derive(Clone)]
pub struct Callback(Rc<CallbackKind>);

impl Callback {
    /// Create a callback from a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Context, &[Value]) + 'static,
    {
        Self(Rc::new(CallbackKind::Plain(Box::new(handler))))
    }

    /// Wrap `original` so it runs at most once for `name`.
    pub(crate) fn once(original: Callback, name: impl Into<String>, removal: Removal) -> Self {
        Self(Rc::new(CallbackKind::Once(OnceCallback {
            original,
            name: name.into(),
            state: Cell::new(OnceState::Armed),
            removal,
        })))
    }

    /// Invoke the callback with a receiver and arguments.
    ///
    /// A once-only callback first unregisters itself, then runs the original
    /// callback. Any later invocation is a no-op.
    pub fn call(&self, ctx: &Context, args: &[Value]) {
        match &*self.0 {
            CallbackKind::Plain(handler) => handler(ctx, args),
            CallbackKind::Once(once) => {
                if once.state.replace(OnceState::Fired) == OnceState::Fired {
                    return;
                }
                once.removal.run(&once.name, self);
                once.original.call(ctx, args);
            },
        }
    }

    /// Return a callback that always runs with `context` as its receiver.
    #[must_use]
    pub fn bound(&self, context: Context) -> Self {
        let inner = self.clone();
        Self::new(move |_, args| inner.call(&context, args))
    }

    /// Return a callback with `prefix` prepended to every argument list.
    #[must_use]
    pub fn partial(&self, prefix: Vec<Value>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx, args| {
            let mut full = prefix.clone();
            full.extend_from_slice(args);
            inner.call(ctx, &full);
        })
    }

    /// The callback a once-only wrapper was built from.
    #[must_use]
    pub fn original(&self) -> Option<&Callback> {
        match &*self.0 {
            CallbackKind::Plain(_) => None,
            CallbackKind::Once(once) => Some(&once.original),
        }
    }

    /// State of a once-only wrapper, `None` for plain callbacks.
    #[must_use]
    pub fn once_state(&self) -> Option<OnceState> {
        match &*self.0 {
            CallbackKind::Plain(_) => None,
            CallbackKind::Once(once) => Some(once.state.get()),
        }
    }

    /// Returns `true` for a once-only wrapper that has already fired.
    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.once_state() == Some(OnceState::Fired)
    }

    /// Returns `true` if both handles refer to the same callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Removal filter match: the callback itself or the original it wraps.
    pub(crate) fn matches(&self, filter: &Callback) -> bool {
        self.ptr_eq(filter) || self.original().is_some_and(|original| original.ptr_eq(filter))
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            CallbackKind::Plain(_) => f
                .debug_tuple("Callback")
                .field(&Rc::as_ptr(&self.0))
                .finish(),
            CallbackKind::Once(once) => f
                .debug_struct("OnceCallback")
                .field("event", &once.name)
                .field("state", &once.state.get())
                .finish_non_exhaustive(),
        }
    }
}
