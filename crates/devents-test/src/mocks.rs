//! Recording callbacks and a foreign event target.

use std::cell::RefCell;
use std::rc::Rc;

use devents::{
    AsEventTarget, Callback, Context, EventError, EventResult, EventSpec, EventTarget,
    ListenIdCell, Value,
};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Label of the callback that ran.
    pub label: String,
    /// Receiver the callback ran with.
    pub receiver: Context,
    /// Arguments it received.
    pub args: Vec<Value>,
}

/// Shared log of callback invocations.
///
/// Every callback handed out by [`Recorder::callback`] appends a [`Call`]
/// when invoked. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Recorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new callback that records under `label`.
    ///
    /// Each call returns a distinct callback, even for the same label.
    #[must_use]
    pub fn callback(&self, label: &str) -> Callback {
        let calls = Rc::clone(&self.calls);
        let label = label.to_string();
        Callback::new(move |receiver, args| {
            calls.borrow_mut().push(Call {
                label: label.clone(),
                receiver: receiver.clone(),
                args: args.to_vec(),
            });
        })
    }

    /// All recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Labels of all recorded calls in order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.label.clone())
            .collect()
    }

    /// Number of calls recorded under `label`.
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.label == label)
            .count()
    }

    /// Arguments of every call recorded under `label`.
    #[must_use]
    pub fn args_of(&self, label: &str) -> Vec<Vec<Value>> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.label == label)
            .map(|call| call.args.clone())
            .collect()
    }

    /// Total number of calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Forget every recorded call.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

struct ForeignBinding {
    name: String,
    callback: Callback,
    context: Option<Context>,
}

#[derive(Default)]
struct ForeignState {
    listen_id: ListenIdCell,
    bindings: RefCell<Vec<ForeignBinding>>,
    failure: Option<String>,
}

impl EventTarget for ForeignState {
    fn listen_id(&self) -> &ListenIdCell {
        &self.listen_id
    }

    fn subscribe(
        &self,
        spec: &EventSpec,
        callback: Option<&Callback>,
        context: Option<&Context>,
    ) -> EventResult<()> {
        if let Some(message) = &self.failure {
            return Err(EventError::Target {
                message: message.clone(),
            });
        }

        let resolved = spec.bindings(callback)?;
        let mut bindings = self.bindings.borrow_mut();
        for (name, callback) in resolved {
            bindings.push(ForeignBinding {
                name,
                callback,
                context: context.cloned(),
            });
        }
        Ok(())
    }

    fn unsubscribe(&self, name: Option<&str>, callback: Option<&Callback>, context: Option<&Context>) {
        let names: Option<Vec<&str>> = name.map(|name| name.split_whitespace().collect());
        self.bindings.borrow_mut().retain(|binding| {
            let name_matches = names
                .as_ref()
                .is_none_or(|names| names.contains(&binding.name.as_str()));
            let callback_matches = callback.is_none_or(|filter| {
                binding.callback.ptr_eq(filter)
                    || binding
                        .callback
                        .original()
                        .is_some_and(|original| original.ptr_eq(filter))
            });
            let context_matches = context.is_none_or(|filter| binding.context.as_ref() == Some(filter));
            !(name_matches && callback_matches && context_matches)
        });
    }
}

/// A minimal event target that is not a devents emitter.
///
/// It only implements the plain registration methods, so listenings that
/// point at it stay in interop mode.
#[derive(Clone)]
pub struct ForeignTarget {
    state: Rc<ForeignState>,
}

impl ForeignTarget {
    /// Create a target that accepts registrations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(ForeignState::default()),
        }
    }

    /// Create a target whose every registration fails with
    /// [`EventError::Target`] carrying `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            state: Rc::new(ForeignState {
                failure: Some(message.to_string()),
                ..ForeignState::default()
            }),
        }
    }

    /// Invoke every binding for `name` in registration order.
    pub fn emit(&self, name: &str, args: &[Value]) {
        let matching: Vec<(Callback, Context)> = self
            .state
            .bindings
            .borrow()
            .iter()
            .filter(|binding| binding.name == name)
            .map(|binding| {
                let receiver = binding
                    .context
                    .clone()
                    .unwrap_or_else(|| Context::new(()));
                (binding.callback.clone(), receiver)
            })
            .collect();

        for (callback, receiver) in matching {
            callback.call(&receiver, args);
        }
    }

    /// Number of bindings for `name`.
    #[must_use]
    pub fn handler_count(&self, name: &str) -> usize {
        self.state
            .bindings
            .borrow()
            .iter()
            .filter(|binding| binding.name == name)
            .count()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.bindings.borrow().is_empty()
    }
}

impl Default for ForeignTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl AsEventTarget for ForeignTarget {
    fn event_target(&self) -> Rc<dyn EventTarget> {
        Rc::clone(&self.state) as Rc<dyn EventTarget>
    }
}
