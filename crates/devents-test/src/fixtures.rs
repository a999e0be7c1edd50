//! Test fixtures for common types.

use devents::{Callback, Context, DuplicatePolicy, Emitter, EmitterOptions, Value};
use serde_json::json;

/// Arguments covering scalar, string and object payloads.
#[must_use]
pub fn test_args() -> Vec<Value> {
    vec![json!(1), json!("two"), json!({ "three": 3 })]
}

/// A fresh emitter with default options.
#[must_use]
pub fn test_emitter() -> Emitter {
    Emitter::new()
}

/// An emitter that rejects duplicate bindings.
#[must_use]
pub fn strict_emitter() -> Emitter {
    Emitter::with_options(EmitterOptions::new().with_duplicates(DuplicatePolicy::Reject))
}

/// A context wrapping `label`, recoverable with `downcast_ref::<String>()`.
#[must_use]
pub fn test_context(label: &str) -> Context {
    Context::new(label.to_string())
}

/// A callback that does nothing.
#[must_use]
pub fn noop() -> Callback {
    Callback::new(|_, _| {})
}

/// Install a test-friendly subscriber honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
