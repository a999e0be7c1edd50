//! Stateless helpers shared by the engine.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter behind [`unique_id`].
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate an identifier unique within the process.
///
/// Identifiers come from a monotonically increasing counter, so `"l"`
/// yields `l1`, `l2`, ... and a value is never handed out twice.
#[must_use]
pub fn unique_id(prefix: &str) -> String {
    let id = ID_COUNTER.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
    format!("{prefix}{id}")
}

/// Returns `true` if `name` is empty or whitespace only.
#[must_use]
pub fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

/// Split a possibly multi-name event string on runs of whitespace.
pub(crate) fn split_names(name: &str) -> impl Iterator<Item = &str> {
    name.split_whitespace()
}
