//! Per-emitter handler storage.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::callback::{Callback, Context};
use crate::listening::Listening;

/// One registered handler.
///
/// Records are never modified after registration apart from being retired
/// when removed, which lets an in-flight dispatch skip them.
pub(crate) struct HandlerRecord {
    pub(crate) callback: Callback,
    /// Context supplied at registration, used for removal matching.
    pub(crate) context: Option<Context>,
    /// Listening this handler was registered through, if any.
    pub(crate) listening: Option<Rc<Listening>>,
    retired: Cell<bool>,
}

impl HandlerRecord {
    pub(crate) fn new(
        callback: Callback,
        context: Option<Context>,
        listening: Option<Rc<Listening>>,
    ) -> Self {
        Self {
            callback,
            context,
            listening,
            retired: Cell::new(false),
        }
    }

    /// Receiver to invoke with: the registration context or the owner.
    pub(crate) fn receiver(&self, owner: &Context) -> Context {
        self.context.clone().unwrap_or_else(|| owner.clone())
    }

    /// Still registered.
    pub(crate) fn is_live(&self) -> bool {
        !self.retired.get()
    }

    /// Removal policy: every supplied filter must match.
    fn matches(&self, callback: Option<&Callback>, context: Option<&Context>) -> bool {
        callback.is_none_or(|filter| self.callback.matches(filter))
            && context.is_none_or(|filter| self.context.as_ref().is_some_and(|ctx| ctx.ptr_eq(filter)))
    }

    /// Exact `(callback, context)` identity, used for duplicate detection.
    pub(crate) fn is_same_binding(&self, callback: &Callback, context: Option<&Context>) -> bool {
        self.callback.ptr_eq(callback)
            && match (&self.context, context) {
                (None, None) => true,
                (Some(a), Some(b)) => a.ptr_eq(b),
                _ => false,
            }
    }

    fn retire(&self) {
        self.retired.set(true);
    }
}

/// Mapping from event name to handlers in registration order.
///
/// A name is present only while it has at least one handler.
#[derive(Default)]
pub(crate) struct Registry {
    events: HashMap<String, Vec<Rc<HandlerRecord>>>,
}

impl Registry {
    pub(crate) fn add(&mut self, name: &str, record: HandlerRecord) {
        self.events
            .entry(name.to_owned())
            .or_default()
            .push(Rc::new(record));
    }

    pub(crate) fn contains(&self, name: &str, callback: &Callback, context: Option<&Context>) -> bool {
        self.events.get(name).is_some_and(|handlers| {
            handlers
                .iter()
                .any(|handler| handler.is_same_binding(callback, context))
        })
    }

    /// Remove the handlers under `name` that match the filters.
    pub(crate) fn remove(
        &mut self,
        name: &str,
        callback: Option<&Callback>,
        context: Option<&Context>,
    ) -> Vec<Rc<HandlerRecord>> {
        let Some(handlers) = self.events.remove(name) else {
            return Vec::new();
        };

        let (removed, remaining): (Vec<_>, Vec<_>) = handlers
            .into_iter()
            .partition(|handler| handler.matches(callback, context));

        if !remaining.is_empty() {
            self.events.insert(name.to_owned(), remaining);
        }
        for handler in &removed {
            handler.retire();
        }
        removed
    }

    /// Apply [`Registry::remove`] across every registered name.
    pub(crate) fn remove_matching(
        &mut self,
        callback: Option<&Callback>,
        context: Option<&Context>,
    ) -> Vec<(String, Rc<HandlerRecord>)> {
        let mut removed = Vec::new();
        for name in self.names() {
            removed.extend(
                self.remove(&name, callback, context)
                    .into_iter()
                    .map(|handler| (name.clone(), handler)),
            );
        }
        removed
    }

    /// Drop every handler.
    pub(crate) fn clear(&mut self) -> usize {
        let mut count: usize = 0;
        for (_, handlers) in self.events.drain() {
            for handler in handlers {
                handler.retire();
                count = count.saturating_add(1);
            }
        }
        count
    }

    /// Copy of the handler list for `name`, taken before dispatch.
    pub(crate) fn snapshot(&self, name: &str) -> Option<Vec<Rc<HandlerRecord>>> {
        self.events.get(name).cloned()
    }

    pub(crate) fn handler_count(&self, name: &str) -> usize {
        self.events.get(name).map_or(0, Vec::len)
    }

    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events.keys().cloned().collect();
        names.sort();
        names
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Callback {
        Callback::new(|_, _| {})
    }

    fn record(callback: &Callback, context: Option<&Context>) -> HandlerRecord {
        HandlerRecord::new(callback.clone(), context.cloned(), None)
    }

    #[test]
    fn test_add_preserves_order() {
        let (a, b) = (noop(), noop());
        let mut registry = Registry::default();
        registry.add("x", record(&a, None));
        registry.add("x", record(&b, None));

        let handlers = registry.snapshot("x").unwrap();
        assert!(handlers[0].callback.ptr_eq(&a));
        assert!(handlers[1].callback.ptr_eq(&b));
        assert_eq!(registry.handler_count("x"), 2);
    }

    #[test]
    fn test_remove_by_name_drops_empty_entry() {
        let mut registry = Registry::default();
        registry.add("x", record(&noop(), None));
        registry.add("y", record(&noop(), None));

        let removed = registry.remove("x", None, None);
        assert_eq!(removed.len(), 1);
        assert!(!removed[0].is_live());
        assert!(registry.snapshot("x").is_none());
        assert_eq!(registry.names(), vec!["y"]);
    }

    #[test]
    fn test_remove_requires_every_filter() {
        let (a, b) = (noop(), noop());
        let ctx = Context::new(1_u8);
        let other_ctx = Context::new(2_u8);
        let mut registry = Registry::default();
        registry.add("x", record(&a, Some(&ctx)));
        registry.add("x", record(&a, Some(&other_ctx)));
        registry.add("x", record(&a, None));
        registry.add("x", record(&b, Some(&ctx)));

        let removed = registry.remove("x", Some(&a), Some(&ctx));
        assert_eq!(removed.len(), 1);
        assert_eq!(registry.handler_count("x"), 3);

        let removed = registry.remove("x", None, Some(&ctx));
        assert_eq!(removed.len(), 1);
        assert!(removed[0].callback.ptr_eq(&b));

        let removed = registry.remove("x", Some(&a), None);
        assert_eq!(removed.len(), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_matching_across_names() {
        let (a, b) = (noop(), noop());
        let mut registry = Registry::default();
        registry.add("x", record(&a, None));
        registry.add("y", record(&a, None));
        registry.add("y", record(&b, None));

        let removed = registry.remove_matching(Some(&a), None);
        let names: Vec<_> = removed.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(registry.names(), vec!["y"]);
    }

    #[test]
    fn test_contains_exact_binding() {
        let a = noop();
        let ctx = Context::new(());
        let mut registry = Registry::default();
        registry.add("x", record(&a, Some(&ctx)));

        assert!(registry.contains("x", &a, Some(&ctx)));
        assert!(!registry.contains("x", &a, None));
        assert!(!registry.contains("y", &a, Some(&ctx)));
    }

    #[test]
    fn test_clear_retires_everything() {
        let mut registry = Registry::default();
        registry.add("x", record(&noop(), None));
        registry.add("y", record(&noop(), None));
        let held = registry.snapshot("x").unwrap();

        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
        assert!(!held[0].is_live());
    }
}
