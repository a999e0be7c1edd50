//! Event-name normalization.
//!
//! Registration accepts a single event name, a whitespace-separated list of
//! names, or an [`EventMap`] of name→callback pairs. Every operation folds
//! its work over the `(name, callback)` pairs produced by [`events_api`].

use crate::callback::Callback;
use crate::error::{EventError, EventResult};
use crate::util::split_names;

/// Ordered event name → callback pairs.
///
/// Inserting a name that is already present replaces its callback in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMap {
    entries: Vec<(String, Callback)>,
}

impl EventMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, callback: &Callback) -> Self {
        self.insert(name, callback.clone());
        self
    }

    /// Add an entry or replace the callback of an existing one.
    pub fn insert(&mut self, name: impl Into<String>, callback: Callback) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = callback;
        } else {
            self.entries.push((name, callback));
        }
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Callback)> {
        self.entries.iter().map(|(name, callback)| (name.as_str(), callback))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Callback)> for EventMap {
    fn from_iter<I: IntoIterator<Item = (S, Callback)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, callback) in iter {
            map.insert(name, callback);
        }
        map
    }
}

/// The event names a registration applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSpec {
    /// One event name, or several separated by whitespace.
    Name(String),
    /// Name → callback pairs. Keys may themselves hold several names.
    Map(EventMap),
}

impl EventSpec {
    /// Resolve the spec into concrete `(name, callback)` bindings.
    ///
    /// `callback` applies to [`EventSpec::Name`]; map entries carry their
    /// own callbacks and ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidArgument`] if the spec names no events
    /// or a named binding has no callback.
    pub fn bindings(&self, callback: Option<&Callback>) -> EventResult<Vec<(String, Callback)>> {
        let pairs = events_api(
            |mut acc: Vec<(String, Option<Callback>)>, name, callback| {
                acc.push((name.to_owned(), callback.cloned()));
                acc
            },
            Vec::new(),
            self,
            callback,
        );

        if pairs.is_empty() {
            return Err(EventError::invalid("no event names given"));
        }

        let mut bindings = Vec::with_capacity(pairs.len());
        for (name, callback) in pairs {
            let Some(callback) = callback else {
                return Err(EventError::invalid(format!(
                    "missing callback for event '{name}'"
                )));
            };
            bindings.push((name, callback));
        }
        Ok(bindings)
    }
}

impl From<&str> for EventSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for EventSpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for EventSpec {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<EventMap> for EventSpec {
    fn from(map: EventMap) -> Self {
        Self::Map(map)
    }
}

/// The events a removal applies to.
///
/// Wraps an optional [`EventSpec`]: no spec matches every event, a name
/// (or whitespace-separated names) narrows by name, and an [`EventMap`]
/// removes each entry's callback from its own event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter(Option<EventSpec>);

impl EventFilter {
    /// A filter matching every event.
    #[must_use]
    pub fn any() -> Self {
        Self(None)
    }

    /// The wrapped spec, if any.
    #[must_use]
    pub fn spec(&self) -> Option<&EventSpec> {
        self.0.as_ref()
    }

    /// Expand into `(name, callback)` removal filters.
    ///
    /// A map yields one filter per entry, each carrying the entry's
    /// callback in place of `callback`. Names are left unsplit.
    pub(crate) fn removals<'a>(
        &'a self,
        callback: Option<&'a Callback>,
    ) -> Vec<(Option<&'a str>, Option<&'a Callback>)> {
        match &self.0 {
            None => vec![(None, callback)],
            Some(EventSpec::Name(name)) => vec![(Some(name.as_str()), callback)],
            Some(EventSpec::Map(map)) => map
                .iter()
                .map(|(name, callback)| (Some(name), Some(callback)))
                .collect(),
        }
    }
}

impl<'a> From<Option<&'a str>> for EventFilter {
    fn from(name: Option<&'a str>) -> Self {
        Self(name.map(EventSpec::from))
    }
}

impl From<&str> for EventFilter {
    fn from(name: &str) -> Self {
        Self(Some(EventSpec::from(name)))
    }
}

impl From<String> for EventFilter {
    fn from(name: String) -> Self {
        Self(Some(EventSpec::Name(name)))
    }
}

impl From<&String> for EventFilter {
    fn from(name: &String) -> Self {
        Self(Some(EventSpec::from(name)))
    }
}

impl From<EventMap> for EventFilter {
    fn from(map: EventMap) -> Self {
        Self(Some(EventSpec::Map(map)))
    }
}

impl From<EventSpec> for EventFilter {
    fn from(spec: EventSpec) -> Self {
        Self(Some(spec))
    }
}

/// Fold `iteratee` over every `(name, callback)` pair described by `spec`.
///
/// Map entries are visited in insertion order, whitespace-separated names
/// left to right. Callers must use the returned accumulator.
pub(crate) fn events_api<A, F>(mut iteratee: F, acc: A, spec: &EventSpec, callback: Option<&Callback>) -> A
where
    F: FnMut(A, &str, Option<&Callback>) -> A,
{
    match spec {
        EventSpec::Map(map) => map.iter().fold(acc, |acc, (name, callback)| {
            fold_names(&mut iteratee, acc, name, Some(callback))
        }),
        EventSpec::Name(name) => fold_names(&mut iteratee, acc, name, callback),
    }
}

fn fold_names<A, F>(iteratee: &mut F, acc: A, name: &str, callback: Option<&Callback>) -> A
where
    F: FnMut(A, &str, Option<&Callback>) -> A,
{
    split_names(name).fold(acc, |acc, name| iteratee(acc, name, callback))
}
