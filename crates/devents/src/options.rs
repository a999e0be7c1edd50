//! Per-emitter behaviour options.

use serde::{Deserialize, Serialize};

use crate::listening::DEFAULT_LISTEN_ID_PREFIX;

/// Name of the broadcast channel unless configured otherwise.
pub const DEFAULT_ALL_CHANNEL: &str = "all";

/// What `on` does with an exact `(event, callback, context)` repeat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Register it again; it fires once per registration.
    #[default]
    Allow,
    /// Fail with [`EventError::DuplicateHandler`](crate::EventError::DuplicateHandler).
    Reject,
}

/// Emitter options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterOptions {
    /// Duplicate registration policy.
    pub duplicates: DuplicatePolicy,
    /// Prefix for listen ids this emitter assigns.
    pub listen_id_prefix: String,
    /// Channel whose handlers observe every triggered event.
    pub all_channel: String,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            listen_id_prefix: DEFAULT_LISTEN_ID_PREFIX.to_string(),
            all_channel: DEFAULT_ALL_CHANNEL.to_string(),
        }
    }
}

impl EmitterOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duplicate registration policy.
    #[must_use]
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Set the listen id prefix.
    #[must_use]
    pub fn with_listen_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.listen_id_prefix = prefix.into();
        self
    }

    /// Set the broadcast channel name.
    #[must_use]
    pub fn with_all_channel(mut self, channel: impl Into<String>) -> Self {
        self.all_channel = channel.into();
        self
    }
}

#[cfg(feature = "config")]
impl From<&devents_config::EmitterSection> for EmitterOptions {
    fn from(section: &devents_config::EmitterSection) -> Self {
        let duplicates = match section.duplicates {
            devents_config::DuplicatesMode::Allow => DuplicatePolicy::Allow,
            devents_config::DuplicatesMode::Reject => DuplicatePolicy::Reject,
        };
        Self {
            duplicates,
            listen_id_prefix: section.listen_id_prefix.clone(),
            all_channel: section.all_channel.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EmitterOptions::default();
        assert_eq!(options.duplicates, DuplicatePolicy::Allow);
        assert_eq!(options.listen_id_prefix, "l");
        assert_eq!(options.all_channel, "all");
    }

    #[test]
    fn test_builder() {
        let options = EmitterOptions::new()
            .with_duplicates(DuplicatePolicy::Reject)
            .with_listen_id_prefix("view")
            .with_all_channel("*");

        assert_eq!(options.duplicates, DuplicatePolicy::Reject);
        assert_eq!(options.listen_id_prefix, "view");
        assert_eq!(options.all_channel, "*");
    }

    #[test]
    fn test_serde_lowercase_policy() {
        let json = serde_json::to_string(&EmitterOptions::new().with_duplicates(DuplicatePolicy::Reject))
            .unwrap();
        assert!(json.contains("\"duplicates\":\"reject\""));

        let parsed: EmitterOptions = serde_json::from_str(r#"{"duplicates":"allow"}"#).unwrap();
        assert_eq!(parsed.duplicates, DuplicatePolicy::Allow);
        assert_eq!(parsed.all_channel, "all");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_config_section() {
        let section = devents_config::EmitterSection {
            duplicates: devents_config::DuplicatesMode::Reject,
            listen_id_prefix: "n".to_string(),
            all_channel: "everything".to_string(),
        };

        let options = EmitterOptions::from(&section);
        assert_eq!(options.duplicates, DuplicatePolicy::Reject);
        assert_eq!(options.listen_id_prefix, "n");
        assert_eq!(options.all_channel, "everything");
    }
}
