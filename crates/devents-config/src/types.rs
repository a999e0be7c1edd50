//! Configuration struct definitions.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Emitter behaviour.
    pub emitter: EmitterSection,
    /// Logging and tracing.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// EmitterSection
// ---------------------------------------------------------------------------

/// How an emitter treats an exact repeat of a binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatesMode {
    /// Register it again.
    #[default]
    Allow,
    /// Refuse it with an error.
    Reject,
}

/// Emitter behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterSection {
    /// Duplicate registration policy.
    pub duplicates: DuplicatesMode,
    /// Prefix for generated listen ids (`l1`, `l2`, ...).
    pub listen_id_prefix: String,
    /// Name of the channel that observes every event.
    pub all_channel: String,
}

impl Default for EmitterSection {
    fn default() -> Self {
        Self {
            duplicates: DuplicatesMode::Allow,
            listen_id_prefix: "l".to_owned(),
            all_channel: "all".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"` or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["devents=trace"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [emitter]
            duplicates = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(config.emitter.duplicates, DuplicatesMode::Reject);
        assert_eq!(config.emitter.listen_id_prefix, "l");
        assert_eq!(config.logging, LoggingSection::default());
    }

    #[test]
    fn test_unknown_duplicates_mode_fails() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [emitter]
            duplicates = "sometimes"
            "#,
        );
        assert!(result.is_err());
    }
}
