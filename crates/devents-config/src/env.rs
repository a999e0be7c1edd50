//! Environment variable fallback.
//!
//! Env vars are **fallback**, not override. They are only applied to fields
//! that no config file set.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources};

/// Prefix shared by every supported environment variable.
pub const ENV_PREFIX: &str = "DEVENTS_";

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// All supported `DEVENTS_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "DEVENTS_DUPLICATES",
        field_path: "emitter.duplicates",
    },
    EnvMapping {
        var_name: "DEVENTS_LISTEN_ID_PREFIX",
        field_path: "emitter.listen_id_prefix",
    },
    EnvMapping {
        var_name: "DEVENTS_LOG_LEVEL",
        field_path: "logging.level",
    },
    EnvMapping {
        var_name: "DEVENTS_LOG_FORMAT",
        field_path: "logging.format",
    },
];

/// Collect the process's `DEVENTS_*` environment variables.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] if one of them is not valid UTF-8.
pub fn collect_env_vars() -> ConfigResult<HashMap<String, String>> {
    let mut vars = HashMap::new();
    for (key, value) in std::env::vars_os() {
        let Some(key) = key.to_str() else {
            continue;
        };
        if !key.starts_with(ENV_PREFIX) {
            continue;
        }
        let value = value.into_string().map_err(|_| ConfigError::Env {
            var: key.to_owned(),
            message: "value is not valid UTF-8".to_owned(),
        })?;
        vars.insert(key.to_owned(), value);
    }
    Ok(vars)
}

/// Apply environment variable fallbacks to fields that were **not** set by
/// a config file.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if sources.contains_key(mapping.field_path) {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );

            set_field(merged, mapping.field_path, val);
            sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    count
}

/// Set a `section.key` string field in the TOML tree, creating the section
/// if needed.
fn set_field(root: &mut toml::Value, path: &str, val: &str) {
    let Some((section, key)) = path.split_once('.') else {
        return;
    };
    let Some(root) = root.as_table_mut() else {
        return;
    };

    let table = root
        .entry(section.to_owned())
        .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    if let Some(table) = table.as_table_mut() {
        table.insert(key.to_owned(), toml::Value::String(val.to_owned()));
    }
}
