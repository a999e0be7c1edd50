//! Configuration validation rules.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Validate a fully resolved configuration.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] naming the first invalid field.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_emitter(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_emitter(config: &Config) -> ConfigResult<()> {
    validate_token("emitter.listen_id_prefix", &config.emitter.listen_id_prefix)?;
    validate_token("emitter.all_channel", &config.emitter.all_channel)?;
    Ok(())
}

/// Identifiers that end up as event names or id prefixes must be a single
/// whitespace-free token.
fn validate_token(field: &str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::Invalid {
            field: field.to_owned(),
            message: "must not be empty".to_owned(),
        });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid {
            field: field.to_owned(),
            message: format!("'{value}' must not contain whitespace"),
        });
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::Invalid {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::Invalid {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        });
    }

    Ok(())
}
