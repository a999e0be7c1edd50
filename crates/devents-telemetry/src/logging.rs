//! Subscriber configuration and installation.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::{TelemetryError, TelemetryResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// How often a file target starts a new log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    /// One file per day.
    #[default]
    Daily,
    /// One file per hour.
    Hourly,
    /// One file per minute.
    Minutely,
    /// A single file.
    Never,
}

impl From<FileRotation> for Rotation {
    fn from(rotation: FileRotation) -> Self {
        match rotation {
            FileRotation::Daily => Self::DAILY,
            FileRotation::Hourly => Self::HOURLY,
            FileRotation::Minutely => Self::MINUTELY,
            FileRotation::Never => Self::NEVER,
        }
    }
}

/// Line format of emitted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, for reading at a terminal.
    Pretty,
    /// One short line per record.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
    /// `tracing-subscriber`'s default single-line format.
    Full,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            "json" => Self::Json,
            "full" => Self::Full,
            other => return Err(TelemetryError::UnknownFormat(other.to_owned())),
        })
    }
}

/// Where records are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Standard output.
    Stdout,
    /// Standard error.
    #[default]
    Stderr,
    /// Rotating files in this directory.
    File(PathBuf),
}

/// Naming and retention of log files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// File name prefix; files are named `<prefix>.<date>.log`.
    pub prefix: String,
    /// Rotation period.
    pub rotation: FileRotation,
    /// Files kept after rotation. Zero keeps all of them.
    pub max_files: usize,
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            prefix: "devents".to_owned(),
            rotation: FileRotation::Daily,
            max_files: 0,
        }
    }
}

/// Settings for [`setup_logging`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Base filter, e.g. `info` or `warn,devents=debug`.
    pub level: String,
    /// Line format.
    pub format: LogFormat,
    /// Output destination.
    pub target: LogTarget,
    /// File settings, used with [`LogTarget::File`].
    pub file: FileLogConfig,
    /// Prefix records with a timestamp.
    pub timestamps: bool,
    /// Emit ANSI color codes.
    pub ansi: bool,
    /// Extra filter directives layered on top of `level`.
    pub directives: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
            target: LogTarget::Stderr,
            file: FileLogConfig::default(),
            timestamps: true,
            ansi: true,
            directives: Vec::new(),
        }
    }
}

impl LogConfig {
    /// Defaults with the given base filter.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    /// Use `format`.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Write to `target`.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Write to rotating files in `directory`. Turns colors off.
    #[must_use]
    pub fn with_file_logging(
        mut self,
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
        rotation: FileRotation,
    ) -> Self {
        self.target = LogTarget::File(directory.into());
        self.file.prefix = prefix.into();
        self.file.rotation = rotation;
        self.ansi = false;
        self
    }

    /// Append a filter directive such as `devents=trace`.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Drop timestamps.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Drop ANSI colors.
    #[must_use]
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    fn filter(&self) -> TelemetryResult<EnvFilter> {
        let invalid = |filter: &str, reason: &dyn std::fmt::Display| TelemetryError::InvalidFilter {
            filter: filter.to_owned(),
            reason: reason.to_string(),
        };

        let mut filter = EnvFilter::try_new(&self.level).map_err(|e| invalid(self.level.as_str(), &e))?;
        for directive in &self.directives {
            let parsed = directive.parse().map_err(
                |e: tracing_subscriber::filter::ParseError| invalid(directive.as_str(), &e),
            )?;
            filter = filter.add_directive(parsed);
        }
        Ok(filter)
    }

    fn layer<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let base = fmt::layer().with_writer(writer).with_ansi(self.ansi);

        match (self.format, self.timestamps) {
            (LogFormat::Pretty, true) => base.pretty().boxed(),
            (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => base.compact().boxed(),
            (LogFormat::Compact, false) => base.compact().without_time().boxed(),
            (LogFormat::Json, true) => base.json().boxed(),
            (LogFormat::Json, false) => base.json().without_time().boxed(),
            (LogFormat::Full, true) => base.boxed(),
            (LogFormat::Full, false) => base.without_time().boxed(),
        }
    }
}

#[cfg(feature = "config")]
impl From<&devents_config::LoggingSection> for LogConfig {
    /// The section is validated on load, so an unknown format cannot reach
    /// this point; it would fall back to compact.
    fn from(section: &devents_config::LoggingSection) -> Self {
        Self {
            level: section.level.clone(),
            format: section.format.parse().unwrap_or_default(),
            directives: section.directives.clone(),
            ..Self::default()
        }
    }
}

fn file_appender(dir: &Path, file: &FileLogConfig) -> TelemetryResult<RollingFileAppender> {
    let unusable = |reason: String| TelemetryError::LogDirectory {
        path: dir.to_path_buf(),
        reason,
    };

    std::fs::create_dir_all(dir).map_err(|e| unusable(e.to_string()))?;

    let mut builder = RollingFileAppender::builder()
        .rotation(file.rotation.into())
        .filename_prefix(file.prefix.as_str())
        .filename_suffix("log");
    if file.max_files > 0 {
        builder = builder.max_log_files(file.max_files);
    }
    builder.build(dir).map_err(|e| unusable(e.to_string()))
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// - [`TelemetryError::InvalidFilter`] for a bad level or directive.
/// - [`TelemetryError::LogDirectory`] if a file target cannot be opened.
/// - [`TelemetryError::AlreadyInstalled`] if a subscriber is already set.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.filter()?;
    let layer = match &config.target {
        LogTarget::Stdout => config.layer(std::io::stdout),
        LogTarget::Stderr => config.layer(std::io::stderr),
        LogTarget::File(dir) => config.layer(file_appender(dir, &config.file)?),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInstalled(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.target, LogTarget::Stderr);
        assert!(config.timestamps && config.ansi);
    }

    #[test]
    fn test_builders() {
        let config = LogConfig::new("debug")
            .with_format(LogFormat::Json)
            .with_target(LogTarget::Stdout)
            .without_timestamps()
            .without_ansi()
            .with_directive("devents=trace");

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.target, LogTarget::Stdout);
        assert!(!config.timestamps);
        assert!(!config.ansi);
        assert_eq!(config.directives, vec!["devents=trace"]);
    }

    #[test]
    fn test_file_logging_turns_colors_off() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig::default().with_file_logging(dir.path(), "app", FileRotation::Hourly);

        assert_eq!(config.target, LogTarget::File(dir.path().to_path_buf()));
        assert_eq!(config.file.prefix, "app");
        assert_eq!(config.file.rotation, FileRotation::Hourly);
        assert!(!config.ansi);
    }

    #[test]
    fn test_file_appender_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs");

        assert!(file_appender(&nested, &FileLogConfig::default()).is_ok());
        assert!(nested.is_dir());
    }

    #[test]
    fn test_file_appender_rejects_file_as_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let err = file_appender(file.path(), &FileLogConfig::default()).unwrap_err();
        assert!(matches!(err, TelemetryError::LogDirectory { .. }));
    }

    #[test]
    fn test_serde_fills_missing_fields() {
        let parsed: LogConfig = serde_json::from_str(r#"{"level":"warn","format":"pretty"}"#).unwrap();
        assert_eq!(parsed, LogConfig::new("warn").with_format(LogFormat::Pretty));

        let parsed: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, LogConfig::default());
    }

    #[test]
    fn test_format_names() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("full".parse::<LogFormat>().unwrap(), LogFormat::Full);

        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert!(matches!(err, TelemetryError::UnknownFormat(name) if name == "xml"));
    }

    #[test]
    fn test_filter_accepts_directives() {
        let config = LogConfig::new("debug").with_directive("devents=trace");
        assert!(config.filter().is_ok());
    }

    #[test]
    fn test_filter_names_bad_directive() {
        let config = LogConfig::new("debug").with_directive("[broken=syntax");

        let err = config.filter().unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::InvalidFilter { filter, .. } if filter == "[broken=syntax"
        ));
    }

    #[test]
    fn test_layer_for_every_format() {
        for format in [LogFormat::Pretty, LogFormat::Compact, LogFormat::Json, LogFormat::Full] {
            let config = LogConfig::default().with_format(format);
            let _ = config.layer(std::io::sink);
            let _ = config.without_timestamps().layer(std::io::sink);
        }
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_logging_section() {
        let section = devents_config::LoggingSection {
            level: "debug".to_owned(),
            format: "json".to_owned(),
            directives: vec!["devents=trace".to_owned()],
        };

        let config = LogConfig::from(&section);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.directives, vec!["devents=trace"]);
        assert_eq!(config.target, LogTarget::Stderr);
    }
}
