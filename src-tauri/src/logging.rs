//! Logging setup for the desktop host.
//!
//! Console output is human-readable and filtered by `RUST_LOG`. A second layer
//! writes JSON lines to a rolling file under the platform data directory, so
//! unobserved failures (a delete that did not happen, a rejected thumbnail)
//! can still be found after the fact.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Prefix of every log file name.
pub const LOG_FILE_PREFIX: &str = "video-hub";

/// Crates whose events are logged below the dependency default.
const OWN_TARGETS: [&str; 2] = ["video_hub", "hub_core"];

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory the log files go to.
    pub log_directory: PathBuf,
    /// Log file name prefix ("video-hub" -> "video-hub.2026-01-15.log").
    pub log_file_prefix: String,
    /// Most verbose level printed to the console for our crates.
    pub console_level: Level,
    /// Most verbose level written to the file for our crates.
    pub file_level: Level,
    /// How often a new file is started.
    pub rotation: LogRotation,
    /// Number of rotated files to keep (0 = keep all).
    pub max_log_files: usize,
    /// Colored console output.
    pub console_ansi: bool,
    /// Timestamps on console lines.
    pub console_timestamps: bool,
    /// Source file and line on every event.
    pub include_file_line: bool,
    /// Log span open/close events.
    pub log_span_events: bool,
}

/// Log rotation frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    /// One file per hour.
    Hourly,
    /// One file per day.
    Daily,
    /// A single file.
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Hourly => Self::HOURLY,
            LogRotation::Daily => Self::DAILY,
            LogRotation::Never => Self::NEVER,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LoggingConfig {
    /// Verbose configuration for debug builds.
    #[must_use]
    pub fn development() -> Self {
        Self {
            log_directory: default_log_directory(),
            log_file_prefix: LOG_FILE_PREFIX.to_string(),
            console_level: Level::DEBUG,
            file_level: Level::TRACE,
            rotation: LogRotation::Hourly,
            max_log_files: 24,
            console_ansi: true,
            console_timestamps: true,
            include_file_line: true,
            log_span_events: true,
        }
    }

    /// Quiet console, daily files.
    #[must_use]
    pub fn production() -> Self {
        Self {
            log_directory: default_log_directory(),
            log_file_prefix: LOG_FILE_PREFIX.to_string(),
            console_level: Level::INFO,
            file_level: Level::DEBUG,
            rotation: LogRotation::Daily,
            max_log_files: 14,
            console_ansi: true,
            console_timestamps: false,
            include_file_line: false,
            log_span_events: false,
        }
    }

    /// Pick development or production by build profile.
    #[must_use]
    pub fn auto() -> Self {
        if cfg!(debug_assertions) {
            Self::development()
        } else {
            Self::production()
        }
    }

    /// Write log files to `path`.
    #[must_use]
    pub fn with_log_directory(mut self, path: PathBuf) -> Self {
        self.log_directory = path;
        self
    }

    /// Set the console level.
    #[must_use]
    pub const fn with_console_level(mut self, level: Level) -> Self {
        self.console_level = level;
        self
    }

    /// Set the file level.
    #[must_use]
    pub const fn with_file_level(mut self, level: Level) -> Self {
        self.file_level = level;
        self
    }

    /// Set the rotation frequency.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: LogRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Filter used when `RUST_LOG` is not set: dependencies at `warn`, our
    /// crates at `level`.
    fn filter_for(level: Level) -> EnvFilter {
        let level = level_to_directive(level);
        let mut directives = vec!["warn".to_string()];
        directives.extend(OWN_TARGETS.iter().map(|target| format!("{target}={level}")));
        EnvFilter::new(directives.join(","))
    }
}

/// Keeps the file writer alive. Dropping it flushes pending lines.
pub struct LoggingGuard {
    _file_guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Install the console and file layers.
///
/// The returned guard must live as long as the application.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    if !config.log_directory.exists() {
        std::fs::create_dir_all(&config.log_directory).map_err(|e| {
            LoggingError::DirectoryCreationFailed {
                path: config.log_directory.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    let mut appender = RollingFileAppender::builder()
        .rotation(config.rotation.into())
        .filename_prefix(&config.log_file_prefix)
        .filename_suffix("log");
    if config.max_log_files > 0 {
        appender = appender.max_log_files(config.max_log_files);
    }
    let appender = appender
        .build(&config.log_directory)
        .map_err(|e| LoggingError::AppenderFailed(e.to_string()))?;
    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| LoggingConfig::filter_for(config.console_level));
    let file_filter = LoggingConfig::filter_for(config.file_level);

    let span_events = if config.log_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let console_layer = fmt::layer()
        .with_ansi(config.console_ansi)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .with_span_events(span_events.clone());
    let console_layer: Box<dyn Layer<Registry> + Send + Sync> = if config.console_timestamps {
        console_layer.boxed()
    } else {
        console_layer.without_time().boxed()
    };

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .json()
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(console_layer.with_filter(console_filter))
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// [`init`] with [`LoggingConfig::auto`].
pub fn init_auto() -> Result<LoggingGuard, LoggingError> {
    init(&LoggingConfig::auto())
}

/// `<data_local_dir>/video-hub/logs`.
#[must_use]
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_PREFIX)
        .join("logs")
}

const fn level_to_directive(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Logging could not be set up.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("Failed to create log directory {path}: {reason}")]
    DirectoryCreationFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// OS message.
        reason: String,
    },

    /// The rolling file appender could not be built.
    #[error("Failed to open log file: {0}")]
    AppenderFailed(String),

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_production() {
        let config = LoggingConfig::default();
        assert_eq!(config.console_level, Level::INFO);
        assert_eq!(config.rotation, LogRotation::Daily);
        assert!(!config.console_timestamps);
    }

    #[test]
    fn test_development_config_is_verbose() {
        let config = LoggingConfig::development();
        assert_eq!(config.console_level, Level::DEBUG);
        assert_eq!(config.file_level, Level::TRACE);
        assert_eq!(config.rotation, LogRotation::Hourly);
        assert!(config.log_span_events);
    }

    #[test]
    fn test_config_builder() {
        let config = LoggingConfig::production()
            .with_log_directory(PathBuf::from("/tmp/hub-logs"))
            .with_console_level(Level::WARN)
            .with_file_level(Level::INFO)
            .with_rotation(LogRotation::Never);

        assert_eq!(config.log_directory, PathBuf::from("/tmp/hub-logs"));
        assert_eq!(config.console_level, Level::WARN);
        assert_eq!(config.file_level, Level::INFO);
        assert_eq!(config.rotation, LogRotation::Never);
    }

    #[test]
    fn test_filter_names_own_crates() {
        let filter = LoggingConfig::filter_for(Level::DEBUG).to_string();
        assert!(filter.contains("video_hub=debug"));
        assert!(filter.contains("hub_core=debug"));
        assert!(filter.contains("warn"));
    }

    #[test]
    fn test_default_log_directory() {
        let dir = default_log_directory();
        assert!(dir.ends_with("video-hub/logs"));
    }
}
