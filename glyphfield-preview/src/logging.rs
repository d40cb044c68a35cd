use std::path::PathBuf;

use color_eyre::{Report, eyre::WrapErr};
use directories::ProjectDirs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_FILE_NAME: &str = "glyphfield-preview.log";

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level for file output
    pub file_level: Level,
    /// Log level for console output
    pub console_level: Level,
    /// Directory where log files should be written
    pub log_dir: Option<PathBuf>,
    /// Whether to enable JSON formatted logs for structured output
    pub json_format: bool,
    /// Whether frames are drawn to the terminal (disables console logging)
    pub is_tui: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_level: Level::DEBUG,
            console_level: Level::WARN,
            log_dir: Some(Self::default_log_dir()),
            json_format: false,
            is_tui: false,
        }
    }
}

impl LoggingConfig {
    /// Get the OS-appropriate default log directory
    pub fn default_log_dir() -> PathBuf {
        ProjectDirs::from("", "", "glyphfield")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("glyphfield-logs"))
    }

    /// Create logging configuration from `GLYPHFIELD_*` environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let level = |key: &str| var(key).and_then(|v| v.parse::<Level>().ok());

        if let Some(level) = level("GLYPHFIELD_LOG_LEVEL") {
            config.file_level = level;
            config.console_level = level;
        }
        if let Some(level) = level("GLYPHFIELD_FILE_LOG_LEVEL") {
            config.file_level = level;
        }
        if let Some(level) = level("GLYPHFIELD_CONSOLE_LOG_LEVEL") {
            config.console_level = level;
        }

        if let Some(log_dir) = var("GLYPHFIELD_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(log_dir));
        }
        if var("GLYPHFIELD_NO_FILE_LOGS").is_some() {
            config.log_dir = None;
        }
        if var("GLYPHFIELD_JSON_LOGS").is_some() {
            config.json_format = true;
        }

        config
    }

    /// Disables console output while frames are being drawn to the terminal.
    pub fn tui(mut self, is_tui: bool) -> Self {
        self.is_tui = is_tui;
        self
    }
}

/// Initialize the logging system with the given configuration
///
/// The returned guard flushes the file writer when dropped and must be kept
/// alive for the duration of the program.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, Report> {
    let mut layers = vec![];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)
            .wrap_err_with(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_filter = EnvFilter::builder()
            .with_default_directive(config.file_level.into())
            .from_env_lossy();

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(file_filter)
                .boxed()
        } else {
            fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(file_filter)
                .boxed()
        };

        layers.push(file_layer);
    }

    if !config.is_tui {
        let console_filter = EnvFilter::builder()
            .with_default_directive(config.console_level.into())
            .from_env_lossy();

        // stdout carries the rendered frames
        let console_layer = fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed();

        layers.push(console_layer);
    }

    tracing_subscriber::registry().with(layers).init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> LoggingConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LoggingConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        assert_eq!(config_from(&[]), LoggingConfig::default());
    }

    #[test]
    fn test_specific_levels_override_global() {
        let config = config_from(&[
            ("GLYPHFIELD_LOG_LEVEL", "info"),
            ("GLYPHFIELD_CONSOLE_LOG_LEVEL", "error"),
        ]);

        assert_eq!(config.file_level, Level::INFO);
        assert_eq!(config.console_level, Level::ERROR);
    }

    #[test]
    fn test_unparseable_level_is_ignored() {
        let config = config_from(&[("GLYPHFIELD_LOG_LEVEL", "loud")]);
        assert_eq!(config.file_level, Level::DEBUG);
    }

    #[test]
    fn test_no_file_logs_wins_over_log_dir() {
        let config = config_from(&[
            ("GLYPHFIELD_LOG_DIR", "/tmp/glyphfield"),
            ("GLYPHFIELD_NO_FILE_LOGS", "1"),
            ("GLYPHFIELD_JSON_LOGS", "1"),
        ]);

        assert_eq!(config.log_dir, None);
        assert!(config.json_format);
    }
}
