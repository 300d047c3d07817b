// RUNTIME PREFERENCES (User Experience)
//
// Compile-time limits live in `compile_time`; everything here can change per run,
// either through YUP_* environment variables or a TOML preferences file.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to reject files without a `.yup` extension
    pub require_yup_extension: bool,

    /// Whether to log read timings for each file
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_yup_extension: env_or(env_vars::REQUIRE_YUP_EXTENSION, false),
            enable_performance_logging: env_or(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to collect per-class token counts
    pub collect_detailed_metrics: bool,

    /// Whether to log the full token dump at debug level
    pub log_token_dump: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_or(env_vars::LEXICAL_DETAILED_METRICS, true),
            log_token_dump: env_or(env_vars::LEXICAL_LOG_TOKEN_DUMP, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxPreferences {
    /// Report diagnostics with the historical `offset / 2` line arithmetic.
    /// When false, diagnostics carry the true 1-based line and column.
    pub legacy_positions: bool,

    /// Whether to log rule entry/exit at debug level
    pub trace_rules: bool,
}

impl Default for SyntaxPreferences {
    fn default() -> Self {
        Self {
            legacy_positions: env_or(env_vars::SYNTAX_LEGACY_POSITIONS, true),
            trace_rules: env_or(env_vars::SYNTAX_TRACE_RULES, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            include_file_context: env_or(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (environment variables and `--log-level`)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeConfigError {
    #[error("Failed to read preferences file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Invalid preferences file '{path}': {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub syntax: SyntaxPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML. Missing sections and keys fall back to
    /// their environment-derived defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RuntimeConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| RuntimeConfigError::Read {
            path: display.clone(),
            message: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| RuntimeConfigError::Parse {
            path: display,
            message: e.to_string(),
        })
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_YUP_EXTENSION: &str = "YUP_REQUIRE_YUP_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "YUP_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "YUP_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_LOG_TOKEN_DUMP: &str = "YUP_LEXICAL_LOG_TOKEN_DUMP";

    // Syntax
    pub const SYNTAX_LEGACY_POSITIONS: &str = "YUP_SYNTAX_LEGACY_POSITIONS";
    pub const SYNTAX_TRACE_RULES: &str = "YUP_SYNTAX_TRACE_RULES";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "YUP_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "YUP_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "YUP_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "YUP_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Info < LogLevel::Debug);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [syntax]
            legacy_positions = false

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(!config.syntax.legacy_positions);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_toml_round_trip_preserves_syntax_section() {
        let mut config = RuntimeConfig::default();
        config.syntax.legacy_positions = false;

        let text = config.to_toml_string().unwrap();
        let back = RuntimeConfig::from_toml_str(&text).unwrap();
        assert!(!back.syntax.legacy_positions);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(RuntimeConfig::from_toml_str("[syntax\nlegacy_positions = ").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = RuntimeConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
