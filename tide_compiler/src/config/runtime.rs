// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether source files must carry the `.us` extension
    pub require_source_extension: bool,

    /// Whether to log read throughput for each file
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_source_extension: env_flag(env_vars::REQUIRE_SOURCE_EXTENSION, false),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Emit Comment tokens instead of discarding comments
    pub keep_comments: bool,

    /// Whether to collect per-kind token counts
    pub collect_detailed_metrics: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            keep_comments: env_flag(env_vars::LEXICAL_KEEP_COMMENTS, false),
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IrPreferences {
    /// Reject programs whose jumps name a label that was never emitted
    pub verify_labels: bool,

    /// Log a per-kind instruction summary after each build
    pub log_instruction_summary: bool,
}

impl Default for IrPreferences {
    fn default() -> Self {
        Self {
            verify_labels: env_flag(env_vars::IR_VERIFY_LABELS, true),
            log_instruction_summary: env_flag(env_vars::IR_LOG_SUMMARY, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckPreferences {
    /// Run the grammar validator before building IR
    pub run_grammar_validator: bool,

    /// Run the scope checker before building IR
    pub run_scope_checker: bool,

    /// Compare literal initializers against declared types
    pub check_literal_types: bool,
}

impl Default for CheckPreferences {
    fn default() -> Self {
        Self {
            run_grammar_validator: env_flag(env_vars::CHECK_GRAMMAR, true),
            run_scope_checker: env_flag(env_vars::CHECK_SCOPES, true),
            check_literal_types: env_flag(env_vars::CHECK_LITERAL_TYPES, true),
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

    /// Whether to print the cargo-style error report at exit
    pub enable_cargo_style_output: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env_flag(env_vars::LOGGING_CARGO_STYLE, true),
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

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read preferences file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid preferences file '{path}': {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub ir: IrPreferences,
    pub checks: CheckPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML; missing tables and keys keep their
    /// environment-derived defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: display.clone(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| ConfigError::Parse {
            path: display,
            message: e.to_string(),
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_SOURCE_EXTENSION: &str = "TIDE_REQUIRE_SOURCE_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "TIDE_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_KEEP_COMMENTS: &str = "TIDE_LEXICAL_KEEP_COMMENTS";
    pub const LEXICAL_DETAILED_METRICS: &str = "TIDE_LEXICAL_DETAILED_METRICS";

    // IR
    pub const IR_VERIFY_LABELS: &str = "TIDE_IR_VERIFY_LABELS";
    pub const IR_LOG_SUMMARY: &str = "TIDE_IR_LOG_SUMMARY";

    // Checks
    pub const CHECK_GRAMMAR: &str = "TIDE_CHECK_GRAMMAR";
    pub const CHECK_SCOPES: &str = "TIDE_CHECK_SCOPES";
    pub const CHECK_LITERAL_TYPES: &str = "TIDE_CHECK_LITERAL_TYPES";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "TIDE_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "TIDE_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "TIDE_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "TIDE_LOGGING_CARGO_STYLE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("WARN"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("2"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [lexical]
            keep_comments = true

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.lexical.keep_comments);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(RuntimeConfig::from_toml_str("[lexical\nkeep_comments = 1").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = RuntimeConfig::load(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
