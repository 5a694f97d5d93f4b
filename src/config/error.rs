//! Configuration errors.

use thiserror::Error;

/// Failure to build or apply a logging configuration.
///
/// All variants are raised at configuration time; emitting a log event never
/// produces one.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("unknown log level '{0}' (expected DEBUG, INFO, WARNING, ERROR or CRITICAL)")]
    UnknownLevel(String),

    #[error("invalid value '{value}' for {key}")]
    InvalidFlag { key: String, value: String },

    #[error("unknown renderer '{0}' (expected console or json)")]
    UnknownRenderer(String),

    #[error("logging configuration is frozen after first use")]
    Frozen,

    #[error("failed to parse logging settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("a global `log` logger is already installed: {0}")]
    LegacyInstall(#[from] log::SetLoggerError),
}
