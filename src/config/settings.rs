//! Logging settings.
//!
//! Settings can be built in code, parsed from JSON, or read from the
//! environment. They stay unvalidated text until `resolve` turns them into a
//! `ResolvedSettings`, which is where an unknown level fails.

use std::str::FromStr;

use serde::Deserialize;

use super::error::ConfigurationError;
use crate::event::Level;

/// Default timestamp layout, `2024-04-05T15:02:51+0000`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

pub const ENV_LEVEL: &str = "LOG_LEVEL";
pub const ENV_REMOVE_METADATA: &str = "LOG_REMOVE_METADATA";
pub const ENV_CACHE_ON_FIRST_USE: &str = "LOG_CACHE_ON_FIRST_USE";
pub const ENV_COLORS: &str = "LOG_COLORS";
pub const ENV_RENDERER: &str = "LOG_RENDERER";
pub const ENV_FILTERS: &str = "LOG_FILTERS";

/// Final renderer choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Console,
    Json,
}

impl FromStr for RendererKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(RendererKind::Console),
            "json" => Ok(RendererKind::Json),
            _ => Err(ConfigurationError::UnknownRenderer(s.to_string())),
        }
    }
}

/// User-facing logging settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Minimum severity, e.g. "INFO".
    pub level: String,
    /// Strip `_record` / `_from_structured` before rendering.
    pub remove_metadata: bool,
    /// Freeze the configuration on the first structured emission.
    pub cache_logger_on_first_use: bool,
    pub colors: bool,
    pub renderer: RendererKind,
    /// Per-logger directives, e.g. `hyper=warn,app::db=error`.
    pub filters: Option<String>,
    pub timestamp_format: String,
    pub utc: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            remove_metadata: true,
            cache_logger_on_first_use: true,
            colors: true,
            renderer: RendererKind::Console,
            filters: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc: true,
        }
    }
}

impl LoggingSettings {
    pub fn with_level(level: &str) -> Self {
        Self {
            level: level.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from `LOG_*` environment variables, defaulting the rest.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(level) = lookup(ENV_LEVEL) {
            settings.level = level;
        }
        if let Some(value) = lookup(ENV_REMOVE_METADATA) {
            settings.remove_metadata = parse_flag(ENV_REMOVE_METADATA, &value)?;
        }
        if let Some(value) = lookup(ENV_CACHE_ON_FIRST_USE) {
            settings.cache_logger_on_first_use = parse_flag(ENV_CACHE_ON_FIRST_USE, &value)?;
        }
        if let Some(value) = lookup(ENV_COLORS) {
            settings.colors = parse_flag(ENV_COLORS, &value)?;
        }
        if let Some(value) = lookup(ENV_RENDERER) {
            settings.renderer = value.parse()?;
        }
        if let Some(value) = lookup(ENV_FILTERS) {
            settings.filters = Some(value).filter(|v| !v.trim().is_empty());
        }

        Ok(settings)
    }

    /// Validate the textual settings.
    pub fn resolve(&self) -> Result<ResolvedSettings, ConfigurationError> {
        Ok(ResolvedSettings {
            min_level: self.level.parse()?,
            remove_metadata: self.remove_metadata,
            cache_logger_on_first_use: self.cache_logger_on_first_use,
            colors: self.colors,
            renderer: self.renderer,
            filters: self.filters.clone(),
            timestamp_format: self.timestamp_format.clone(),
            utc: self.utc,
        })
    }
}

/// Settings after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub min_level: Level,
    pub remove_metadata: bool,
    pub cache_logger_on_first_use: bool,
    pub colors: bool,
    pub renderer: RendererKind,
    pub filters: Option<String>,
    pub timestamp_format: String,
    pub utc: bool,
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        let defaults = LoggingSettings::default();
        Self {
            min_level: Level::Info,
            remove_metadata: defaults.remove_metadata,
            cache_logger_on_first_use: defaults.cache_logger_on_first_use,
            colors: defaults.colors,
            renderer: defaults.renderer,
            filters: None,
            timestamp_format: defaults.timestamp_format,
            utc: defaults.utc,
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigurationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigurationError::InvalidFlag {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = LoggingSettings::default();
        assert_eq!(settings.level, "INFO");
        assert!(settings.remove_metadata);
        assert!(settings.cache_logger_on_first_use);
        assert_eq!(settings.resolve().unwrap().min_level, Level::Info);
    }

    #[test]
    fn test_from_json_partial() {
        let settings =
            LoggingSettings::from_json(r#"{"level": "debug", "renderer": "json", "colors": false}"#)
                .unwrap();
        assert_eq!(settings.renderer, RendererKind::Json);
        assert!(!settings.colors);
        assert!(settings.remove_metadata);
        assert_eq!(settings.resolve().unwrap().min_level, Level::Debug);
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_LEVEL, "WARNING"),
            (ENV_REMOVE_METADATA, "no"),
            (ENV_FILTERS, "hyper=error"),
        ]);
        let settings =
            LoggingSettings::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert!(!settings.remove_metadata);
        assert_eq!(settings.filters.as_deref(), Some("hyper=error"));
        assert_eq!(settings.resolve().unwrap().min_level, Level::Warning);
    }

    #[test]
    fn test_invalid_flag() {
        let err = LoggingSettings::from_lookup(|key| {
            (key == ENV_COLORS).then(|| "maybe".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidFlag { .. }));
    }

    #[test]
    fn test_unknown_level_fails_on_resolve() {
        let settings = LoggingSettings::with_level("LOUD");
        assert!(matches!(
            settings.resolve(),
            Err(ConfigurationError::UnknownLevel(_))
        ));
    }
}
