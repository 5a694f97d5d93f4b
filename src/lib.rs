//! logbridge-core - one enrichment pipeline behind two logging front-ends
//!
//! Code that logs through the `log` facade and code that logs through bound,
//! structured loggers end up in the same formatter: the same shared steps,
//! the same level threshold, the same rendered line.
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `event` - levels, field values and the event dictionary
//! - `processors` - enrichment steps
//! - `pipeline` - chains, logger handles and the per-configuration wiring
//! - `render` - the shared formatter, renderers and sinks
//! - `frontend` - the structured and legacy loggers
//! - `dispatch` - the logging system and its configuration lifecycle
//! - `config` - settings and configuration errors
//! - `logging` - diagnostics for the system itself

pub mod config;
pub mod event;
pub mod logging;
pub mod processors;
pub mod pipeline;
pub mod render;
pub mod frontend;
pub mod dispatch;

use std::sync::Arc;

pub use config::{ConfigurationError, LoggingSettings, RendererKind};
pub use dispatch::{LoggingSystem, SystemState};
pub use event::{EventDict, ExceptionInfo, FieldValue, Level};
pub use frontend::{BoundLogger, Fields, LegacyBridge, LegacyLogger, LogFacade};
pub use pipeline::{Chain, LoggerHandle, PipelineConfig};
pub use processors::{DropEvent, ProcessResult, Processor, SharedProcessor};
pub use render::{ConsoleSink, MemorySink, Sink};

/// Configure logging at `level` with the standard steps, console output on
/// stderr, and the `log` bridge installed.
///
/// Colors are on only when stderr accepts them. Unknown levels fail before
/// anything is touched.
pub fn configure_logging(level: &str) -> Result<Arc<LoggingSystem>, ConfigurationError> {
    let sink = ConsoleSink::stderr();
    let settings = console_settings(level, &sink);
    configure_logging_with(&settings, None, LoggingSystem::new(Arc::new(sink)))
}

/// Default settings at `level`, with colors following what `sink` supports.
pub fn console_settings(level: &str, sink: &ConsoleSink) -> LoggingSettings {
    LoggingSettings {
        colors: sink.supports_colors(),
        ..LoggingSettings::with_level(level)
    }
}

/// Configure `system` from `settings` and install its `log` bridge.
///
/// `shared` replaces the standard step list when given.
pub fn configure_logging_with(
    settings: &LoggingSettings,
    shared: Option<Vec<SharedProcessor>>,
    system: Arc<LoggingSystem>,
) -> Result<Arc<LoggingSystem>, ConfigurationError> {
    match shared {
        Some(shared) => system.configure(settings, shared)?,
        None => system.configure_standard(settings)?,
    }
    system.install_legacy_bridge()?;
    Ok(system)
}

/// Structured logger named `name` on `system`.
pub fn get_logger(system: &Arc<LoggingSystem>, name: &str) -> BoundLogger {
    system.get_logger(name)
}

/// Legacy logger named `name`, going through the global `log` logger.
pub fn legacy_logger(name: &str) -> LegacyLogger {
    LegacyLogger::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_settings_follow_terminal_support() {
        let sink = ConsoleSink::stderr();

        console::set_colors_enabled_stderr(false);
        let settings = console_settings("WARNING", &sink);
        assert!(!settings.colors);
        assert_eq!(settings.level, "WARNING");

        console::set_colors_enabled_stderr(true);
        assert!(console_settings("WARNING", &sink).colors);
    }
}
