//! The same diagnostic step sits in both front-ends' chains. On the
//! structured path it sees the emitting logger's handle; on the `log` path
//! it sees `None`.
//!
//! Expected stdout:
//!
//! ```text
//! logger argument is <Logger testing_sructlog (DEBUG)>
//! logger argument is None
//! ```
//!
//! with the two rendered lines on stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use logbridge_core::processors::{common_processors, LoggerProbe};
use logbridge_core::{
    configure_logging_with, console_settings, ConsoleSink, LogFacade, LoggingSettings, LoggingSystem,
};

fn main() -> Result<()> {
    let settings = LoggingSettings {
        filters: Some("logbridge_core=warn".to_string()),
        ..console_settings("DEBUG", &ConsoleSink::stderr())
    };

    let mut shared = common_processors();
    shared.insert(1, Arc::new(LoggerProbe::default()));

    let system = configure_logging_with(&settings, Some(shared), LoggingSystem::with_console())
        .context("configuring logging")?;

    system.get_logger("testing_sructlog").debug("A log test.");
    log::debug!(target: "reproduce", "A log test.");

    system.flush();
    Ok(())
}
