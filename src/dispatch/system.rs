//! The process-level logging system.
//!
//! Holds the active [`PipelineConfig`], the output sink, and the
//! `Unconfigured -> Configured -> Frozen` state machine. Front-ends receive
//! the system by `Arc` at construction; nothing looks it up ambiently.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::config::error::ConfigurationError;
use crate::config::settings::{LoggingSettings, ResolvedSettings};
use crate::frontend::legacy::{LegacyBridge, LegacyLogger};
use crate::frontend::structured::BoundLogger;
use crate::logging::structured::SystemContext;
use crate::pipeline::config::PipelineConfig;
use crate::processors::{common_processors, SharedProcessor};
use crate::render::sink::{ConsoleSink, Sink};
use crate::{diag_debug, diag_info, diag_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    Unconfigured,
    Configured,
    Frozen,
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SystemState::Unconfigured => "unconfigured",
            SystemState::Configured => "configured",
            SystemState::Frozen => "frozen",
        };
        f.write_str(name)
    }
}

pub struct LoggingSystem {
    context: SystemContext,
    sink: Arc<dyn Sink>,
    config: RwLock<Option<Arc<PipelineConfig>>>,
    fallback: OnceLock<Arc<PipelineConfig>>,
    frozen: AtomicBool,
    generation: AtomicU64,
    bridge_installed: AtomicBool,
}

impl LoggingSystem {
    pub fn new(sink: Arc<dyn Sink>) -> Arc<Self> {
        Arc::new(Self {
            context: SystemContext::new(),
            sink,
            config: RwLock::new(None),
            fallback: OnceLock::new(),
            frozen: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            bridge_installed: AtomicBool::new(false),
        })
    }

    /// System writing to stderr.
    pub fn with_console() -> Arc<Self> {
        Self::new(Arc::new(ConsoleSink::stderr()))
    }

    pub fn context(&self) -> &SystemContext {
        &self.context
    }

    pub fn state(&self) -> SystemState {
        if self.frozen.load(Ordering::Acquire) {
            SystemState::Frozen
        } else if self.config.read().is_some() {
            SystemState::Configured
        } else {
            SystemState::Unconfigured
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Validate `settings`, build a configuration around `shared` and make
    /// it active.
    pub fn configure(&self, settings: &LoggingSettings, shared: Vec<SharedProcessor>) -> Result<(), ConfigurationError> {
        self.install(PipelineConfig::build(settings, shared)?)
    }

    /// Same as [`configure`](Self::configure) with the standard shared steps.
    pub fn configure_standard(&self, settings: &LoggingSettings) -> Result<(), ConfigurationError> {
        self.install(PipelineConfig::standard(settings)?)
    }

    /// Swap in a fully built configuration.
    ///
    /// Fails with [`ConfigurationError::Frozen`] once a caching logger has
    /// emitted; the active configuration is left untouched in that case.
    pub fn install(&self, config: PipelineConfig) -> Result<(), ConfigurationError> {
        let min_level = config.min_level();
        let generation = {
            let mut slot = self.config.write();
            if self.frozen.load(Ordering::Acquire) {
                None
            } else {
                *slot = Some(Arc::new(config));
                Some(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
            }
        };

        let Some(generation) = generation else {
            diag_warn!(self.context, "CONFIGURE_REJECTED", reason = "frozen");
            return Err(ConfigurationError::Frozen);
        };

        if self.bridge_installed.load(Ordering::Acquire) {
            log::set_max_level(min_level.to_log_filter());
        }

        diag_debug!(
            self.context.with_generation(generation),
            "LOGGING_CONFIGURED",
            level = min_level.as_upper()
        );
        Ok(())
    }

    /// The configuration emissions use right now.
    ///
    /// While unconfigured this is a built-in default (INFO, standard steps)
    /// that never freezes.
    pub fn current(&self) -> Arc<PipelineConfig> {
        if let Some(config) = self.config.read().as_ref() {
            return config.clone();
        }
        self.fallback()
    }

    fn fallback(&self) -> Arc<PipelineConfig> {
        self.fallback
            .get_or_init(|| {
                Arc::new(PipelineConfig::from_resolved(
                    ResolvedSettings::default(),
                    common_processors(),
                ))
            })
            .clone()
    }

    /// Configuration for a structured emission.
    ///
    /// When the active configuration caches on first use, this is where the
    /// system freezes. The check-and-set runs under the read lock so it
    /// cannot interleave with `install`. The flag tells the caller whether
    /// to cache what it got.
    pub(crate) fn acquire_for_emission(&self) -> (Arc<PipelineConfig>, bool) {
        let guard = self.config.read();
        let Some(config) = guard.as_ref().cloned() else {
            drop(guard);
            return (self.fallback(), false);
        };

        let cache = config.caches_on_first_use();
        let newly_frozen = cache && !self.frozen.swap(true, Ordering::AcqRel);
        drop(guard);

        if newly_frozen {
            diag_debug!(self.context, "LOGGING_FROZEN");
        }
        (config, cache)
    }

    pub(crate) fn emit(&self, line: &str) {
        self.sink.write_line(line);
    }

    pub fn flush(&self) {
        self.sink.flush();
    }

    /// Structured front-end logger.
    pub fn get_logger(self: &Arc<Self>, name: &str) -> BoundLogger {
        BoundLogger::new(Arc::clone(self), name)
    }

    /// A `log::Log` implementation wired to this system.
    pub fn legacy_bridge(self: &Arc<Self>) -> LegacyBridge {
        LegacyBridge::new(Arc::clone(self))
    }

    /// Legacy front-end logger that talks to this system directly, without
    /// going through the global `log` logger.
    pub fn legacy_logger(self: &Arc<Self>, name: &str) -> LegacyLogger {
        LegacyLogger::with_backend(name, Arc::new(self.legacy_bridge()))
    }

    /// Register this system as the global `log` logger.
    ///
    /// `log` accepts one global logger per process, so this succeeds once.
    pub fn install_legacy_bridge(self: &Arc<Self>) -> Result<(), ConfigurationError> {
        log::set_boxed_logger(Box::new(self.legacy_bridge()))?;
        self.bridge_installed.store(true, Ordering::Release);
        let min_level = self.current().min_level();
        log::set_max_level(min_level.to_log_filter());

        diag_info!(self.context, "LEGACY_BRIDGE_INSTALLED", max_level = min_level.as_upper());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Level;
    use crate::frontend::facade::LogFacade;
    use crate::render::sink::MemorySink;

    fn plain(level: &str) -> LoggingSettings {
        LoggingSettings {
            colors: false,
            ..LoggingSettings::with_level(level)
        }
    }

    #[test]
    fn test_state_transitions() {
        let system = LoggingSystem::new(Arc::new(MemorySink::new()));
        assert_eq!(system.state(), SystemState::Unconfigured);

        system.configure_standard(&plain("INFO")).unwrap();
        assert_eq!(system.state(), SystemState::Configured);

        system.get_logger("app").info("first");
        assert_eq!(system.state(), SystemState::Frozen);
    }

    #[test]
    fn test_reconfigure_before_freeze_replaces() {
        let system = LoggingSystem::new(Arc::new(MemorySink::new()));
        system.configure_standard(&plain("INFO")).unwrap();
        system.configure_standard(&plain("ERROR")).unwrap();
        assert_eq!(system.current().min_level(), Level::Error);
    }

    #[test]
    fn test_reconfigure_after_freeze_fails_and_keeps_config() {
        let system = LoggingSystem::new(Arc::new(MemorySink::new()));
        system.configure_standard(&plain("WARNING")).unwrap();
        system.get_logger("app").warning("freeze");

        let err = system.configure_standard(&plain("DEBUG")).unwrap_err();
        assert!(matches!(err, ConfigurationError::Frozen));
        assert_eq!(system.current().min_level(), Level::Warning);
    }

    #[test]
    fn test_unknown_level_leaves_state_alone() {
        let system = LoggingSystem::new(Arc::new(MemorySink::new()));
        system.configure_standard(&plain("INFO")).unwrap();
        assert!(matches!(
            system.configure_standard(&plain("SHOUT")),
            Err(ConfigurationError::UnknownLevel(_))
        ));
        assert_eq!(system.current().min_level(), Level::Info);
        assert_eq!(system.state(), SystemState::Configured);
    }

    #[test]
    fn test_no_freeze_without_caching() {
        let system = LoggingSystem::new(Arc::new(MemorySink::new()));
        let settings = LoggingSettings {
            cache_logger_on_first_use: false,
            ..plain("INFO")
        };
        system.configure_standard(&settings).unwrap();
        system.get_logger("app").info("emit");
        assert_eq!(system.state(), SystemState::Configured);
        system.configure_standard(&plain("ERROR")).unwrap();
    }

    #[test]
    fn test_unconfigured_emission_uses_defaults_without_freezing() {
        let sink = Arc::new(MemorySink::new());
        let system = LoggingSystem::new(sink.clone());
        let logger = system.get_logger("early");
        logger.debug("dropped");
        logger.info("kept");

        assert_eq!(sink.len(), 1);
        assert_eq!(system.state(), SystemState::Unconfigured);
    }
}
