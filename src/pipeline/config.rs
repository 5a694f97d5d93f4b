//! Chain configuration shared by both front-ends.

use std::sync::Arc;

use env_logger::filter::{Builder as FilterBuilder, Filter};
use log::LevelFilter;

use crate::config::error::ConfigurationError;
use crate::config::settings::{LoggingSettings, RendererKind, ResolvedSettings};
use crate::event::Level;
use crate::pipeline::chain::Chain;
use crate::pipeline::handle::LoggerHandle;
use crate::processors::{
    common_processors_with, ExtraAdder, FilterByLevel, RemoveProcessorsMeta, SharedProcessor,
    TimeStamper,
};
use crate::render::{ConsoleRenderer, JsonRenderer, ProcessorFormatter, Renderer};

/// One immutable configuration: the shared step list, the two adapter
/// chains built around it, and the output policy.
///
/// The structured chain is `[filter_by_level, *shared]`; the foreign
/// pre-chain used for legacy records is `[extra_adder, *shared]`. Both hold
/// the very same step instances.
pub struct PipelineConfig {
    settings: ResolvedSettings,
    shared: Chain,
    structured_chain: Chain,
    formatter: ProcessorFormatter,
    filter: Option<Filter>,
}

impl PipelineConfig {
    /// Validate `settings` and build the configuration around `shared`.
    pub fn build(settings: &LoggingSettings, shared: Vec<SharedProcessor>) -> Result<Self, ConfigurationError> {
        Ok(Self::from_resolved(settings.resolve()?, shared))
    }

    /// Standard shared steps, with the timestamp layout taken from `settings`.
    pub fn standard(settings: &LoggingSettings) -> Result<Self, ConfigurationError> {
        let resolved = settings.resolve()?;
        let stamper = TimeStamper::new(&resolved.timestamp_format, resolved.utc);
        Ok(Self::from_resolved(resolved, common_processors_with(stamper)))
    }

    pub fn from_resolved(settings: ResolvedSettings, shared: Vec<SharedProcessor>) -> Self {
        let structured_chain = Chain::compose(vec![Arc::new(FilterByLevel)], &shared);
        let foreign_pre_chain = Chain::compose(vec![Arc::new(ExtraAdder::new())], &shared);

        let processors = if settings.remove_metadata {
            Chain::new(vec![Arc::new(RemoveProcessorsMeta)])
        } else {
            Chain::default()
        };

        let renderer: Box<dyn Renderer> = match settings.renderer {
            RendererKind::Console => Box::new(ConsoleRenderer::new(settings.colors)),
            RendererKind::Json => Box::new(JsonRenderer),
        };

        let filter = settings.filters.as_deref().map(|directives| {
            FilterBuilder::new()
                .filter_level(LevelFilter::Trace)
                .parse(directives)
                .build()
        });

        let formatter = ProcessorFormatter::new(foreign_pre_chain, processors, renderer, settings.min_level);

        Self {
            settings,
            shared: Chain::new(shared),
            structured_chain,
            formatter,
            filter,
        }
    }

    pub fn settings(&self) -> &ResolvedSettings {
        &self.settings
    }

    pub fn min_level(&self) -> Level {
        self.settings.min_level
    }

    pub fn caches_on_first_use(&self) -> bool {
        self.settings.cache_logger_on_first_use
    }

    /// The step list both front-ends share.
    pub fn shared_chain(&self) -> &Chain {
        &self.shared
    }

    pub fn structured_chain(&self) -> &Chain {
        &self.structured_chain
    }

    pub fn foreign_pre_chain(&self) -> &Chain {
        self.formatter.foreign_pre_chain()
    }

    pub fn formatter(&self) -> &ProcessorFormatter {
        &self.formatter
    }

    /// Whether a logger named `target` emits at `level`.
    ///
    /// The global threshold gates everything; per-logger directives can only
    /// raise a logger above it.
    pub fn accepts(&self, target: &str, level: Level) -> bool {
        if level < self.settings.min_level {
            return false;
        }
        self.filter.as_ref().map_or(true, |filter| {
            filter.enabled(
                &log::Metadata::builder()
                    .level(level.to_log())
                    .target(target)
                    .build(),
            )
        })
    }

    /// Handle for the logger named `name`, carrying its effective level.
    pub fn logger_handle(&self, name: &str) -> LoggerHandle {
        let level = Level::ALL.into_iter().find(|level| self.accepts(name, *level));
        LoggerHandle::new(name, level)
    }
}
