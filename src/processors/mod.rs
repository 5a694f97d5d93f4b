//! Enrichment steps.
//!
//! Every step implements [`Processor`]: it receives the event built so far,
//! the handle of the logger that issued the call (absent on the legacy
//! path), and the method name used to log, and returns the updated event.
//!
//! - `contextvars` - thread-bound context merged into every event
//! - `stdlib` - logger name, level, level filter, record extras, metadata removal
//! - `timestamp` - timestamps
//! - `decode` - byte values to text
//! - `exceptions` - captured errors to text
//! - `positional` - %-style message interpolation
//! - `probe` - logger-handle diagnostics

pub mod contextvars;
pub mod decode;
pub mod exceptions;
pub mod positional;
pub mod probe;
pub mod stdlib;
pub mod timestamp;

use std::sync::Arc;

use crate::event::EventDict;
use crate::pipeline::handle::LoggerHandle;

pub use contextvars::MergeContextVars;
pub use decode::UnicodeDecoder;
pub use exceptions::FormatExcInfo;
pub use positional::PositionalArgumentsFormatter;
pub use probe::LoggerProbe;
pub use stdlib::{AddLogLevel, AddLoggerName, ExtraAdder, FilterByLevel, RemoveProcessorsMeta};
pub use timestamp::TimeStamper;

/// Signal that the event must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent;

pub type ProcessResult = Result<EventDict, DropEvent>;

/// A single enrichment step.
pub trait Processor: Send + Sync {
    fn process(&self, logger: Option<&LoggerHandle>, method_name: &str, event: EventDict) -> ProcessResult;

    /// Stable identifier, used to compare chain orderings.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> Processor for F
where
    F: Fn(Option<&LoggerHandle>, &str, EventDict) -> ProcessResult + Send + Sync,
{
    fn process(&self, logger: Option<&LoggerHandle>, method_name: &str, event: EventDict) -> ProcessResult {
        self(logger, method_name, event)
    }
}

pub type SharedProcessor = Arc<dyn Processor>;

/// The standard shared step list, in order.
pub fn common_processors() -> Vec<SharedProcessor> {
    common_processors_with(TimeStamper::default())
}

/// The standard shared step list with a custom timestamper.
pub fn common_processors_with(stamper: TimeStamper) -> Vec<SharedProcessor> {
    vec![
        Arc::new(MergeContextVars),
        Arc::new(AddLoggerName),
        Arc::new(AddLogLevel),
        Arc::new(stamper),
        Arc::new(UnicodeDecoder),
        Arc::new(FormatExcInfo),
        Arc::new(PositionalArgumentsFormatter::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_processor_order() {
        let names: Vec<&str> = common_processors().iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "merge_contextvars",
                "add_logger_name",
                "add_log_level",
                "timestamper",
                "unicode_decoder",
                "format_exc_info",
                "positional_arguments_formatter",
            ]
        );
    }

    #[test]
    fn test_closure_is_processor() {
        let step = |_: Option<&LoggerHandle>, _: &str, mut event: EventDict| -> ProcessResult {
            event.insert("seen", true);
            Ok(event)
        };
        let event = step.process(None, "info", EventDict::new()).unwrap();
        assert_eq!(event.get("seen"), Some(&crate::event::FieldValue::Bool(true)));
        assert_eq!(Processor::name(&step), "custom");
    }
}
