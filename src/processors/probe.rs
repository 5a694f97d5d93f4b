//! Logger-handle diagnostics.

use std::sync::Arc;

use super::{ProcessResult, Processor};
use crate::event::EventDict;
use crate::pipeline::handle::LoggerHandle;
use crate::render::sink::{ConsoleSink, Sink};

/// Report which logger handle reached this point of the chain.
///
/// Writes `logger argument is <handle>` (or `None`) to its own sink and
/// passes the event through untouched.
#[derive(Clone)]
pub struct LoggerProbe {
    out: Arc<dyn Sink>,
}

impl Default for LoggerProbe {
    fn default() -> Self {
        Self::new(Arc::new(ConsoleSink::stdout()))
    }
}

impl LoggerProbe {
    pub fn new(out: Arc<dyn Sink>) -> Self {
        Self { out }
    }

    pub fn describe(logger: Option<&LoggerHandle>) -> String {
        match logger {
            Some(handle) => format!("logger argument is {}", handle),
            None => "logger argument is None".to_string(),
        }
    }
}

impl Processor for LoggerProbe {
    fn process(&self, logger: Option<&LoggerHandle>, _method_name: &str, event: EventDict) -> ProcessResult {
        self.out.write_line(&Self::describe(logger));
        Ok(event)
    }

    fn name(&self) -> &'static str {
        "logger_probe"
    }
}
