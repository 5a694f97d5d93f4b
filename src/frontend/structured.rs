//! The structured front-end.
//!
//! A [`BoundLogger`] carries a logger name and a bound context. Each call
//! builds an event from the context, the call's fields and the message, runs
//! the structured chain with a real logger handle, and hands the result to
//! the shared formatter.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::facade::{Fields, LogFacade};
use crate::dispatch::system::LoggingSystem;
use crate::event::{EventDict, ExceptionInfo, FieldValue, Level, EVENT_KEY, EXC_INFO_KEY, POSITIONAL_ARGS_KEY};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::handle::LoggerHandle;

#[derive(Clone)]
struct Resolved {
    config: Arc<PipelineConfig>,
    handle: LoggerHandle,
}

/// Structured logger with an immutable bound context.
///
/// `bind` and friends return new loggers; the receiver is never changed.
/// Loggers derived from one another share the first-use cache, so once any
/// of them has emitted under a caching configuration they all keep that
/// configuration.
#[derive(Clone)]
pub struct BoundLogger {
    system: Arc<LoggingSystem>,
    name: String,
    context: EventDict,
    cached: Arc<OnceLock<Resolved>>,
}

impl BoundLogger {
    pub(crate) fn new(system: Arc<LoggingSystem>, name: &str) -> Self {
        Self {
            system,
            name: name.to_string(),
            context: EventDict::new(),
            cached: Arc::new(OnceLock::new()),
        }
    }

    pub fn context(&self) -> &EventDict {
        &self.context
    }

    /// New logger with `values` added to the context.
    pub fn bind<K, V>(&self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut context = self.context.clone();
        context.extend(values);
        self.with_context(context)
    }

    /// New logger without `keys` in the context. Missing keys are ignored.
    pub fn unbind(&self, keys: &[&str]) -> Self {
        let mut context = self.context.clone();
        for key in keys {
            context.remove(key);
        }
        self.with_context(context)
    }

    /// New logger whose context is exactly `values`.
    pub fn rebind<K, V>(&self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.with_context(values.into_iter().collect())
    }

    fn with_context(&self, context: EventDict) -> Self {
        Self {
            system: Arc::clone(&self.system),
            name: self.name.clone(),
            context,
            cached: Arc::clone(&self.cached),
        }
    }

    /// The handle steps will see, without triggering first-use caching.
    pub fn handle(&self) -> LoggerHandle {
        match self.cached.get() {
            Some(resolved) => resolved.handle.clone(),
            None => self.system.current().logger_handle(&self.name),
        }
    }

    /// Log a `%`-style template; `args` fill its placeholders.
    pub fn log_args(&self, level: Level, template: &str, args: Vec<FieldValue>, fields: Fields) {
        self.emit(level.as_str(), template, fields, |event| {
            event.insert(POSITIONAL_ARGS_KEY, FieldValue::List(args));
        });
    }

    /// Log at error level with `err` attached as the event's exception.
    pub fn exception<E: Error + ?Sized>(&self, message: &str, err: &E) {
        let info = ExceptionInfo::capture(err);
        self.emit("exception", message, Fields::new(), |event| {
            event.insert(EXC_INFO_KEY, info);
        });
    }

    fn resolve(&self) -> Resolved {
        if let Some(resolved) = self.cached.get() {
            return resolved.clone();
        }
        let (config, cache) = self.system.acquire_for_emission();
        let handle = config.logger_handle(&self.name);
        let resolved = Resolved { config, handle };
        if cache {
            return self.cached.get_or_init(|| resolved).clone();
        }
        resolved
    }

    fn emit(&self, method_name: &str, message: &str, fields: Fields, extend: impl FnOnce(&mut EventDict)) {
        let Resolved { config, handle } = self.resolve();

        let mut event = self.context.clone();
        event.extend(fields);
        extend(&mut event);
        event.insert(EVENT_KEY, message);

        let Some(event) = config.structured_chain().apply(Some(&handle), method_name, event) else {
            return;
        };
        if let Some(line) = config.formatter().format_structured(&handle, method_name, event) {
            self.system.emit(&line);
        }
    }
}

impl LogFacade for BoundLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, level: Level, message: &str, fields: Fields) {
        self.emit(level.as_str(), message, fields, |_| {});
    }
}

impl fmt::Debug for BoundLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundLogger")
            .field("name", &self.name)
            .field("context", &self.context)
            .finish()
    }
}
