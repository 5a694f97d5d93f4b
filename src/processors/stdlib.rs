//! Steps that bridge logger and record metadata into the event.

use std::collections::BTreeSet;

use super::{DropEvent, ProcessResult, Processor};
use crate::event::{
    record, EventDict, FieldValue, Level, FROM_STRUCTURED_KEY, LEVEL_KEY, LOGGER_KEY, RECORD_KEY,
};
use crate::pipeline::handle::LoggerHandle;

/// Set `logger` from the attached record, else from the handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddLoggerName;

impl Processor for AddLoggerName {
    fn process(&self, logger: Option<&LoggerHandle>, _method_name: &str, mut event: EventDict) -> ProcessResult {
        let name = event
            .record_name()
            .map(str::to_string)
            .or_else(|| logger.map(|l| l.name().to_string()));
        if let Some(name) = name {
            event.insert(LOGGER_KEY, name);
        }
        Ok(event)
    }

    fn name(&self) -> &'static str {
        "add_logger_name"
    }
}

/// Normalize a method name into the level name written to `level`.
pub fn level_name_for_method(method_name: &str) -> &str {
    match method_name {
        "warn" => "warning",
        "exception" => "error",
        "fatal" => "critical",
        other => other,
    }
}

/// Set `level` from the method name.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddLogLevel;

impl Processor for AddLogLevel {
    fn process(&self, _logger: Option<&LoggerHandle>, method_name: &str, mut event: EventDict) -> ProcessResult {
        event.insert(LEVEL_KEY, level_name_for_method(method_name));
        Ok(event)
    }

    fn name(&self) -> &'static str {
        "add_log_level"
    }
}

/// Drop events the issuing logger is not enabled for.
///
/// Without a handle, or for a method name with no severity, the event passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterByLevel;

impl Processor for FilterByLevel {
    fn process(&self, logger: Option<&LoggerHandle>, method_name: &str, event: EventDict) -> ProcessResult {
        match (logger, Level::from_method_name(method_name)) {
            (Some(handle), Some(level)) if !handle.is_enabled_for(level) => Err(DropEvent),
            _ => Ok(event),
        }
    }

    fn name(&self) -> &'static str {
        "filter_by_level"
    }
}

/// Copy the record's key/values into the event.
///
/// Keys the event already has (the message and bookkeeping) are kept, the
/// same precedence the structured front-end gives its message over fields.
#[derive(Debug, Clone, Default)]
pub struct ExtraAdder {
    allow: Option<BTreeSet<String>>,
}

impl ExtraAdder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only copy the listed keys.
    pub fn allow<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow: Some(keys.into_iter().map(Into::into).collect()),
        }
    }
}

impl Processor for ExtraAdder {
    fn process(&self, _logger: Option<&LoggerHandle>, _method_name: &str, mut event: EventDict) -> ProcessResult {
        let extra = event
            .get(RECORD_KEY)
            .and_then(FieldValue::as_map)
            .and_then(|r| r.get(record::EXTRA))
            .and_then(FieldValue::as_map)
            .cloned();

        if let Some(extra) = extra {
            for (key, value) in extra {
                let allowed = self.allow.as_ref().map_or(true, |allow| allow.contains(&key));
                if allowed {
                    event.insert_default(key, value);
                }
            }
        }
        Ok(event)
    }

    fn name(&self) -> &'static str {
        "extra_adder"
    }
}

/// Strip the `_record` and `_from_structured` bookkeeping keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveProcessorsMeta;

impl Processor for RemoveProcessorsMeta {
    fn process(&self, _logger: Option<&LoggerHandle>, _method_name: &str, mut event: EventDict) -> ProcessResult {
        event.remove(RECORD_KEY);
        event.remove(FROM_STRUCTURED_KEY);
        Ok(event)
    }

    fn name(&self) -> &'static str {
        "remove_processors_meta"
    }
}
