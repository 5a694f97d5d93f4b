//! The formatter both front-ends hand their events to.
//!
//! Structured events arrive already enriched. Legacy `log` records arrive raw
//! and go through the foreign pre-chain first. From there both paths share
//! the same formatter-side steps, handler threshold and renderer.

use std::collections::BTreeMap;

use log::kv::{self, Source, VisitSource};

use super::Renderer;
use crate::event::{
    record, EventDict, ExceptionInfo, FieldValue, Level, EVENT_KEY, FROM_STRUCTURED_KEY, RECORD_KEY,
    SEVERITY_KEY,
};
use crate::pipeline::chain::Chain;
use crate::pipeline::handle::LoggerHandle;

pub struct ProcessorFormatter {
    foreign_pre_chain: Chain,
    processors: Chain,
    renderer: Box<dyn Renderer>,
    min_level: Level,
}

impl ProcessorFormatter {
    pub fn new(
        foreign_pre_chain: Chain,
        processors: Chain,
        renderer: Box<dyn Renderer>,
        min_level: Level,
    ) -> Self {
        Self {
            foreign_pre_chain,
            processors,
            renderer,
            min_level,
        }
    }

    pub fn foreign_pre_chain(&self) -> &Chain {
        &self.foreign_pre_chain
    }

    pub fn processors(&self) -> &Chain {
        &self.processors
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Format a legacy record.
    ///
    /// `logger` is whatever the caller threads through; the legacy bridge
    /// passes `None` unless told otherwise.
    pub fn format_record(&self, rec: &log::Record<'_>, logger: Option<&LoggerHandle>) -> Option<String> {
        let level = record_level(rec);
        if level < self.min_level {
            return None;
        }
        let method_name = level.as_str();
        let event = self
            .foreign_pre_chain
            .apply(logger, method_name, record_event(rec))?;
        self.finish(logger, method_name, event)
    }

    /// Format an event that already went through the structured chain.
    pub fn format_structured(&self, logger: &LoggerHandle, method_name: &str, mut event: EventDict) -> Option<String> {
        if Level::from_method_name(method_name).is_some_and(|level| level < self.min_level) {
            return None;
        }
        event.insert(RECORD_KEY, structured_record(logger, method_name));
        event.insert(FROM_STRUCTURED_KEY, true);
        self.finish(Some(logger), method_name, event)
    }

    fn finish(&self, logger: Option<&LoggerHandle>, method_name: &str, event: EventDict) -> Option<String> {
        let event = self.processors.apply(logger, method_name, event)?;
        Some(self.renderer.render(event))
    }
}

/// Severity of a `log` record, preferring an attached `_level` over the
/// record's own level.
pub fn record_level(rec: &log::Record<'_>) -> Level {
    rec.key_values()
        .get(kv::Key::from_str(SEVERITY_KEY))
        .and_then(|value| value.to_borrowed_str().and_then(Level::from_method_name))
        .unwrap_or_else(|| Level::from(rec.level()))
}

/// Raw event for a `log` record: the message plus `_record` bookkeeping.
pub fn record_event(rec: &log::Record<'_>) -> EventDict {
    let mut collector = ExtraCollector::default();
    let _ = rec.key_values().visit(&mut collector);

    let mut meta = BTreeMap::new();
    meta.insert(record::NAME.to_string(), FieldValue::from(rec.target()));
    meta.insert(
        record::LEVEL.to_string(),
        FieldValue::from(record_level(rec).as_str()),
    );
    meta.insert(record::MODULE.to_string(), FieldValue::from(rec.module_path()));
    meta.insert(record::FILE.to_string(), FieldValue::from(rec.file()));
    meta.insert(record::LINE.to_string(), FieldValue::from(rec.line()));
    meta.insert(record::EXTRA.to_string(), FieldValue::Map(collector.0));

    let mut event = EventDict::new();
    event.insert(EVENT_KEY, rec.args().to_string());
    event.insert(RECORD_KEY, meta);
    event.insert(FROM_STRUCTURED_KEY, false);
    event
}

fn structured_record(logger: &LoggerHandle, method_name: &str) -> BTreeMap<String, FieldValue> {
    let mut meta = BTreeMap::new();
    meta.insert(record::NAME.to_string(), FieldValue::from(logger.name()));
    meta.insert(record::LEVEL.to_string(), FieldValue::from(method_name));
    meta
}

#[derive(Default)]
struct ExtraCollector(BTreeMap<String, FieldValue>);

impl<'kvs> VisitSource<'kvs> for ExtraCollector {
    fn visit_pair(&mut self, key: kv::Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        if key.as_str() == SEVERITY_KEY {
            return Ok(());
        }
        self.0.insert(key.as_str().to_string(), field_from_kv(&value));
        Ok(())
    }
}

/// Convert a record key/value into a field value without losing errors or
/// nested structure.
pub fn field_from_kv(value: &kv::Value<'_>) -> FieldValue {
    if let Some(err) = value.to_borrowed_error() {
        return FieldValue::Exception(ExceptionInfo::from_error(err));
    }
    if let Some(s) = value.to_borrowed_str() {
        return FieldValue::from(s);
    }
    if let Some(b) = value.to_bool() {
        return FieldValue::Bool(b);
    }
    if let Some(i) = value.to_i64() {
        return FieldValue::Int(i);
    }
    if let Some(u) = value.to_u64() {
        return FieldValue::from(u);
    }
    if let Some(f) = value.to_f64() {
        return FieldValue::Float(f);
    }
    match serde_json::to_value(value) {
        Ok(json) => FieldValue::from(json),
        Err(_) => FieldValue::Str(value.to_string()),
    }
}
