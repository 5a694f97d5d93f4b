//! The event mapping built up by the enrichment chain.

use std::collections::btree_map::{self, BTreeMap};

use serde::Serialize;

use super::value::FieldValue;

/// Message key.
pub const EVENT_KEY: &str = "event";
pub const LEVEL_KEY: &str = "level";
pub const LOGGER_KEY: &str = "logger";
pub const TIMESTAMP_KEY: &str = "timestamp";
pub const EXC_INFO_KEY: &str = "exc_info";
pub const EXCEPTION_KEY: &str = "exception";
pub const POSITIONAL_ARGS_KEY: &str = "positional_args";

/// Bookkeeping: the originating record, as a map.
pub const RECORD_KEY: &str = "_record";
/// Bookkeeping: whether the event came through the structured front-end.
pub const FROM_STRUCTURED_KEY: &str = "_from_structured";
/// Record key-value holding a severity `log` has no level for.
pub const SEVERITY_KEY: &str = "_level";

/// Keys inside a `_record` map.
pub mod record {
    pub const NAME: &str = "name";
    pub const LEVEL: &str = "level";
    pub const MODULE: &str = "module";
    pub const FILE: &str = "file";
    pub const LINE: &str = "line";
    pub const EXTRA: &str = "extra";
}

/// Field mapping of one log event.
///
/// Keys are unique and kept sorted, so re-applying a step overwrites its
/// field instead of adding a second copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventDict {
    fields: BTreeMap<String, FieldValue>,
}

impl EventDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Event with only the message set.
    pub fn with_message(message: impl Into<String>) -> Self {
        let message: String = message.into();
        let mut event = Self::new();
        event.insert(EVENT_KEY, message);
        event
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Insert only when the key is absent.
    pub fn insert_default(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.entry(key.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, FieldValue> {
        self.fields.iter_mut()
    }

    /// The message, if it is text.
    pub fn message(&self) -> Option<&str> {
        self.get_str(EVENT_KEY)
    }

    /// Name stored in the attached `_record`, if any.
    pub fn record_name(&self) -> Option<&str> {
        self.get(RECORD_KEY)
            .and_then(FieldValue::as_map)
            .and_then(|r| r.get(record::NAME))
            .and_then(FieldValue::as_str)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for EventDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut event = EventDict::new();
        event.extend(iter);
        event
    }
}

impl<K: Into<String>, V: Into<FieldValue>> Extend<(K, V)> for EventDict {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for EventDict {
    type Item = (String, FieldValue);
    type IntoIter = btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a EventDict {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
