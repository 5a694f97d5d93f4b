use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use logbridge_core::event::{EventDict, RECORD_KEY};
use logbridge_core::{
    Fields, FieldValue, Level, LogFacade, LoggingSettings, LoggingSystem, MemorySink, PipelineConfig,
    RendererKind,
};

const EVENT_KEYS: &[&str] = &[
    "event",
    "level",
    "logger",
    "timestamp",
    "exc_info",
    "exception",
    "positional_args",
    "stack",
];

fn json_system(threshold: Level) -> (Arc<LoggingSystem>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let system = LoggingSystem::new(sink.clone());
    let settings = LoggingSettings {
        renderer: RendererKind::Json,
        ..LoggingSettings::with_level(threshold.as_upper())
    };
    system.configure_standard(&settings).unwrap();
    (system, sink)
}

fn any_level() -> impl Strategy<Value = Level> {
    prop::sample::select(Level::ALL.to_vec())
}

fn field_key() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,7}".prop_filter("event key", |key| !EVENT_KEYS.contains(&key.as_str()))
}

/// Plain keys plus the ones the pipeline itself sets.
fn any_field_key() -> impl Strategy<Value = String> {
    prop_oneof![
        field_key(),
        prop::sample::select(EVENT_KEYS.to_vec()).prop_map(str::to_string),
    ]
}

fn key_set(line: &str) -> BTreeSet<String> {
    let json: serde_json::Value = serde_json::from_str(line).unwrap();
    json.as_object().unwrap().keys().cloned().collect()
}

/// The rendered object without its timestamp.
fn untimed(line: &str) -> serde_json::Value {
    let mut json: serde_json::Value = serde_json::from_str(line).unwrap();
    json.as_object_mut().unwrap().remove("timestamp");
    json
}

proptest! {
    #[test]
    fn threshold_keeps_exactly_levels_at_or_above(threshold in any_level(), level in any_level()) {
        let (system, sink) = json_system(threshold);

        system.get_logger("app").log(level, "m", Fields::new());
        prop_assert_eq!(sink.take().len(), usize::from(level >= threshold));

        system.legacy_logger("app").log(level, "m", Fields::new());
        prop_assert_eq!(sink.take().len(), usize::from(level >= threshold));
    }

    #[test]
    fn front_ends_produce_the_same_keys(
        fields in prop::collection::btree_map(field_key(), "[a-z0-9 ]{0,12}", 0..6),
        level in any_level(),
    ) {
        let (system, sink) = json_system(Level::Debug);
        let fields: Fields = fields
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from(value)))
            .collect();

        system.get_logger("app").log(level, "m", fields.clone());
        system.legacy_logger("app").log(level, "m", fields);

        let lines = sink.take();
        prop_assert_eq!(lines.len(), 2);
        prop_assert_eq!(key_set(&lines[0]), key_set(&lines[1]));
        prop_assert_eq!(untimed(&lines[0])["level"].clone(), serde_json::json!(level.as_str()));
        prop_assert_eq!(untimed(&lines[0]), untimed(&lines[1]));
    }

    #[test]
    fn front_ends_agree_on_colliding_keys(
        fields in prop::collection::btree_map(any_field_key(), "[a-z0-9 ]{0,12}", 0..6),
        level in any_level(),
    ) {
        let (system, sink) = json_system(Level::Debug);
        let fields: Fields = fields
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from(value)))
            .collect();

        system.get_logger("app").log(level, "m", fields.clone());
        system.legacy_logger("app").log(level, "m", fields);

        let lines = sink.take();
        prop_assert_eq!(lines.len(), 2);
        let structured = untimed(&lines[0]);
        prop_assert_eq!(&structured["event"], &serde_json::json!("m"));
        prop_assert_eq!(structured, untimed(&lines[1]));
    }

    #[test]
    fn shared_chain_is_idempotent(
        fields in prop::collection::btree_map(field_key(), any::<i64>(), 0..6),
        level in any_level(),
    ) {
        let config = PipelineConfig::standard(&LoggingSettings::with_level("DEBUG")).unwrap();
        let handle = config.logger_handle("app");
        let mut event = EventDict::with_message("m");
        event.extend(fields);

        let once = config
            .shared_chain()
            .apply(Some(&handle), level.as_str(), event)
            .unwrap();
        let twice = config
            .shared_chain()
            .apply(Some(&handle), level.as_str(), once.clone())
            .unwrap();

        prop_assert!(once.contains_key("timestamp"));
        prop_assert_eq!(once.get("level"), Some(&FieldValue::from(level.as_str())));
        prop_assert_eq!(
            once.keys().collect::<Vec<_>>(),
            twice.keys().collect::<Vec<_>>()
        );
        prop_assert_eq!(once.get("level"), twice.get("level"));
        prop_assert!(!twice.contains_key(RECORD_KEY));
    }
}
