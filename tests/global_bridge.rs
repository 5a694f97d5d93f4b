//! Installs the process-wide `log` logger, so everything lives in one test.

use std::sync::Arc;

use logbridge_core::{
    configure_logging_with, legacy_logger, ConfigurationError, LogFacade, LoggingSettings, LoggingSystem,
    MemorySink,
};

#[test]
fn test_global_bridge_routes_log_macros() {
    let sink = Arc::new(MemorySink::new());
    let settings = LoggingSettings {
        colors: false,
        filters: Some("noisy=error".to_string()),
        ..LoggingSettings::with_level("INFO")
    };
    let system = configure_logging_with(&settings, None, LoggingSystem::new(sink.clone())).unwrap();
    assert_eq!(log::max_level(), log::LevelFilter::Info);
    sink.take();

    log::debug!(target: "svc", "hidden");
    assert!(sink.is_empty());

    log::info!(target: "svc", count = 3; "ready");
    let lines = sink.take();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[info"));
    assert!(lines[0].contains("ready"));
    assert!(lines[0].ends_with("[svc] count=3"));

    log::warn!(target: "noisy", "suppressed by directive");
    log::error!(target: "noisy", "kept");
    let lines = sink.take();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("kept"));

    legacy_logger("named").warning("through the global logger");
    assert_eq!(sink.take().len(), 1);

    system.get_logger("svc").info("structured");
    assert_eq!(sink.take().len(), 1);

    let second = LoggingSystem::new(Arc::new(MemorySink::new()));
    second.configure_standard(&settings).unwrap();
    assert!(matches!(
        second.install_legacy_bridge(),
        Err(ConfigurationError::LegacyInstall(_))
    ));
}
