//! The legacy front-end: the `log` facade.
//!
//! [`LegacyBridge`] is the `log::Log` implementation that routes records
//! through the foreign pre-chain. [`LegacyLogger`] is a named logger with the
//! same method surface as the structured front-end, producing plain `log`
//! records.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use log::kv;

use super::facade::{Fields, LogFacade};
use crate::dispatch::system::LoggingSystem;
use crate::event::{ExceptionInfo, FieldValue, Level, EXC_INFO_KEY, SEVERITY_KEY};
use crate::pipeline::handle::LoggerHandle;
use crate::render::formatter::record_level;

/// `log::Log` implementation feeding a [`LoggingSystem`].
///
/// Records carry no logger handle of their own, so steps see `None` unless
/// one is attached with [`with_logger`](Self::with_logger).
pub struct LegacyBridge {
    system: Arc<LoggingSystem>,
    logger: Option<LoggerHandle>,
}

impl LegacyBridge {
    pub fn new(system: Arc<LoggingSystem>) -> Self {
        Self { system, logger: None }
    }

    /// Pass `logger` to every step for records going through this bridge.
    pub fn with_logger(mut self, logger: LoggerHandle) -> Self {
        self.logger = Some(logger);
        self
    }
}

impl log::Log for LegacyBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.system
            .current()
            .accepts(metadata.target(), Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        let config = self.system.current();
        if !config.accepts(record.target(), record_level(record)) {
            return;
        }
        if let Some(line) = config.formatter().format_record(record, self.logger.as_ref()) {
            self.system.emit(&line);
        }
    }

    fn flush(&self) {
        self.system.flush();
    }
}

enum Backend {
    Global,
    Direct(Arc<dyn log::Log>),
}

/// Named logger on the `log` facade.
///
/// `critical` is reported at `log`'s highest level, `Error`, with the exact
/// severity attached so the formatter still renders it as critical.
pub struct LegacyLogger {
    name: String,
    backend: Backend,
}

impl LegacyLogger {
    /// Logger that goes through the process-wide `log` logger.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            backend: Backend::Global,
        }
    }

    /// Logger that hands records to `backend` directly.
    pub fn with_backend(name: &str, backend: Arc<dyn log::Log>) -> Self {
        Self {
            name: name.to_string(),
            backend: Backend::Direct(backend),
        }
    }

    /// Log at error level with `err` attached as `exc_info`.
    pub fn exception(&self, message: &str, err: &(dyn Error + 'static)) {
        let info = ExceptionInfo::from_error(err);
        self.log(
            Level::Error,
            message,
            vec![(EXC_INFO_KEY.to_string(), FieldValue::Exception(info))],
        );
    }

    fn logger(&self) -> &dyn log::Log {
        match &self.backend {
            Backend::Global => log::logger(),
            Backend::Direct(backend) => backend.as_ref(),
        }
    }
}

impl LogFacade for LegacyLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, level: Level, message: &str, fields: Fields) {
        let log_level = level.to_log();
        if matches!(self.backend, Backend::Global) && log_level > log::max_level() {
            return;
        }

        let severity = FieldValue::from(level.as_str());
        let mut kvs: Vec<(&str, &FieldValue)> = fields.iter().map(|(k, v)| (k.as_str(), v)).collect();
        if Level::from(log_level) != level {
            kvs.push((SEVERITY_KEY, &severity));
        }
        self.logger().log(
            &log::Record::builder()
                .args(format_args!("{}", message))
                .level(log_level)
                .target(&self.name)
                .module_path_static(Some(module_path!()))
                .file_static(Some(file!()))
                .line(Some(line!()))
                .key_values(&kvs)
                .build(),
        );
    }
}

impl fmt::Debug for LegacyLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match self.backend {
            Backend::Global => "global",
            Backend::Direct(_) => "direct",
        };
        f.debug_struct("LegacyLogger")
            .field("name", &self.name)
            .field("backend", &backend)
            .finish()
    }
}

/// Bytes, lists and maps cross the `log` boundary through serde, so bytes
/// arrive on the other side as (lossily decoded) text.
impl kv::ToValue for FieldValue {
    fn to_value(&self) -> kv::Value<'_> {
        match self {
            FieldValue::Bool(b) => kv::Value::from(*b),
            FieldValue::Int(i) => kv::Value::from(*i),
            FieldValue::Float(f) => kv::Value::from(*f),
            FieldValue::Str(s) => kv::Value::from(s.as_str()),
            FieldValue::Exception(info) => kv::Value::from_dyn_error(info),
            FieldValue::Null | FieldValue::Bytes(_) | FieldValue::List(_) | FieldValue::Map(_) => {
                kv::Value::from_serde(self)
            }
        }
    }
}
