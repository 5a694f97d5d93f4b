//! The interface both front-ends expose.

use crate::event::{FieldValue, Level};

/// Key/value pairs attached to a single call.
pub type Fields = Vec<(String, FieldValue)>;

/// Level-named logging methods over a single `log` entry point.
pub trait LogFacade {
    fn name(&self) -> &str;

    fn log(&self, level: Level, message: &str, fields: Fields);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message, Fields::new());
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message, Fields::new());
    }

    fn warning(&self, message: &str) {
        self.log(Level::Warning, message, Fields::new());
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message, Fields::new());
    }

    fn critical(&self, message: &str) {
        self.log(Level::Critical, message, Fields::new());
    }
}

/// Build a [`Fields`] list: `fields!("user" => "alice", "attempt" => 3)`.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::frontend::facade::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        vec![$(($key.to_string(), $crate::event::FieldValue::from($value))),+]
    };
}
