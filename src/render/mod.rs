//! Final rendering and output.
//!
//! - `formatter` - shared tail of both front-ends
//! - `console` - colorized key/value lines
//! - `json` - JSON lines
//! - `sink` - where rendered lines go

pub mod console;
pub mod formatter;
pub mod json;
pub mod sink;

use crate::event::EventDict;

pub use self::console::ConsoleRenderer;
pub use formatter::ProcessorFormatter;
pub use json::JsonRenderer;
pub use sink::{ConsoleSink, MemorySink, Sink, Stream};

/// Turns a finished event into one output line.
pub trait Renderer: Send + Sync {
    fn render(&self, event: EventDict) -> String;
}
