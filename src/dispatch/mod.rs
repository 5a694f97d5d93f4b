//! The dispatcher: the one place that owns the active configuration.

pub mod system;

pub use system::*;
