//! Logging configuration.
//!
//! - `settings` - user-facing settings (code, JSON, environment)
//! - `error` - configuration errors

pub mod error;
pub mod settings;

pub use error::*;
pub use settings::*;
