//! Pipeline composition.
//!
//! - `handle` - logger handles passed to every step
//! - `chain` - ordered step composition
//! - `config` - the shared step list and the adapter chains built on it

pub mod chain;
pub mod config;
pub mod handle;

pub use chain::*;
pub use config::*;
pub use handle::*;
