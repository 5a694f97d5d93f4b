//! Diagnostics for the logging system itself.
//!
//! Provides the system context and `diag_*!` macros used to report
//! configuration transitions.

pub mod structured;

pub use structured::*;
