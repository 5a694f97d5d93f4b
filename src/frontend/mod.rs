//! Front-ends.
//!
//! - `facade` - the method surface both loggers share
//! - `structured` - bound-context loggers running the structured chain
//! - `legacy` - the `log` facade bridge and named `log` loggers

pub mod facade;
pub mod legacy;
pub mod structured;

pub use facade::{Fields, LogFacade};
pub use legacy::{LegacyBridge, LegacyLogger};
pub use structured::BoundLogger;
