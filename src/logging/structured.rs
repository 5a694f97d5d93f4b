//! Diagnostics for the logging system itself.
//!
//! Configuration transitions are reported through the `log` facade with the
//! system id (and configuration generation) in every message, so output from
//! several systems in one process can be told apart.

use std::fmt;

use uuid::Uuid;

/// Target used for the crate's own diagnostics.
pub const DIAGNOSTICS_TARGET: &str = "logbridge_core";

/// Identity of one logging system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemContext {
    pub system_id: String,
    pub generation: Option<u64>,
}

impl SystemContext {
    pub fn new() -> Self {
        Self {
            system_id: format!("logsys-{}", &Uuid::new_v4().to_string()[..8]),
            generation: None,
        }
    }

    pub fn with_generation(&self, generation: u64) -> Self {
        Self {
            system_id: self.system_id.clone(),
            generation: Some(generation),
        }
    }
}

impl Default for SystemContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SystemContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.generation {
            Some(generation) => write!(f, "[system={}] [gen={}]", self.system_id, generation),
            None => write!(f, "[system={}]", self.system_id),
        }
    }
}

/// Log an info diagnostic with context.
#[macro_export]
macro_rules! diag_info {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::info!(
            target: $crate::logging::structured::DIAGNOSTICS_TARGET,
            concat!("{} {}" $(, " ", stringify!($key), "={:?}")*),
            $ctx,
            $event
            $(, $value)*
        );
    };
}

/// Log a warning diagnostic with context.
#[macro_export]
macro_rules! diag_warn {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::warn!(
            target: $crate::logging::structured::DIAGNOSTICS_TARGET,
            concat!("{} {}" $(, " ", stringify!($key), "={:?}")*),
            $ctx,
            $event
            $(, $value)*
        );
    };
}

/// Log a debug diagnostic with context.
#[macro_export]
macro_rules! diag_debug {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::debug!(
            target: $crate::logging::structured::DIAGNOSTICS_TARGET,
            concat!("{} {}" $(, " ", stringify!($key), "={:?}")*),
            $ctx,
            $event
            $(, $value)*
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_context_display() {
        let ctx = SystemContext::new();
        assert!(ctx.system_id.starts_with("logsys-"));
        assert_eq!(ctx.system_id.len(), "logsys-".len() + 8);
        assert_eq!(format!("{}", ctx), format!("[system={}]", ctx.system_id));

        let with_gen = ctx.with_generation(2);
        assert_eq!(
            format!("{}", with_gen),
            format!("[system={}] [gen=2]", ctx.system_id)
        );
    }

    #[test]
    fn test_macros_expand_with_and_without_fields() {
        let ctx = SystemContext::new();
        diag_debug!(ctx, "NO_FIELDS");
        diag_info!(ctx, "WITH_FIELDS", level = "INFO", frozen = false);
        diag_warn!(ctx, "TRAILING_COMMA", attempts = 1,);
    }
}
