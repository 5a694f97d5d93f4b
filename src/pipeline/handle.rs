//! Logger handles.

use std::fmt;
use std::sync::Arc;

use crate::event::Level;

/// Opaque reference to the logger that issued a call.
///
/// Cloning is cheap; clones refer to the same logger.
#[derive(Clone)]
pub struct LoggerHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    name: String,
    /// Lowest enabled level; `None` when the logger is switched off.
    level: Option<Level>,
}

impl LoggerHandle {
    pub fn new(name: impl Into<String>, level: Option<Level>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                name: name.into(),
                level,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn level(&self) -> Option<Level> {
        self.inner.level
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        self.inner.level.is_some_and(|min| level >= min)
    }

    /// Whether both handles refer to the same logger instance.
    pub fn same_logger(&self, other: &LoggerHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = self.inner.level.map(|l| l.as_upper()).unwrap_or("OFF");
        write!(f, "<Logger {} ({})>", self.inner.name, level)
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let handle = LoggerHandle::new("testing", Some(Level::Debug));
        assert_eq!(handle.to_string(), "<Logger testing (DEBUG)>");

        let off = LoggerHandle::new("quiet", None);
        assert_eq!(off.to_string(), "<Logger quiet (OFF)>");
    }

    #[test]
    fn test_is_enabled_for() {
        let handle = LoggerHandle::new("app", Some(Level::Warning));
        assert!(!handle.is_enabled_for(Level::Info));
        assert!(handle.is_enabled_for(Level::Warning));
        assert!(handle.is_enabled_for(Level::Critical));
        assert!(!LoggerHandle::new("off", None).is_enabled_for(Level::Critical));
    }

    #[test]
    fn test_clones_share_identity() {
        let handle = LoggerHandle::new("app", Some(Level::Info));
        let clone = handle.clone();
        assert!(handle.same_logger(&clone));
        assert!(!handle.same_logger(&LoggerHandle::new("app", Some(Level::Info))));
    }
}
