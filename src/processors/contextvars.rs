//! Thread-bound context variables.
//!
//! Values bound here are merged into every event emitted from the same
//! thread, through either front-end.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{ProcessResult, Processor};
use crate::event::{EventDict, FieldValue};
use crate::pipeline::handle::LoggerHandle;

thread_local! {
    static CONTEXT: RefCell<BTreeMap<String, FieldValue>> = RefCell::new(BTreeMap::new());
}

/// Bind values for the current thread.
pub fn bind_contextvars<K, V, I>(values: I)
where
    K: Into<String>,
    V: Into<FieldValue>,
    I: IntoIterator<Item = (K, V)>,
{
    CONTEXT.with(|ctx| {
        let mut ctx = ctx.borrow_mut();
        for (key, value) in values {
            ctx.insert(key.into(), value.into());
        }
    });
}

pub fn unbind_contextvars<'a, I>(keys: I)
where
    I: IntoIterator<Item = &'a str>,
{
    CONTEXT.with(|ctx| {
        let mut ctx = ctx.borrow_mut();
        for key in keys {
            ctx.remove(key);
        }
    });
}

pub fn clear_contextvars() {
    CONTEXT.with(|ctx| ctx.borrow_mut().clear());
}

/// Snapshot of the values bound on this thread.
pub fn get_contextvars() -> EventDict {
    CONTEXT.with(|ctx| {
        ctx.borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    })
}

/// Bind values until the returned guard drops, then restore what was there.
pub fn bound_contextvars<K, V, I>(values: I) -> ContextGuard
where
    K: Into<String>,
    V: Into<FieldValue>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut previous = Vec::new();
    CONTEXT.with(|ctx| {
        let mut ctx = ctx.borrow_mut();
        for (key, value) in values {
            let key = key.into();
            let old = ctx.insert(key.clone(), value.into());
            previous.push((key, old));
        }
    });
    ContextGuard { previous }
}

/// Restores context variables on drop.
#[must_use = "the values are unbound as soon as the guard drops"]
pub struct ContextGuard {
    previous: Vec<(String, Option<FieldValue>)>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CONTEXT.with(|ctx| {
            let mut ctx = ctx.borrow_mut();
            for (key, old) in self.previous.drain(..).rev() {
                match old {
                    Some(value) => ctx.insert(key, value),
                    None => ctx.remove(&key),
                };
            }
        });
    }
}

/// Merge the thread's context variables into the event.
///
/// Keys already present in the event win.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeContextVars;

impl Processor for MergeContextVars {
    fn process(&self, _logger: Option<&LoggerHandle>, _method_name: &str, mut event: EventDict) -> ProcessResult {
        CONTEXT.with(|ctx| {
            for (key, value) in ctx.borrow().iter() {
                event.insert_default(key.clone(), value.clone());
            }
        });
        Ok(event)
    }

    fn name(&self) -> &'static str {
        "merge_contextvars"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_event_wins() {
        clear_contextvars();
        bind_contextvars([("request_id", "r-1"), ("user", "ctx-user")]);

        let mut event = EventDict::with_message("hi");
        event.insert("user", "event-user");
        let event = MergeContextVars.process(None, "info", event).unwrap();

        assert_eq!(event.get_str("request_id"), Some("r-1"));
        assert_eq!(event.get_str("user"), Some("event-user"));
        clear_contextvars();
    }

    #[test]
    fn test_guard_restores_previous_values() {
        clear_contextvars();
        bind_contextvars([("stage", "outer")]);
        {
            let _guard = bound_contextvars([("stage", "inner"), ("extra", "x")]);
            let ctx = get_contextvars();
            assert_eq!(ctx.get_str("stage"), Some("inner"));
            assert_eq!(ctx.get_str("extra"), Some("x"));
        }
        let ctx = get_contextvars();
        assert_eq!(ctx.get_str("stage"), Some("outer"));
        assert!(!ctx.contains_key("extra"));
        clear_contextvars();
    }

    #[test]
    fn test_unbind() {
        clear_contextvars();
        bind_contextvars([("a", 1), ("b", 2)]);
        unbind_contextvars(["a"]);
        let ctx = get_contextvars();
        assert!(!ctx.contains_key("a"));
        assert!(ctx.contains_key("b"));
        clear_contextvars();
    }

    #[test]
    fn test_context_is_thread_local() {
        clear_contextvars();
        bind_contextvars([("thread", "main")]);
        let other = std::thread::spawn(|| get_contextvars().is_empty())
            .join()
            .unwrap();
        assert!(other);
        clear_contextvars();
    }
}
