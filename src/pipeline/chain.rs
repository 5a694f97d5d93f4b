//! Ordered composition of enrichment steps.

use std::fmt;

use crate::event::EventDict;
use crate::pipeline::handle::LoggerHandle;
use crate::processors::SharedProcessor;

/// An ordered list of steps applied left to right.
#[derive(Clone, Default)]
pub struct Chain {
    steps: Vec<SharedProcessor>,
}

impl Chain {
    pub fn new(steps: Vec<SharedProcessor>) -> Self {
        Self { steps }
    }

    /// Adapter-specific pre-steps followed by the shared list.
    pub fn compose(pre: Vec<SharedProcessor>, shared: &[SharedProcessor]) -> Self {
        let mut steps = pre;
        steps.extend(shared.iter().cloned());
        Self { steps }
    }

    /// Run every step in order.
    ///
    /// Returns `None` when a step drops the event; nothing after it runs.
    pub fn apply(
        &self,
        logger: Option<&LoggerHandle>,
        method_name: &str,
        event: EventDict,
    ) -> Option<EventDict> {
        self.steps
            .iter()
            .try_fold(event, |event, step| step.process(logger, method_name, event))
            .ok()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn steps(&self) -> &[SharedProcessor] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether `other` ends with exactly this chain's steps, instance for
    /// instance.
    pub fn is_suffix_of(&self, other: &Chain) -> bool {
        other.steps.len() >= self.steps.len()
            && other.steps[other.steps.len() - self.steps.len()..]
                .iter()
                .zip(&self.steps)
                .all(|(a, b)| std::sync::Arc::ptr_eq(a, b))
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
