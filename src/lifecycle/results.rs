//! Append-only log of task outcomes.

use super::types::TaskResult;
use crate::phase::Phase;

/// Accumulates results across every phase run, in execution order.
///
/// Entries are never reordered, deduplicated or pruned. Readers always get
/// an independent copy.
#[derive(Debug, Default)]
pub struct ResultTracker {
    results: Vec<TaskResult>,
}

impl ResultTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, result: TaskResult) {
        self.results.push(result);
    }

    /// Copy of every recorded result.
    pub fn results(&self) -> Vec<TaskResult> {
        self.results.clone()
    }

    /// Copy of the results recorded for one phase.
    pub fn results_for(&self, phase: Phase) -> Vec<TaskResult> {
        self.results
            .iter()
            .filter(|r| r.phase == phase)
            .cloned()
            .collect()
    }

    /// Copy of every failed result.
    pub fn failures(&self) -> Vec<TaskResult> {
        self.results
            .iter()
            .filter(|r| !r.is_success())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
