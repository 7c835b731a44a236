//! Phase → task registry.

use super::types::LifecycleTask;
use crate::phase::Phase;
use std::collections::HashMap;

/// Owns the ordered task list of every phase.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: HashMap<Phase, Vec<LifecycleTask>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to a phase, creating the phase entry on first use.
    ///
    /// Duplicate ids are accepted; both tasks run.
    pub fn register(&mut self, phase: Phase, task: LifecycleTask) {
        self.tasks.entry(phase).or_default().push(task);
    }

    /// Tasks registered for a phase, in registration order.
    pub fn tasks_for(&self, phase: Phase) -> &[LifecycleTask] {
        self.tasks.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if any tasks are registered for a phase.
    pub fn has_tasks_for(&self, phase: Phase) -> bool {
        !self.tasks_for(phase).is_empty()
    }

    /// Number of tasks registered for a phase.
    pub fn task_count(&self, phase: Phase) -> usize {
        self.tasks_for(phase).len()
    }

    /// Phases with at least one task, in canonical order.
    pub fn phases(&self) -> Vec<Phase> {
        let mut phases: Vec<Phase> = self
            .tasks
            .iter()
            .filter(|(_, tasks)| !tasks.is_empty())
            .map(|(phase, _)| *phase)
            .collect();
        phases.sort();
        phases
    }
}
