//! Lifecycle coordinator façade.
//!
//! The `LifecycleCoordinator` is the main entry point. One instance is
//! built per host lifetime; it owns the task registry, the phase runner and
//! the result log, so no lifecycle state lives in globals.

use super::collaborators::{FailureNotifier, Logger, Tracer};
use super::registry::TaskRegistry;
use super::results::ResultTracker;
use super::runner::PhaseRunner;
use super::types::{LifecycleTask, TaskDiagnostics, TaskResult};
use crate::errors::TaskError;
use crate::phase::Phase;
use crate::telemetry::{LoggingNotifier, TracingLogger, TracingTracer};
use std::sync::Arc;

/// Registers tasks into phases and runs phases on demand.
pub struct LifecycleCoordinator {
    registry: TaskRegistry,
    runner: PhaseRunner,
    results: ResultTracker,
}

impl LifecycleCoordinator {
    /// Create a coordinator with explicit collaborators and default diagnostics.
    pub fn new(
        tracer: Arc<dyn Tracer>,
        logger: Arc<dyn Logger>,
        notifier: Arc<dyn FailureNotifier>,
    ) -> Self {
        Self::builder()
            .tracer(tracer)
            .logger(logger)
            .notifier(notifier)
            .build()
    }

    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::default()
    }

    /// Append a task to a phase.
    ///
    /// Registrations are durable: every later `run_phase` call for the phase
    /// runs the task again.
    pub fn register_task(&mut self, phase: Phase, task: LifecycleTask) {
        tracing::trace!(phase = %phase, task_id = %task.id, optional = task.optional, "Registered lifecycle task");
        self.registry.register(phase, task);
    }

    /// Run every task registered for `phase`, one at a time.
    ///
    /// Optional task failures are absorbed. The first required task failure
    /// stops the phase and is returned unchanged, after it has been traced,
    /// recorded, logged and reported. Completed tasks are not rolled back.
    pub async fn run_phase(&mut self, phase: Phase) -> Result<(), TaskError> {
        let tasks = self.registry.tasks_for(phase);
        self.runner.run(phase, tasks, &mut self.results).await
    }

    /// Copy of every result recorded so far, in execution order.
    pub fn results(&self) -> Vec<TaskResult> {
        self.results.results()
    }

    /// Copy of the results recorded for one phase.
    pub fn results_for(&self, phase: Phase) -> Vec<TaskResult> {
        self.results.results_for(phase)
    }

    /// Copy of every failed result.
    pub fn failures(&self) -> Vec<TaskResult> {
        self.results.failures()
    }

    /// Tasks registered for a phase, in registration order.
    pub fn tasks_for(&self, phase: Phase) -> &[LifecycleTask] {
        self.registry.tasks_for(phase)
    }

    /// Check if any tasks are registered for a phase.
    pub fn has_tasks_for(&self, phase: Phase) -> bool {
        self.registry.has_tasks_for(phase)
    }

    /// Number of tasks registered for a phase.
    pub fn task_count(&self, phase: Phase) -> usize {
        self.registry.task_count(phase)
    }

    /// Phases with at least one task, in canonical order.
    pub fn phases(&self) -> Vec<Phase> {
        self.registry.phases()
    }

    /// Diagnostics applied to tasks that declare none.
    pub fn default_diagnostics(&self) -> TaskDiagnostics {
        self.runner.default_diagnostics()
    }
}

impl Default for LifecycleCoordinator {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for `LifecycleCoordinator`.
///
/// Collaborators left unset fall back to the `tracing`-backed adapters in
/// `crate::telemetry`.
#[derive(Default)]
pub struct CoordinatorBuilder {
    tracer: Option<Arc<dyn Tracer>>,
    logger: Option<Arc<dyn Logger>>,
    notifier: Option<Arc<dyn FailureNotifier>>,
    default_diagnostics: Option<TaskDiagnostics>,
}

impl CoordinatorBuilder {
    pub fn tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn FailureNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Override the diagnostics used for tasks that declare none.
    pub fn default_diagnostics(mut self, diagnostics: TaskDiagnostics) -> Self {
        self.default_diagnostics = Some(diagnostics);
        self
    }

    pub fn build(self) -> LifecycleCoordinator {
        let runner = PhaseRunner::new(
            self.tracer.unwrap_or_else(|| Arc::new(TracingTracer)),
            self.logger.unwrap_or_else(|| Arc::new(TracingLogger)),
            self.notifier.unwrap_or_else(|| Arc::new(LoggingNotifier)),
            self.default_diagnostics.unwrap_or_default(),
        );

        LifecycleCoordinator {
            registry: TaskRegistry::new(),
            runner,
            results: ResultTracker::new(),
        }
    }
}
