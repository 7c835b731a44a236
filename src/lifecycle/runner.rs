//! Sequential phase execution.
//!
//! The `PhaseRunner` walks one phase's task list in registration order.
//! Every task is wrapped in a trace span and awaited to completion before
//! the next one starts. Failures are always traced, recorded, logged and
//! reported to the notifier; only then does the runner decide whether to
//! continue (optional task) or stop and return the error (required task).

use super::collaborators::{
    COORDINATOR_SOURCE, FailureDetails, FailureNotifier, LogPayload, Logger, Tracer, TraceOptions,
};
use super::results::ResultTracker;
use super::types::{FailureEvent, LifecycleTask, TaskDiagnostics, TaskResult};
use crate::errors::TaskError;
use crate::phase::Phase;
use std::sync::Arc;
use std::time::Instant;

/// Executes phase task lists against the injected collaborators.
pub struct PhaseRunner {
    tracer: Arc<dyn Tracer>,
    logger: Arc<dyn Logger>,
    notifier: Arc<dyn FailureNotifier>,
    default_diagnostics: TaskDiagnostics,
}

impl PhaseRunner {
    pub fn new(
        tracer: Arc<dyn Tracer>,
        logger: Arc<dyn Logger>,
        notifier: Arc<dyn FailureNotifier>,
        default_diagnostics: TaskDiagnostics,
    ) -> Self {
        Self {
            tracer,
            logger,
            notifier,
            default_diagnostics,
        }
    }

    /// Diagnostics applied to tasks that declare none.
    pub fn default_diagnostics(&self) -> TaskDiagnostics {
        self.default_diagnostics
    }

    /// Run `tasks` in order, appending one result per executed task.
    ///
    /// Returns the error of the first required task that fails. Tasks after
    /// it are not run and get no result.
    pub async fn run(
        &self,
        phase: Phase,
        tasks: &[LifecycleTask],
        results: &mut ResultTracker,
    ) -> Result<(), TaskError> {
        if tasks.is_empty() {
            return Ok(());
        }

        tracing::debug!(phase = %phase, tasks = tasks.len(), "Running lifecycle phase");

        for task in tasks {
            if let Err(error) = self.run_task(phase, task, results).await
                && !task.optional
            {
                tracing::debug!(phase = %phase, task_id = %task.id, "Required task failed, aborting phase");
                return Err(error);
            }
        }

        tracing::debug!(phase = %phase, "Lifecycle phase finished");
        Ok(())
    }

    async fn run_task(
        &self,
        phase: Phase,
        task: &LifecycleTask,
        results: &mut ResultTracker,
    ) -> Result<(), TaskError> {
        let trace_id = phase.trace_id(&task.id);
        let diagnostics = task.diagnostics.unwrap_or(self.default_diagnostics);
        let tracker = self.tracer.start_phase(
            &trace_id,
            TraceOptions {
                slow_threshold_ms: diagnostics.slow_threshold_ms,
                timeout_ms: diagnostics.timeout_ms,
                metadata: task.metadata.clone(),
            },
        );

        tracing::debug!(trace_id = %trace_id, optional = task.optional, "Starting lifecycle task");
        let start = Instant::now();
        let outcome = task.run().await;
        let duration_ms = elapsed_ms(start);

        match outcome {
            Ok(()) => {
                tracker.complete();
                results.record(TaskResult::success(phase, task, duration_ms));
                tracing::debug!(trace_id = %trace_id, duration_ms, "Lifecycle task completed");
                Ok(())
            }
            Err(error) => {
                tracker.fail(&error, FailureDetails { duration_ms });
                results.record(TaskResult::failed(phase, task, duration_ms, error.clone()));
                self.report_failure(phase, task, duration_ms, &error);
                Err(error)
            }
        }
    }

    fn report_failure(&self, phase: Phase, task: &LifecycleTask, duration_ms: u64, error: &TaskError) {
        let payload = LogPayload {
            source: COORDINATOR_SOURCE,
            phase,
            task_id: task.id.clone(),
            label: task.label.clone(),
            optional: task.optional,
            duration_ms,
            error: format!("{:#}", error.inner()),
        };
        self.logger.warn(
            &format!("Lifecycle task failed: {}/{}", phase, task.id),
            &payload,
        );
        self.notifier
            .notify(&FailureEvent::new(phase, task, error.clone()));
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
