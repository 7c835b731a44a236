//! Lifecycle coordination: ordered phases of startup and shutdown tasks.
//!
//! A host registers tasks under phases and runs each phase when its point
//! in bring-up (or teardown) is reached. Within a phase, tasks run strictly
//! one after another in registration order.
//!
//! # Failure isolation
//!
//! - **Optional tasks**: failures are traced, recorded, logged and reported
//!   to the failure notifier, then the phase continues.
//! - **Required tasks** (the default): the same reporting happens, then the
//!   phase stops and `run_phase` returns the task's own error. Tasks that
//!   already completed are not rolled back.
//!
//! # Collaborators
//!
//! The coordinator calls three injected contracts: a `Tracer` (one span per
//! task), a `Logger` (warnings on failure) and a `FailureNotifier`. The
//! `crate::telemetry` module supplies `tracing`-backed defaults.
//!
//! # Usage
//!
//! ```no_run
//! use lifecycle_coordinator::{LifecycleCoordinator, LifecycleTask, Phase};
//!
//! # async fn bootstrap() -> Result<(), lifecycle_coordinator::TaskError> {
//! let mut coordinator = LifecycleCoordinator::default();
//!
//! coordinator.register_task(
//!     Phase::Bootstrap,
//!     LifecycleTask::from_fn("open-db", || async { Ok(()) }).with_label("Open database"),
//! );
//! coordinator.register_task(
//!     Phase::Deferred,
//!     LifecycleTask::from_sync("check-updates", || Ok(())).optional(),
//! );
//!
//! coordinator.run_phase(Phase::Bootstrap).await?;
//! coordinator.run_phase(Phase::Deferred).await?;
//!
//! for result in coordinator.results() {
//!     println!("{} {} {}ms", result.status, result.task_id, result.duration_ms);
//! }
//! # Ok(())
//! # }
//! ```

pub mod collaborators;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod registry;
pub mod results;
pub mod runner;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use collaborators::{
    COORDINATOR_SOURCE, FailureDetails, FailureNotifier, LogPayload, Logger, PhaseTracker, Tracer,
    TraceOptions,
};
pub use command::CommandTask;
pub use config::{LifecycleConfig, TaskDefinition};
pub use coordinator::{CoordinatorBuilder, LifecycleCoordinator};
pub use registry::TaskRegistry;
pub use results::ResultTracker;
pub use runner::PhaseRunner;
pub use types::{
    DEFAULT_SLOW_THRESHOLD_MS, DEFAULT_TIMEOUT_MS, FailureEvent, LifecycleTask, TaskDiagnostics,
    TaskMetadata, TaskResult, TaskRun, TaskStatus,
};
