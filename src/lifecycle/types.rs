//! Task and result types for the lifecycle coordinator.
//!
//! This module defines the shapes shared by every component:
//! - `LifecycleTask`: a unit of work registered under a phase
//! - `TaskRun`: the run contract a task implements
//! - `TaskDiagnostics`: advisory timing thresholds forwarded to the tracer
//! - `TaskResult`: the recorded outcome of one task execution
//! - `FailureEvent`: what the failure notifier receives

use crate::errors::TaskError;
use crate::phase::Phase;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Slow threshold used when a task does not declare its own diagnostics.
pub const DEFAULT_SLOW_THRESHOLD_MS: u64 = 2_000;

/// Timeout used when a task does not declare its own diagnostics.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Opaque key-value metadata passed through to the tracer.
pub type TaskMetadata = HashMap<String, serde_json::Value>;

/// The run operation of a lifecycle task.
///
/// Implementations may complete immediately or suspend; the runner always
/// awaits the returned future before starting the next task.
#[async_trait]
pub trait TaskRun: Send + Sync {
    async fn run(&self) -> Result<(), TaskError>;
}

/// Adapter turning an async closure into a `TaskRun`.
struct AsyncFnTask<F>(F);

#[async_trait]
impl<F, Fut> TaskRun for AsyncFnTask<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn run(&self) -> Result<(), TaskError> {
        (self.0)().await.map_err(TaskError::from)
    }
}

/// Adapter turning a synchronous closure into a `TaskRun`.
struct SyncFnTask<F>(F);

#[async_trait]
impl<F> TaskRun for SyncFnTask<F>
where
    F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
{
    async fn run(&self) -> Result<(), TaskError> {
        (self.0)().map_err(TaskError::from)
    }
}

/// Advisory timing thresholds for a task.
///
/// Neither value is enforced by the coordinator; both are forwarded to the
/// tracer so it can flag slow or stuck tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDiagnostics {
    /// Duration after which the task is considered slow
    pub slow_threshold_ms: u64,
    /// Duration after which the task is considered stuck
    pub timeout_ms: u64,
}

impl Default for TaskDiagnostics {
    fn default() -> Self {
        Self {
            slow_threshold_ms: DEFAULT_SLOW_THRESHOLD_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl TaskDiagnostics {
    pub fn new(slow_threshold_ms: u64, timeout_ms: u64) -> Self {
        Self {
            slow_threshold_ms,
            timeout_ms,
        }
    }
}

/// A unit of startup or shutdown work.
///
/// Ids need not be unique within a phase: duplicates each run, in
/// registration order, and each records its own result.
#[derive(Clone)]
pub struct LifecycleTask {
    /// Task identifier, used in trace ids and results
    pub id: String,
    /// Human-readable label
    pub label: Option<String>,
    /// Failures of optional tasks never abort the phase
    pub optional: bool,
    /// Per-task diagnostics; coordinator defaults apply when absent
    pub diagnostics: Option<TaskDiagnostics>,
    /// Opaque metadata forwarded to the tracer
    pub metadata: Option<TaskMetadata>,
    run: Arc<dyn TaskRun>,
}

impl LifecycleTask {
    /// Create a required task from any `TaskRun` implementation.
    pub fn new(id: impl Into<String>, run: impl TaskRun + 'static) -> Self {
        Self::from_shared(id, Arc::new(run))
    }

    /// Create a required task from an already shared run operation.
    pub fn from_shared(id: impl Into<String>, run: Arc<dyn TaskRun>) -> Self {
        Self {
            id: id.into(),
            label: None,
            optional: false,
            diagnostics: None,
            metadata: None,
            run,
        }
    }

    /// Create a required task from an async closure.
    pub fn from_fn<F, Fut>(id: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::new(id, AsyncFnTask(f))
    }

    /// Create a required task from a synchronous closure.
    pub fn from_sync<F>(id: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(id, SyncFnTask(f))
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Mark the task optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set per-task diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: TaskDiagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Set metadata forwarded to the tracer.
    pub fn with_metadata(mut self, metadata: TaskMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Invoke the task's run operation.
    pub async fn run(&self) -> Result<(), TaskError> {
        self.run.run().await
    }
}

impl std::fmt::Debug for LifecycleTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleTask")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("optional", &self.optional)
            .field("diagnostics", &self.diagnostics)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Outcome of a single task execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Success,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Success => "success",
            TaskStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Record of one task execution, appended to the coordinator's result log.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub phase: Phase,
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub status: TaskStatus,
    pub duration_ms: u64,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskError>,
}

impl TaskResult {
    /// Result for a task that completed.
    pub fn success(phase: Phase, task: &LifecycleTask, duration_ms: u64) -> Self {
        Self {
            phase,
            task_id: task.id.clone(),
            label: task.label.clone(),
            status: TaskStatus::Success,
            duration_ms,
            optional: task.optional,
            error: None,
        }
    }

    /// Result for a task that failed.
    pub fn failed(phase: Phase, task: &LifecycleTask, duration_ms: u64, error: TaskError) -> Self {
        Self {
            phase,
            task_id: task.id.clone(),
            label: task.label.clone(),
            status: TaskStatus::Failed,
            duration_ms,
            optional: task.optional,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Success
    }
}

/// Delivered to the failure notifier whenever a task fails.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEvent {
    pub phase: Phase,
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub error: TaskError,
    pub optional: bool,
}

impl FailureEvent {
    pub fn new(phase: Phase, task: &LifecycleTask, error: TaskError) -> Self {
        Self {
            phase,
            task_id: task.id.clone(),
            label: task.label.clone(),
            error,
            optional: task.optional,
        }
    }
}
