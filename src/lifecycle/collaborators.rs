//! Observability contracts the coordinator calls into.
//!
//! The coordinator never implements these itself. Hosts inject their own
//! implementations; `crate::telemetry` provides `tracing`-backed defaults.

use super::types::{FailureEvent, TaskMetadata};
use crate::errors::TaskError;
use crate::phase::Phase;
use serde::Serialize;

/// Source name reported in every log payload the coordinator emits.
pub const COORDINATOR_SOURCE: &str = "LifecycleCoordinator";

/// Options passed when a trace span is started for a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceOptions {
    pub slow_threshold_ms: u64,
    pub timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TaskMetadata>,
}

/// Timing details passed when a span is marked failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FailureDetails {
    pub duration_ms: u64,
}

/// Starts one trace span per task execution.
pub trait Tracer: Send + Sync {
    fn start_phase(&self, trace_id: &str, options: TraceOptions) -> Box<dyn PhaseTracker>;
}

/// Handle for an in-flight span. Consumed by exactly one of `complete` or `fail`.
pub trait PhaseTracker: Send {
    fn complete(self: Box<Self>);
    fn fail(self: Box<Self>, error: &TaskError, details: FailureDetails);
}

/// Structured payload attached to coordinator log messages.
#[derive(Debug, Clone, Serialize)]
pub struct LogPayload {
    /// Always `COORDINATOR_SOURCE`
    pub source: &'static str,
    pub phase: Phase,
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub optional: bool,
    pub duration_ms: u64,
    pub error: String,
}

/// Receives coordinator warnings.
pub trait Logger: Send + Sync {
    fn warn(&self, message: &str, payload: &LogPayload);
}

/// Receives every task failure, before the phase decides whether to continue.
pub trait FailureNotifier: Send + Sync {
    fn notify(&self, event: &FailureEvent);
}

impl<F> FailureNotifier for F
where
    F: Fn(&FailureEvent) + Send + Sync,
{
    fn notify(&self, event: &FailureEvent) {
        self(event)
    }
}
