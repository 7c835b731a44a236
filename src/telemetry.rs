//! `tracing`-backed collaborators and subscriber setup.
//!
//! These are the defaults a `LifecycleCoordinator` uses when the host does
//! not inject its own tracer, logger or failure notifier.

use crate::errors::TaskError;
use crate::lifecycle::{
    FailureDetails, FailureEvent, FailureNotifier, LogPayload, Logger, PhaseTracker, Tracer,
    TraceOptions,
};
use anyhow::Result;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Opens one `tracing` span per task and flags slow or overdue tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTracer;

impl Tracer for TracingTracer {
    fn start_phase(&self, trace_id: &str, options: TraceOptions) -> Box<dyn PhaseTracker> {
        let span = tracing::info_span!(
            "lifecycle_task",
            trace_id = %trace_id,
            slow_threshold_ms = options.slow_threshold_ms,
            timeout_ms = options.timeout_ms
        );
        if let Some(metadata) = &options.metadata {
            let metadata = serde_json::to_string(metadata).unwrap_or_default();
            span.in_scope(|| tracing::trace!(metadata = %metadata, "Task metadata"));
        }
        Box::new(TracingSpan {
            span,
            trace_id: trace_id.to_string(),
            options,
            start: Instant::now(),
        })
    }
}

struct TracingSpan {
    span: tracing::Span,
    trace_id: String,
    options: TraceOptions,
    start: Instant,
}

impl TracingSpan {
    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl PhaseTracker for TracingSpan {
    fn complete(self: Box<Self>) {
        let duration_ms = self.elapsed_ms();
        let _guard = self.span.enter();
        if duration_ms >= self.options.timeout_ms {
            tracing::warn!(
                trace_id = %self.trace_id,
                duration_ms,
                timeout_ms = self.options.timeout_ms,
                "Lifecycle task exceeded its timeout"
            );
        } else if duration_ms >= self.options.slow_threshold_ms {
            tracing::warn!(
                trace_id = %self.trace_id,
                duration_ms,
                slow_threshold_ms = self.options.slow_threshold_ms,
                "Lifecycle task was slow"
            );
        } else {
            tracing::debug!(trace_id = %self.trace_id, duration_ms, "Lifecycle task span completed");
        }
    }

    fn fail(self: Box<Self>, error: &TaskError, details: FailureDetails) {
        let _guard = self.span.enter();
        tracing::error!(
            trace_id = %self.trace_id,
            duration_ms = details.duration_ms,
            error = %format!("{:#}", error.inner()),
            "Lifecycle task span failed"
        );
    }
}

/// Forwards coordinator warnings to `tracing::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn warn(&self, message: &str, payload: &LogPayload) {
        tracing::warn!(
            source = payload.source,
            phase = %payload.phase,
            task_id = %payload.task_id,
            label = payload.label.as_deref().unwrap_or(""),
            optional = payload.optional,
            duration_ms = payload.duration_ms,
            error = %payload.error,
            "{}",
            message
        );
    }
}

/// Failure notifier that only records a debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl FailureNotifier for LoggingNotifier {
    fn notify(&self, event: &FailureEvent) {
        tracing::debug!(
            phase = %event.phase,
            task_id = %event.task_id,
            optional = event.optional,
            "Lifecycle failure notified"
        );
    }
}

/// Output format for the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid log format '{}'. Valid values: text, json", s),
        }
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug` over `info`.
pub fn init_logging(verbose: bool, format: LogFormat) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
