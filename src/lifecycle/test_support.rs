//! Recording collaborators shared by the lifecycle unit tests.

use super::collaborators::{
    FailureDetails, FailureNotifier, LogPayload, Logger, PhaseTracker, Tracer, TraceOptions,
};
use super::types::{FailureEvent, LifecycleTask, TaskRun};
use crate::errors::TaskError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecorderState {
    events: Vec<String>,
    spans: Vec<(String, TraceOptions)>,
    warnings: Vec<(String, LogPayload)>,
    notifications: Vec<FailureEvent>,
}

/// Records every collaborator call, plus task runs, into one ordered log.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    state: Arc<Mutex<RecorderState>>,
}

impl Recorder {
    pub fn tracer(&self) -> Arc<dyn Tracer> {
        Arc::new(RecordingTracer(self.clone()))
    }

    pub fn logger(&self) -> Arc<dyn Logger> {
        Arc::new(RecordingLogger(self.clone()))
    }

    pub fn notifier(&self) -> Arc<dyn FailureNotifier> {
        Arc::new(RecordingNotifier(self.clone()))
    }

    pub fn push(&self, event: impl Into<String>) {
        self.state.lock().unwrap().events.push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn spans(&self) -> Vec<(String, TraceOptions)> {
        self.state.lock().unwrap().spans.clone()
    }

    pub fn warnings(&self) -> Vec<(String, LogPayload)> {
        self.state.lock().unwrap().warnings.clone()
    }

    pub fn notifications(&self) -> Vec<FailureEvent> {
        self.state.lock().unwrap().notifications.clone()
    }
}

struct RecordingTracer(Recorder);

impl Tracer for RecordingTracer {
    fn start_phase(&self, trace_id: &str, options: TraceOptions) -> Box<dyn PhaseTracker> {
        {
            let mut state = self.0.state.lock().unwrap();
            state.events.push(format!("start:{}", trace_id));
            state.spans.push((trace_id.to_string(), options));
        }
        Box::new(RecordingSpan {
            trace_id: trace_id.to_string(),
            recorder: self.0.clone(),
        })
    }
}

struct RecordingSpan {
    trace_id: String,
    recorder: Recorder,
}

impl PhaseTracker for RecordingSpan {
    fn complete(self: Box<Self>) {
        self.recorder.push(format!("complete:{}", self.trace_id));
    }

    fn fail(self: Box<Self>, error: &TaskError, _details: FailureDetails) {
        self.recorder
            .push(format!("fail:{}:{}", self.trace_id, error));
    }
}

struct RecordingLogger(Recorder);

impl Logger for RecordingLogger {
    fn warn(&self, message: &str, payload: &LogPayload) {
        let mut state = self.0.state.lock().unwrap();
        state.events.push(format!("warn:{}", message));
        state.warnings.push((message.to_string(), payload.clone()));
    }
}

struct RecordingNotifier(Recorder);

impl FailureNotifier for RecordingNotifier {
    fn notify(&self, event: &FailureEvent) {
        let mut state = self.0.state.lock().unwrap();
        state.events.push(format!("notify:{}", event.task_id));
        state.notifications.push(event.clone());
    }
}

/// Task that logs its run and then returns a fixed outcome.
struct ScriptedTask {
    id: String,
    outcome: Result<(), TaskError>,
    recorder: Recorder,
}

#[async_trait]
impl TaskRun for ScriptedTask {
    async fn run(&self) -> Result<(), TaskError> {
        tokio::task::yield_now().await;
        self.recorder.push(format!("run:{}", self.id));
        self.outcome.clone()
    }
}

pub(crate) fn task_ok(id: &str, recorder: Recorder) -> LifecycleTask {
    task_with_outcome(id, Ok(()), recorder)
}

pub(crate) fn task_err(id: &str, message: &'static str, recorder: Recorder) -> LifecycleTask {
    task_with_outcome(id, Err(TaskError::msg(message)), recorder)
}

pub(crate) fn task_with_outcome(
    id: &str,
    outcome: Result<(), TaskError>,
    recorder: Recorder,
) -> LifecycleTask {
    LifecycleTask::new(
        id,
        ScriptedTask {
            id: id.to_string(),
            outcome,
            recorder,
        },
    )
}
