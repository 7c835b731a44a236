pub mod errors;
pub mod lifecycle;
pub mod phase;
pub mod telemetry;

pub use errors::{CommandTaskError, TaskError};
pub use lifecycle::{
    LifecycleConfig, LifecycleCoordinator, LifecycleTask, TaskDiagnostics, TaskResult, TaskStatus,
};
pub use phase::Phase;
