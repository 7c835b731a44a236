//! Error types for the lifecycle coordinator.
//!
//! - `TaskError`: the error a task's run operation failed with, shared
//!   unchanged between the result log, the failure event and the caller
//! - `CommandTaskError`: failures of shell-command tasks

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The error produced by a failing lifecycle task.
///
/// Cloning is cheap and every clone refers to the same underlying error, so
/// the value recorded in a `TaskResult` is the value `run_phase` returns.
#[derive(Clone)]
pub struct TaskError(Arc<anyhow::Error>);

impl TaskError {
    /// Wrap any standard error.
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Arc::new(anyhow::Error::new(error)))
    }

    /// Create an error from a plain message.
    pub fn msg(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self(Arc::new(anyhow::Error::msg(message)))
    }

    /// The underlying error.
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }

    /// Attempt to view the original error as a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// Whether both handles refer to the same error instance.
    pub fn same_as(&self, other: &TaskError) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(error: anyhow::Error) -> Self {
        Self(Arc::new(error))
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl fmt::Debug for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl std::error::Error for TaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let inner: &(dyn std::error::Error + 'static) = &**self.0;
        inner.source()
    }
}

impl Serialize for TaskError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{:#}", self.0))
    }
}

/// Errors from shell-command lifecycle tasks.
#[derive(Debug, Error)]
pub enum CommandTaskError {
    #[error("Failed to spawn command '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Command '{command}' was terminated by a signal")]
    Terminated { command: String },
}
