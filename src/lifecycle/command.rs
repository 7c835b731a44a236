//! Shell-command lifecycle tasks.
//!
//! A `CommandTask` runs `sh -c <command>` in a working directory. The
//! process receives `LIFECYCLE_PHASE` and `LIFECYCLE_TASK` in its
//! environment. Exit code 0 is success; anything else becomes a
//! `CommandTaskError` that reaches the coordinator unchanged.

use super::types::TaskRun;
use crate::errors::{CommandTaskError, TaskError};
use crate::phase::Phase;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Runs a shell command as a lifecycle task.
#[derive(Debug, Clone)]
pub struct CommandTask {
    phase: Phase,
    task_id: String,
    command: String,
    working_dir: PathBuf,
}

impl CommandTask {
    pub fn new(
        phase: Phase,
        task_id: impl Into<String>,
        command: impl Into<String>,
        working_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            phase,
            task_id: task_id.into(),
            command: command.into(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

#[async_trait]
impl TaskRun for CommandTask {
    async fn run(&self) -> Result<(), TaskError> {
        tracing::debug!(
            command = %self.command,
            working_dir = %self.working_dir.display(),
            "Spawning lifecycle command"
        );

        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("LIFECYCLE_PHASE", self.phase.as_str())
            .env("LIFECYCLE_TASK", &self.task_id)
            .output()
            .await
            .map_err(|source| {
                TaskError::new(CommandTaskError::SpawnFailed {
                    command: self.command.clone(),
                    source,
                })
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(task_id = %self.task_id, stdout = %stdout.trim(), "Lifecycle command output");
        }

        match output.status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(TaskError::new(CommandTaskError::NonZeroExit {
                command: self.command.clone(),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })),
            None => Err(TaskError::new(CommandTaskError::Terminated {
                command: self.command.clone(),
            })),
        }
    }
}
