//! Lifecycle configuration parsing and validation.
//!
//! Configuration lives in `.lifecycle/lifecycle.toml`:
//!
//! ```toml
//! [diagnostics]
//! slow_threshold_ms = 2000
//! timeout_ms = 15000
//!
//! [[tasks]]
//! phase = "bootstrap"
//! id = "migrate-db"
//! label = "Run database migrations"
//! command = "./scripts/migrate.sh"
//!
//! [[tasks]]
//! phase = "deferred"
//! id = "check-updates"
//! command = "./scripts/check-updates.sh"
//! optional = true
//! timeout_ms = 5000
//! ```

use super::command::CommandTask;
use super::coordinator::LifecycleCoordinator;
use super::types::{LifecycleTask, TaskDiagnostics, TaskMetadata};
use crate::phase::Phase;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding lifecycle configuration, relative to the project.
pub const CONFIG_DIR: &str = ".lifecycle";

/// Configuration file name inside `CONFIG_DIR`.
pub const CONFIG_FILE: &str = "lifecycle.toml";

/// Resolve the configuration directory for a project.
pub fn config_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIG_DIR)
}

/// A single command task definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Phase the task is registered under
    pub phase: Phase,

    /// Task identifier (duplicates allowed)
    pub id: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Shell command to execute
    #[serde(default)]
    pub command: Option<String>,

    /// Working directory, relative to the project directory or absolute
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Optional tasks never abort their phase
    #[serde(default)]
    pub optional: bool,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Per-task slow threshold; falls back to `[diagnostics]`
    #[serde(default)]
    pub slow_threshold_ms: Option<u64>,

    /// Per-task timeout; falls back to `[diagnostics]`
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Forwarded to the tracer as metadata
    #[serde(default)]
    pub description: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl TaskDefinition {
    /// Create a new command task definition.
    pub fn command(phase: Phase, id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            phase,
            id: id.into(),
            label: None,
            command: Some(command.into()),
            working_dir: None,
            optional: false,
            enabled: true,
            slow_threshold_ms: None,
            timeout_ms: None,
            description: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Per-task diagnostics, if either threshold is set.
    ///
    /// A missing threshold is filled from `defaults`.
    pub fn diagnostics(&self, defaults: TaskDiagnostics) -> Option<TaskDiagnostics> {
        if self.slow_threshold_ms.is_none() && self.timeout_ms.is_none() {
            return None;
        }
        Some(TaskDiagnostics {
            slow_threshold_ms: self.slow_threshold_ms.unwrap_or(defaults.slow_threshold_ms),
            timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
        })
    }

    /// Build the lifecycle task for this definition.
    pub fn to_task(&self, project_dir: &Path, defaults: TaskDiagnostics) -> Result<LifecycleTask> {
        let command = self
            .command
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .with_context(|| format!("Task '{}' has no command specified", self.id))?;

        let working_dir = self
            .working_dir
            .as_ref()
            .map(|p| {
                if p.is_absolute() {
                    p.clone()
                } else {
                    project_dir.join(p)
                }
            })
            .unwrap_or_else(|| project_dir.to_path_buf());

        let mut metadata = TaskMetadata::new();
        metadata.insert("command".to_string(), serde_json::json!(command));
        if let Some(description) = &self.description {
            metadata.insert("description".to_string(), serde_json::json!(description));
        }

        let mut task = LifecycleTask::new(
            self.id.clone(),
            CommandTask::new(self.phase, self.id.clone(), command, working_dir),
        )
        .with_metadata(metadata);

        if let Some(label) = &self.label {
            task = task.with_label(label.clone());
        }
        if self.optional {
            task = task.optional();
        }
        if let Some(diagnostics) = self.diagnostics(defaults) {
            task = task.with_diagnostics(diagnostics);
        }
        Ok(task)
    }

    /// Validate this definition.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.id.trim().is_empty() {
            warnings.push(format!("Task in phase '{}' has an empty id", self.phase));
        }

        match self.command.as_deref() {
            None => warnings.push(format!(
                "Task '{}' in phase '{}' has no command specified",
                self.id, self.phase
            )),
            Some(c) if c.trim().is_empty() => warnings.push(format!(
                "Task '{}' in phase '{}' has an empty command",
                self.id, self.phase
            )),
            Some(_) => {}
        }

        if self.timeout_ms == Some(0) {
            warnings.push(format!(
                "Task '{}' in phase '{}' has a timeout of 0 ms",
                self.id, self.phase
            ));
        }

        if let (Some(slow), Some(timeout)) = (self.slow_threshold_ms, self.timeout_ms)
            && slow >= timeout
        {
            warnings.push(format!(
                "Task '{}' in phase '{}' has slow_threshold_ms ({}) >= timeout_ms ({})",
                self.id, self.phase, slow, timeout
            ));
        }

        warnings
    }
}

/// Configuration for the lifecycle coordinator and its command tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Coordinator-wide diagnostics for tasks that declare none
    #[serde(default)]
    pub diagnostics: TaskDiagnostics,

    /// Command task definitions, in registration order
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

impl LifecycleConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lifecycle config: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse lifecycle.toml")
    }

    /// Load configuration from `<config_dir>/lifecycle.toml`.
    /// Returns an empty config if the file doesn't exist.
    pub fn load_or_default(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Append the tasks of another config. Diagnostics of `self` are kept.
    pub fn merge(&mut self, other: Self) {
        self.tasks.extend(other.tasks);
    }

    /// Coordinator-wide diagnostics defaults.
    pub fn default_diagnostics(&self) -> TaskDiagnostics {
        self.diagnostics
    }

    /// Enabled tasks for a phase, in file order.
    pub fn tasks_for_phase(&self, phase: Phase) -> Vec<&TaskDefinition> {
        self.tasks
            .iter()
            .filter(|t| t.enabled && t.phase == phase)
            .collect()
    }

    /// Check if any enabled task is defined for a phase.
    pub fn has_tasks_for(&self, phase: Phase) -> bool {
        self.tasks.iter().any(|t| t.enabled && t.phase == phase)
    }

    /// Get the total number of enabled tasks.
    pub fn enabled_task_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.enabled).count()
    }

    /// Validate the configuration and return warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.diagnostics.timeout_ms == 0 {
            warnings.push("Default diagnostics have a timeout of 0 ms".to_string());
        }
        if self.diagnostics.slow_threshold_ms >= self.diagnostics.timeout_ms {
            warnings.push(format!(
                "Default slow_threshold_ms ({}) >= timeout_ms ({})",
                self.diagnostics.slow_threshold_ms, self.diagnostics.timeout_ms
            ));
        }

        warnings.extend(self.tasks.iter().flat_map(|t| t.validate()));
        warnings
    }

    /// Register every enabled task with the coordinator.
    ///
    /// Returns the number of tasks registered.
    pub fn register_all(
        &self,
        coordinator: &mut LifecycleCoordinator,
        project_dir: &Path,
    ) -> Result<usize> {
        let mut count = 0;
        for definition in self.tasks.iter().filter(|t| t.enabled) {
            let task = definition.to_task(project_dir, self.diagnostics)?;
            coordinator.register_task(definition.phase, task);
            count += 1;
        }
        Ok(count)
    }
}
