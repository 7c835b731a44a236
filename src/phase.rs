//! Lifecycle phase identifiers.

use serde::{Deserialize, Serialize};

/// A named, ordered bucket of lifecycle tasks.
///
/// Phases are declared in the order a host typically runs them; `Ord`
/// follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Minimal work needed before anything else can start
    Bootstrap,
    /// Work the host cannot be usable without
    Critical,
    /// Work that can wait until the host is interactive
    Deferred,
    /// Background work scheduled once the host is idle
    Idle,
    /// Teardown work run before exit
    Shutdown,
}

impl Phase {
    /// Returns all phases in canonical order.
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Bootstrap,
            Phase::Critical,
            Phase::Deferred,
            Phase::Idle,
            Phase::Shutdown,
        ]
    }

    /// Returns the phase name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Bootstrap => "bootstrap",
            Phase::Critical => "critical",
            Phase::Deferred => "deferred",
            Phase::Idle => "idle",
            Phase::Shutdown => "shutdown",
        }
    }

    /// Trace identifier for a task running in this phase.
    pub fn trace_id(&self, task_id: &str) -> String {
        format!("lifecycle.{}.{}", self.as_str(), task_id)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bootstrap" => Ok(Phase::Bootstrap),
            "critical" => Ok(Phase::Critical),
            "deferred" => Ok(Phase::Deferred),
            "idle" => Ok(Phase::Idle),
            "shutdown" => Ok(Phase::Shutdown),
            _ => anyhow::bail!(
                "Invalid phase '{}'. Valid values: bootstrap, critical, deferred, idle, shutdown",
                s
            ),
        }
    }
}
