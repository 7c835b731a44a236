//! Phase execution command: `lifecycle run`.

use anyhow::Result;
use lifecycle_coordinator::lifecycle::config::config_dir;
use lifecycle_coordinator::{LifecycleConfig, LifecycleCoordinator, Phase, TaskResult};
use std::path::Path;

pub async fn cmd_run(project_dir: &Path, phases: &[Phase]) -> Result<()> {
    let config = LifecycleConfig::load_or_default(&config_dir(project_dir))?;
    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }

    let mut coordinator = LifecycleCoordinator::builder()
        .default_diagnostics(config.default_diagnostics())
        .build();
    let registered = config.register_all(&mut coordinator, project_dir)?;
    tracing::info!(tasks = registered, "Registered lifecycle tasks");

    let phases: Vec<Phase> = if phases.is_empty() {
        Phase::all().to_vec()
    } else {
        phases.to_vec()
    };

    let mut outcome = Ok(());
    for phase in phases {
        if !coordinator.has_tasks_for(phase) {
            tracing::debug!(phase = %phase, "No tasks registered, skipping");
            continue;
        }

        tracing::info!(phase = %phase, tasks = coordinator.task_count(phase), "Running phase");
        if let Err(error) = coordinator.run_phase(phase).await {
            outcome = Err(anyhow::anyhow!(
                "Phase '{}' aborted: {:#}",
                phase,
                error.inner()
            ));
            break;
        }
    }

    print_results(&coordinator.results());
    outcome
}

fn print_results(results: &[TaskResult]) {
    if results.is_empty() {
        println!("No lifecycle tasks ran.");
        return;
    }

    for result in results {
        let status = match (result.is_success(), result.optional) {
            (true, _) => "ok",
            (false, true) => "failed (optional)",
            (false, false) => "FAILED",
        };
        println!(
            "{:<18} {}/{} ({}ms)",
            status, result.phase, result.task_id, result.duration_ms
        );
        if let Some(error) = &result.error {
            println!("{:<18} {}", "", error);
        }
    }

    let failed = results.iter().filter(|r| !r.is_success()).count();
    println!();
    println!("{} task(s) run, {} failed", results.len(), failed);
}
