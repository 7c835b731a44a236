//! Configuration view and validation commands: `lifecycle list`, `lifecycle validate`.

use anyhow::Result;
use lifecycle_coordinator::Phase;
use lifecycle_coordinator::lifecycle::LifecycleConfig;
use lifecycle_coordinator::lifecycle::config::{CONFIG_FILE, config_dir};
use std::path::Path;

pub fn cmd_list(project_dir: &Path) -> Result<()> {
    let cfg_dir = config_dir(project_dir);
    let config = LifecycleConfig::load_or_default(&cfg_dir)?;

    if config.enabled_task_count() == 0 {
        println!("No lifecycle tasks configured in {}", cfg_dir.join(CONFIG_FILE).display());
        return Ok(());
    }

    for phase in Phase::all() {
        let tasks = config.tasks_for_phase(*phase);
        if tasks.is_empty() {
            continue;
        }

        println!("[{}]", phase);
        for task in tasks {
            let kind = if task.optional { "optional" } else { "required" };
            match &task.label {
                Some(label) => println!("  {} ({}) - {}", task.id, kind, label),
                None => println!("  {} ({})", task.id, kind),
            }
        }
        println!();
    }

    Ok(())
}

pub fn cmd_validate(project_dir: &Path) -> Result<()> {
    let cfg_dir = config_dir(project_dir);
    let config_path = cfg_dir.join(CONFIG_FILE);
    let config = LifecycleConfig::load_or_default(&cfg_dir)?;

    let warnings = config.validate();
    if warnings.is_empty() {
        println!(
            "Configuration valid: {} enabled task(s) in {}",
            config.enabled_task_count(),
            config_path.display()
        );
        return Ok(());
    }

    for warning in &warnings {
        println!("warning: {}", warning);
    }
    anyhow::bail!("{} configuration warning(s) found", warnings.len());
}
