use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lifecycle_coordinator::Phase;
use lifecycle_coordinator::telemetry::{LogFormat, init_logging};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "lifecycle")]
#[command(version, about = "Run ordered startup/shutdown phases for a project")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Log output format: text, json
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run phases in order (all phases when none are given)
    Run {
        /// Phases to run: bootstrap, critical, deferred, idle, shutdown
        phases: Vec<Phase>,
    },
    /// List configured tasks per phase
    List,
    /// Validate .lifecycle/lifecycle.toml and show any warnings
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format)?;

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Run { phases } => cmd::cmd_run(&project_dir, phases).await?,
        Commands::List => cmd::cmd_list(&project_dir)?,
        Commands::Validate => cmd::cmd_validate(&project_dir)?,
    }

    Ok(())
}
