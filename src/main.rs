//! generate-conda-mirror-config - Main entry point
//!
//! Loads the package list, asks the resolver what a dry-run install would
//! link, and writes the `noarch` and arch-specific conda-mirror lists.

use anyhow::{Context, Result};
use tracing::{debug, info};

use conda_mirror_config::cli::Cli;
use conda_mirror_config::config::RunConfig;
use conda_mirror_config::pipeline::{self, RunOutcome};

/// Initialize logging. Logs go to stderr so stdout only carries results.
fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logger();

    let config = RunConfig::from(Cli::parse_args());
    debug!("Run configuration: {:?}", config);

    let outcome = pipeline::run(&config).with_context(|| {
        format!(
            "Failed to generate mirror config from {}",
            config.package_config_path.display()
        )
    })?;

    match outcome {
        RunOutcome::CommandShown { command } => {
            println!("run command: {}", command);
        }
        RunOutcome::Written { lists } => {
            for list in &lists {
                println!("{}: {} package(s)", list.path.display(), list.packages);
            }
            info!("Mirror configuration generated");
        }
    }

    Ok(())
}
