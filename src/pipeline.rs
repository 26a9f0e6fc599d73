//! End-to-end generator run.
//!
//! Stages run strictly in order: load the package list, build the resolver
//! command, resolve, then partition and write. The first error ends the run;
//! nothing is written unless resolution succeeded.

use std::path::PathBuf;
use strum::IntoEnumIterator;
use tracing::info;

use crate::command::ResolverCommand;
use crate::config::RunConfig;
use crate::error::Result;
use crate::mirror_list::{Bucket, PartitionedPackages};
use crate::package_config::PackageConfig;
use crate::resolver::{InvokeMode, Resolver, SubprocessResolver};

/// A mirror list written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenList {
    pub bucket: Bucket,
    pub path: PathBuf,
    pub packages: usize,
}

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Show-only mode: the command that would have been run
    CommandShown { command: String },
    /// Execute mode: one entry per mirror list, noarch first
    Written { lists: Vec<WrittenList> },
}

/// Run with the resolver as a real subprocess
pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    run_with(config, &SubprocessResolver)
}

/// Run against any `Resolver`
pub fn run_with<R: Resolver>(config: &RunConfig, resolver: &R) -> Result<RunOutcome> {
    config.validate()?;

    let package_config = PackageConfig::load_from_file(&config.package_config_path)?;
    for spec in package_config.match_specs() {
        info!("Package to mirror: {}", spec);
    }

    let command =
        ResolverCommand::dry_run_install(&config.resolver, &config.channel, &package_config.packages);

    if config.mode == InvokeMode::ShowOnly {
        return Ok(RunOutcome::CommandShown {
            command: command.to_string(),
        });
    }

    let report = resolver.resolve(&command)?;
    let partitioned = PartitionedPackages::partition(&report.link);
    info!(
        "Partitioned {} package(s): {} noarch, {} {}",
        partitioned.len(),
        partitioned.noarch.len(),
        partitioned.arch.len(),
        config.arch_platform
    );

    let lists = write_mirror_lists(config, &partitioned)?;
    Ok(RunOutcome::Written { lists })
}

/// Write one mirror list per bucket into the configured output directory
pub fn write_mirror_lists(
    config: &RunConfig,
    partitioned: &PartitionedPackages,
) -> Result<Vec<WrittenList>> {
    let mut written = Vec::new();
    for bucket in Bucket::iter() {
        let path = config.output_path(bucket);
        let list = partitioned.mirror_list(bucket);
        list.save_to_file(&path)?;
        written.push(WrittenList {
            bucket,
            path,
            packages: list.whitelist.len(),
        });
    }
    Ok(written)
}
