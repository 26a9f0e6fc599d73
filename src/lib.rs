//! conda-mirror configuration generator
//!
//! Resolves a package list through a dry-run `conda install` and turns the
//! result into the whitelist files `conda-mirror` consumes.

pub mod child_process;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod mirror_list;
pub mod package_config;
pub mod pipeline;
pub mod resolver;

// Re-export main types for convenience
pub use command::ResolverCommand;
pub use config::RunConfig;
pub use error::MirrorConfigError;
pub use mirror_list::{Bucket, MirrorEntry, MirrorList, PartitionedPackages};
pub use package_config::{PackageConfig, PackageRequest};
pub use pipeline::{RunOutcome, WrittenList, run, run_with};
pub use resolver::{DryRunReport, InvokeMode, LinkedPackage, Resolver, SubprocessResolver};
