//! command.rs - Builds the resolver's dry-run install invocation.
//!
//! The command is kept as a program plus a discrete argument vector and handed
//! straight to `std::process::Command`, so package names never pass through a
//! shell. The space-joined textual form exists only for display.

use std::fmt;
use std::process::Command;

use crate::package_config::PackageRequest;

/// Resolver used when none is configured
pub const DEFAULT_RESOLVER: &str = "conda";

/// Channel used when none is configured
pub const DEFAULT_CHANNEL: &str = "conda-forge";

/// A fully built resolver invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverCommand {
    program: String,
    args: Vec<String>,
    /// Index in `args` where the package match specs begin
    specs_start: usize,
}

impl ResolverCommand {
    /// Corresponds to
    /// `<program> install --channel <channel> --override-channel --json --dry-run <specs...>`
    pub fn dry_run_install(program: &str, channel: &str, packages: &[PackageRequest]) -> Self {
        let mut args: Vec<String> = [
            "install",
            "--channel",
            channel,
            "--override-channel",
            "--json",
            "--dry-run",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let specs_start = args.len();
        args.extend(packages.iter().map(PackageRequest::to_match_spec));

        Self {
            program: program.to_string(),
            args,
            specs_start,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The package match specs at the tail of the argument vector
    pub fn match_specs(&self) -> &[String] {
        &self.args[self.specs_start..]
    }

    /// A `std::process::Command` ready to spawn, with no stdio configured
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for ResolverCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
