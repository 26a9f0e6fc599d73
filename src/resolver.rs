//! Resolver invocation and report decoding.
//!
//! The resolver is only ever asked for a dry run. Its JSON report is decoded
//! into typed records; the one part this tool depends on is `actions.LINK`,
//! the list of packages the resolver would link into the environment.
//!
//! The exit status is deliberately not used to decide success. A resolver
//! that fails still prints JSON, and that JSON is what decides whether the
//! run can continue.

use serde::{Deserialize, Serialize};
use std::process::Stdio;
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::command::ResolverCommand;
use crate::error::{MirrorConfigError, Result};
use crate::child_process::CommandParentDeath;

/// How far the pipeline goes with the built command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum InvokeMode {
    /// Print the command and stop
    ShowOnly,
    /// Run the resolver and write mirror lists
    #[default]
    Execute,
}

impl InvokeMode {
    pub fn from_show_command(show_command: bool) -> Self {
        if show_command {
            Self::ShowOnly
        } else {
            Self::Execute
        }
    }
}

/// A package the resolver would link, as reported under `actions.LINK`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedPackage {
    pub platform: String,
    pub name: String,
    pub version: String,
    pub build_string: String,
}

/// Decoded dry-run report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DryRunReport {
    pub link: Vec<LinkedPackage>,
}

#[derive(Deserialize)]
struct RawReport {
    actions: Option<RawActions>,
    message: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawActions {
    #[serde(rename = "LINK")]
    link: Option<Vec<LinkedPackage>>,
}

/// Longest stdout excerpt quoted back in a parse error
const EXCERPT_LEN: usize = 200;

impl DryRunReport {
    /// Decode the resolver's raw stdout
    pub fn from_stdout(stdout: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(stdout).map_err(|e| {
            MirrorConfigError::resolver(format!("Resolver output is not valid UTF-8: {}", e))
        })?;
        Self::parse(text)
    }

    /// Decode a JSON report
    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawReport = serde_json::from_str(json).map_err(|e| {
            let excerpt: String = json.trim().chars().take(EXCERPT_LEN).collect();
            MirrorConfigError::resolver(format!(
                "Resolver output is not a valid JSON report ({}): {:?}",
                e, excerpt
            ))
        })?;

        match raw.actions.and_then(|actions| actions.link) {
            Some(link) => Ok(Self { link }),
            None => {
                let detail = raw
                    .error
                    .or(raw.message)
                    .map(|v| match v {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    });
                Err(MirrorConfigError::resolver(match detail {
                    Some(detail) => format!(
                        "Resolver report has no `actions.LINK` entry; resolver said: {}",
                        detail
                    ),
                    None => "Resolver report has no `actions.LINK` entry".to_string(),
                }))
            }
        }
    }
}

/// Anything that can turn a dry-run command into a report
pub trait Resolver {
    fn resolve(&self, command: &ResolverCommand) -> Result<DryRunReport>;
}

/// Runs the resolver as a child process and reads its stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct SubprocessResolver;

impl Resolver for SubprocessResolver {
    fn resolve(&self, command: &ResolverCommand) -> Result<DryRunReport> {
        info!("Get package meta data...");
        debug!("Spawning resolver: {} {:?}", command.program(), command.args());

        // Blocks until the resolver exits; there is no timeout
        let output = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .dies_with_parent()
            .output()
            .map_err(|e| {
                MirrorConfigError::resolver(format!(
                    "Failed to run resolver `{}`: {}",
                    command.program(),
                    e
                ))
            })?;

        if !output.status.success() {
            warn!(
                "Resolver exited with {}; using its report anyway",
                output.status
            );
        }
        debug!("Resolver wrote {} byte(s) to stdout", output.stdout.len());

        let report = DryRunReport::from_stdout(&output.stdout)?;
        info!("Resolver would link {} package(s)", report.link.len());
        Ok(report)
    }
}
