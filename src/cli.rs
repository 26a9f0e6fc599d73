use clap::Parser;
use std::path::PathBuf;

use crate::command::{DEFAULT_CHANNEL, DEFAULT_RESOLVER};
use crate::config::{
    DEFAULT_ARCH_PLATFORM, DEFAULT_PACKAGE_CONFIG_PATH, DEFAULT_YAML_OUTPUT_DIRECTORY, RunConfig,
};
use crate::resolver::InvokeMode;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "generate-conda-mirror-config")]
#[command(about = "Generate conda-mirror whitelist configuration from a package list")]
#[command(version)]
pub struct Cli {
    /// Package list to be mirrored (JSON with a `PackageInfo` array)
    #[arg(long = "packageConfigPath", value_name = "PATH", default_value = DEFAULT_PACKAGE_CONFIG_PATH)]
    pub package_config_path: PathBuf,

    /// Directory the YAML mirror lists are written to, for use with conda-mirror
    #[arg(long = "yamlOutputDirectoryPath", value_name = "DIR", default_value = DEFAULT_YAML_OUTPUT_DIRECTORY)]
    pub yaml_output_directory_path: PathBuf,

    /// Only print the resolver command; do not run it
    #[arg(long = "show-command")]
    pub show_command: bool,

    /// Resolver executable
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_RESOLVER)]
    pub resolver: String,

    /// Channel the resolver is restricted to
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// Platform name used for the arch-specific mirror list file
    #[arg(long, value_name = "PLATFORM", default_value = DEFAULT_ARCH_PLATFORM)]
    pub arch_platform: String,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        Self {
            package_config_path: cli.package_config_path,
            output_directory: cli.yaml_output_directory_path,
            mode: InvokeMode::from_show_command(cli.show_command),
            resolver: cli.resolver.trim().to_string(),
            channel: cli.channel.trim().to_string(),
            arch_platform: cli.arch_platform.trim().to_string(),
        }
    }
}
