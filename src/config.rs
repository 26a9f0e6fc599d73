//! Run configuration
//!
//! Everything a run needs is collected into one `RunConfig` at startup and
//! passed down by reference. Nothing is read from process-wide state after
//! that point.

use std::path::PathBuf;

use crate::command::{DEFAULT_CHANNEL, DEFAULT_RESOLVER};
use crate::error::{MirrorConfigError, Result};
use crate::mirror_list::{Bucket, NOARCH_PLATFORM};
use crate::resolver::InvokeMode;

/// Package list read when `--packageConfigPath` is not given
pub const DEFAULT_PACKAGE_CONFIG_PATH: &str = "/etc/conda_mirror/package_config.json";

/// Directory the mirror lists are written to when `--yamlOutputDirectoryPath` is not given
pub const DEFAULT_YAML_OUTPUT_DIRECTORY: &str = "/var/lib/conda_mirror";

/// Platform whose mirror list receives every non-noarch package
pub const DEFAULT_ARCH_PLATFORM: &str = "osx-arm64";

/// Extension of the generated mirror lists
const MIRROR_LIST_EXTENSION: &str = "yml";

/// Settings for a single generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub package_config_path: PathBuf,
    pub output_directory: PathBuf,
    pub mode: InvokeMode,
    pub resolver: String,
    pub channel: String,
    pub arch_platform: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            package_config_path: PathBuf::from(DEFAULT_PACKAGE_CONFIG_PATH),
            output_directory: PathBuf::from(DEFAULT_YAML_OUTPUT_DIRECTORY),
            mode: InvokeMode::default(),
            resolver: DEFAULT_RESOLVER.to_string(),
            channel: DEFAULT_CHANNEL.to_string(),
            arch_platform: DEFAULT_ARCH_PLATFORM.to_string(),
        }
    }
}

impl RunConfig {
    /// Check settings that would otherwise fail halfway through a run
    pub fn validate(&self) -> Result<()> {
        if self.resolver.trim().is_empty() {
            return Err(MirrorConfigError::config("Resolver program must be specified"));
        }

        if self.channel.trim().is_empty() {
            return Err(MirrorConfigError::config("Channel must be specified"));
        }

        let platform = self.arch_platform.as_str();
        if platform.trim().is_empty() {
            return Err(MirrorConfigError::config("Arch platform must be specified"));
        }
        if platform.trim() != platform {
            return Err(MirrorConfigError::config(format!(
                "Arch platform `{}` cannot have surrounding whitespace",
                platform
            )));
        }
        if platform == NOARCH_PLATFORM {
            return Err(MirrorConfigError::config(
                "Arch platform cannot be `noarch`; both mirror lists would share one file",
            ));
        }
        if platform.contains(std::path::MAIN_SEPARATOR) || platform.contains('/') {
            return Err(MirrorConfigError::config(format!(
                "Arch platform `{}` cannot contain a path separator",
                platform
            )));
        }

        Ok(())
    }

    /// File name of the mirror list for `bucket`
    pub fn file_name(&self, bucket: Bucket) -> String {
        let stem = match bucket {
            Bucket::Noarch => NOARCH_PLATFORM,
            Bucket::Arch => self.arch_platform.as_str(),
        };
        format!("{}.{}", stem, MIRROR_LIST_EXTENSION)
    }

    /// Where the mirror list for `bucket` is written
    pub fn output_path(&self, bucket: Bucket) -> PathBuf {
        self.output_directory.join(self.file_name(bucket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_config() {
        let config = RunConfig::default();
        assert_eq!(
            config.package_config_path,
            PathBuf::from("/etc/conda_mirror/package_config.json")
        );
        assert_eq!(config.mode, InvokeMode::Execute);
        assert_eq!(config.resolver, "conda");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_paths_use_output_directory() {
        let config = RunConfig {
            output_directory: PathBuf::from("/srv/mirror"),
            ..Default::default()
        };
        assert_eq!(
            config.output_path(Bucket::Noarch),
            PathBuf::from("/srv/mirror/noarch.yml")
        );
        assert_eq!(
            config.output_path(Bucket::Arch),
            PathBuf::from("/srv/mirror/osx-arm64.yml")
        );
    }

    #[test]
    fn test_arch_file_follows_platform() {
        let config = RunConfig {
            arch_platform: "linux-64".to_string(),
            ..Default::default()
        };
        assert_eq!(config.file_name(Bucket::Arch), "linux-64.yml");
        assert_eq!(config.file_name(Bucket::Noarch), "noarch.yml");
    }

    #[test]
    fn test_validation_rejects_noarch_platform() {
        let config = RunConfig {
            arch_platform: "noarch".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_path_in_platform() {
        let config = RunConfig {
            arch_platform: "../osx-arm64".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_padded_platform() {
        let config = RunConfig {
            arch_platform: "linux-64 ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn test_validation_rejects_empty_resolver() {
        let config = RunConfig {
            resolver: "  ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Resolver"));
    }
}
