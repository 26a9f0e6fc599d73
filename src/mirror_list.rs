//! Mirror list partitioning and YAML emission.
//!
//! `conda-mirror` takes a blacklist and a whitelist per platform directory.
//! Every list written here blacklists everything (`name: "*"`) and then
//! whitelists exactly the builds the resolver picked, so the mirror carries
//! nothing else.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use strum::{Display, EnumIter};
use tracing::info;

use crate::error::{MirrorConfigError, Result};
use crate::resolver::LinkedPackage;

/// Platform label the resolver uses for platform-independent packages
pub const NOARCH_PLATFORM: &str = "noarch";

/// Which output file a resolved package lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Bucket {
    Noarch,
    Arch,
}

impl Bucket {
    /// Bucket for a resolver platform label. Only the exact label `noarch`
    /// is platform independent.
    pub fn for_platform(platform: &str) -> Self {
        if platform == NOARCH_PLATFORM {
            Self::Noarch
        } else {
            Self::Arch
        }
    }
}

/// One pinned build in a whitelist
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MirrorEntry {
    pub name: String,
    pub version: String,
    pub build: String,
}

impl From<&LinkedPackage> for MirrorEntry {
    fn from(package: &LinkedPackage) -> Self {
        Self {
            name: package.name.clone(),
            version: package.version.clone(),
            build: package.build_string.clone(),
        }
    }
}

/// Blacklist pattern entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlacklistEntry {
    pub name: String,
}

impl BlacklistEntry {
    /// Matches every package
    pub fn everything() -> Self {
        Self {
            name: "*".to_string(),
        }
    }
}

/// A single `conda-mirror` configuration document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MirrorList {
    pub blacklist: Vec<BlacklistEntry>,
    pub whitelist: Vec<MirrorEntry>,
}

impl MirrorList {
    /// Block everything except `whitelist`
    pub fn new(whitelist: Vec<MirrorEntry>) -> Self {
        Self {
            blacklist: vec![BlacklistEntry::everything()],
            whitelist,
        }
    }

    /// Render as YAML with every scalar double-quoted.
    ///
    /// `conda-mirror` reads YAML 1.1, where plain scalars such as `1_000`,
    /// `1:2`, `on` or `2023-01-01` decode as numbers, booleans or dates.
    /// Double-quoted scalars always decode as strings, and a JSON string
    /// literal is a valid YAML double-quoted scalar.
    pub fn to_yaml_string(&self) -> String {
        let mut yaml = String::new();

        if self.blacklist.is_empty() {
            yaml.push_str("blacklist: []\n");
        } else {
            yaml.push_str("blacklist:\n");
            for entry in &self.blacklist {
                yaml.push_str(&format!("- name: {}\n", quoted(&entry.name)));
            }
        }

        if self.whitelist.is_empty() {
            yaml.push_str("whitelist: []\n");
        } else {
            yaml.push_str("whitelist:\n");
            for entry in &self.whitelist {
                yaml.push_str(&format!(
                    "- name: {}\n  version: {}\n  build: {}\n",
                    quoted(&entry.name),
                    quoted(&entry.version),
                    quoted(&entry.build)
                ));
            }
        }

        yaml
    }

    /// Write to `path`, replacing any existing file.
    /// The parent directory must already exist.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_yaml_string()).map_err(|e| {
            MirrorConfigError::output(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!(
            "Wrote {} whitelisted package(s) to {}",
            self.whitelist.len(),
            path.display()
        );
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

fn quoted(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Resolved packages split by bucket, each in resolver order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartitionedPackages {
    pub noarch: Vec<MirrorEntry>,
    pub arch: Vec<MirrorEntry>,
}

impl PartitionedPackages {
    /// Split `packages` by `platform == "noarch"`, keeping resolver order
    pub fn partition(packages: &[LinkedPackage]) -> Self {
        let mut partitioned = Self::default();
        for package in packages {
            partitioned
                .bucket_mut(Bucket::for_platform(&package.platform))
                .push(MirrorEntry::from(package));
        }
        partitioned
    }

    pub fn bucket(&self, bucket: Bucket) -> &[MirrorEntry] {
        match bucket {
            Bucket::Noarch => &self.noarch,
            Bucket::Arch => &self.arch,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<MirrorEntry> {
        match bucket {
            Bucket::Noarch => &mut self.noarch,
            Bucket::Arch => &mut self.arch,
        }
    }

    pub fn mirror_list(&self, bucket: Bucket) -> MirrorList {
        MirrorList::new(self.bucket(bucket).to_vec())
    }

    pub fn len(&self) -> usize {
        self.noarch.len() + self.arch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
