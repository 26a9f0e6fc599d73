//! Package list loading.
//!
//! The package list is a JSON document of the form
//! `{"PackageInfo": [{"name": "numpy", "version": "1.24.0"}, ...]}`.
//! Both keys are required on every record; an empty or `null` version means
//! the resolver is free to pick the latest release.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{MirrorConfigError, Result};

/// The package list read from `--packageConfigPath`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    #[serde(rename = "PackageInfo")]
    pub packages: Vec<PackageRequest>,
}

/// A single package the mirror should carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequest {
    pub name: String,
    /// Key must be present; the value may be `null`
    #[serde(deserialize_with = "Option::deserialize")]
    pub version: Option<String>,
}

impl PackageRequest {
    /// Request pinned to an exact version
    pub fn pinned(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }

    /// Request without a version pin
    pub fn latest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Version pin, if any. Empty strings count as unpinned.
    pub fn pin(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }

    /// Resolver match spec: `name` or `name=version`
    pub fn to_match_spec(&self) -> String {
        match self.pin() {
            Some(version) => format!("{}={}", self.name, version),
            None => self.name.clone(),
        }
    }
}

impl PackageConfig {
    /// Load the package list from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MirrorConfigError::config(format!(
                "Failed to read package config {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::parse(&content).map_err(|e| {
            MirrorConfigError::config(format!(
                "Failed to parse package config {}: {}",
                path.display(),
                e
            ))
        })?;

        info!("Load config from: {}", path.display());
        debug!("{} package(s) requested", config.packages.len());
        Ok(config)
    }

    /// Parse the package list from a JSON string
    pub fn parse(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Match specs for every request, in file order
    pub fn match_specs(&self) -> Vec<String> {
        self.packages.iter().map(PackageRequest::to_match_spec).collect()
    }
}
