//! Error handling for the mirror config generator
//!
//! Every failure is fatal. The variants only separate where the run broke
//! (reading input, talking to the resolver, writing output) so the binary
//! can report it clearly before exiting non-zero.

use thiserror::Error;

/// Main error type for the mirror config generator
#[derive(Error, Debug)]
pub enum MirrorConfigError {
    /// Package list or run settings could not be loaded or are invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resolver could not be spawned or produced unusable output
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// Mirror list could not be written
    #[error("Output error: {0}")]
    Output(String),

    /// IO errors not tied to a specific stage
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML errors when reading a mirror list back
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for mirror config operations
pub type Result<T> = std::result::Result<T, MirrorConfigError>;

impl MirrorConfigError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a resolver error
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create an output error
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}
