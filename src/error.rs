//! Error handling for snapdiff
//!
//! Loading a snapshot and reading the configuration are the only fallible
//! steps; the comparison engine itself never fails. The application layer
//! wraps these typed errors in anyhow for context chaining.

use thiserror::Error;

/// Why a snapshot could not be loaded. Fatal for that snapshot.
#[derive(Error, Debug)]
pub enum LoadFailure {
    #[error("could not read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a readable table: {0}")]
    Csv(#[from] csv::Error),

    #[error("snapshot is empty (no header row)")]
    Empty,

    #[error("missing required column(s): {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

/// Problems with the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}
