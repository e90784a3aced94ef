use thiserror::Error;

use tally_config::ConfigError;
use tally_core::CoreError;

/// Top-level error for the CLI and library glue.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Usage(String),
}

