use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Failure of a catalog request.
///
/// Carried inside actions, so it stays cloneable and serializable for the
/// debug session's action replay.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request failed with status {status}")]
    Status { status: u16 },
    #[error("Pokémon not found: {name}")]
    NotFound { name: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status } => Some(*status),
            FetchError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// Failure writing a persisted value. Reads never fail; they fall back to
/// defaults instead.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
