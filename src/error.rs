// Appeals Desk - Error Types
// Only operations that touch the filesystem or check preconditions can fail.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the appeals library
#[derive(Debug, Error)]
pub enum AppealsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid claims CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("No verification is open")]
    NoActiveVerification,

    #[error("No appeal draft to send for claim {0}")]
    NoAppealDraft(String),
}

impl AppealsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppealsError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppealsError>;
