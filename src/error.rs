use std::path::PathBuf;

use thiserror::Error;

/// Central error type for the stem-harness crate.
#[derive(Debug, Error)]
pub enum HarnessError {
    // Generic fallback (wraps anyhow)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),

    // Configuration
    #[error("Config file not found at {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid JSON in the config file: {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // Audio
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to decode audio file {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },

    #[error("Resampling failed: {0}")]
    Resample(String),

    // Backends
    #[error("Backend program `{program}` is not available")]
    BackendUnavailable { program: String },

    #[error("{backend} failed ({status}): {stderr}")]
    BackendFailed {
        backend: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{backend} produced no stems")]
    NoStems { backend: &'static str },
}

// --- Implement From conversions for common errors ---
impl From<std::io::Error> for HarnessError {
    fn from(e: std::io::Error) -> Self {
        HarnessError::Anyhow(e.into())
    }
}

impl From<hound::Error> for HarnessError {
    fn from(e: hound::Error) -> Self {
        HarnessError::Anyhow(e.into())
    }
}

impl From<walkdir::Error> for HarnessError {
    fn from(e: walkdir::Error) -> Self {
        HarnessError::Anyhow(e.into())
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
