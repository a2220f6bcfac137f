//! Error types shared across Cutline crates.
//!
//! Timeline transitions themselves never fail; these errors cover the
//! edges around them (configuration, scripts, external services).

use std::path::PathBuf;

/// Top-level error type for Cutline operations.
#[derive(Debug, thiserror::Error)]
pub enum CutlineError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid project: {message}")]
    Project { message: String },

    #[error("Generation service error: {message}")]
    Generation { message: String },

    #[error("Editor session closed")]
    SessionClosed,

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CutlineError.
pub type CutlineResult<T> = Result<T, CutlineError>;

impl CutlineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation {
            message: msg.into(),
        }
    }
}
