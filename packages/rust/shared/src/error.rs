//! Error types for payloadforge.
//!
//! Library crates use [`PayloadForgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Extraction and validation failures inside a pipeline run are *not* raised
//! through this type: they are reported as an [`ErrorRecord`](crate::ErrorRecord)
//! in the output. `PayloadForgeError` covers the boundary around a run
//! (config loading, reading input, item shape).

use std::path::PathBuf;

/// Top-level error type for all payloadforge operations.
#[derive(Debug, thiserror::Error)]
pub enum PayloadForgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Upstream input could not be interpreted as items.
    #[error("input error: {message}")]
    Input { message: String },

    /// No JSON object could be extracted or parsed from agent output.
    #[error("extraction error: {0}")]
    Extraction(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PayloadForgeError>;

impl PayloadForgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an input error from any displayable message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
