//! Error types for csvhouse

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading a file
#[derive(Debug, Error)]
pub enum Error {
    /// The input file could not be opened or read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not well-formed CSV
    #[error("malformed CSV in {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    /// The input parsed but cannot be loaded as-is
    #[error("{0}")]
    Validation(String),

    /// The database rejected a statement or could not be reached
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage(message.into())
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}
