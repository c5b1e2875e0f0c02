//! Error types and error handling

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Toolkit error type
#[derive(Debug, Error)]
pub enum ToolkitError {
    /// Operator supplied arguments the toolkit cannot act on
    #[error("Usage error: {0}")]
    Usage(String),

    /// Filesystem operation failed
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Seeder aggregator file does not have the expected shape
    #[error("Seeder aggregator error: {0}")]
    Aggregator(String),

    /// Binding manifest could not be read or written
    #[error("Binding manifest error at {}: {source}", path.display())]
    Manifest {
        /// Manifest path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Template rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl ToolkitError {
    /// Build a [`ToolkitError::Usage`] from any message
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Wrap an I/O error together with the path it happened on
    pub fn filesystem(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the error was caused by operator input rather than the environment
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

impl From<figment::Error> for ToolkitError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Result alias used throughout the toolkit
pub type Result<T, E = ToolkitError> = std::result::Result<T, E>;
