//! Error types for the boundaries of the engine.
//!
//! The classification, prioritization, filtering and formatting functions are
//! total and never fail. Errors only come from the edges: reading a feed
//! batch, parsing configuration, or constructing a lookback window from a
//! value that is not a positive duration.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which collection a duplicate identifier was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Outbreak,
    Alert,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Outbreak => write!(f, "outbreak"),
            RecordKind::Alert => write!(f, "alert"),
        }
    }
}

/// Main error type for outbreakmap operations
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Two records of the same kind share an identifier
    #[error("Duplicate {kind} identifier '{id}' in batch")]
    DuplicateId { kind: RecordKind, id: String },

    /// Lookback windows must be positive and finite
    #[error("Invalid lookback window: {0} hours (must be positive)")]
    InvalidWindow(f64),

    /// A timestamp supplied by the caller could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a duplicate identifier error
    pub fn duplicate(kind: RecordKind, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
