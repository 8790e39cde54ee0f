//! # Asset Error Types
//!
//! All errors that can occur while resolving or reading model assets.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the asset core.
#[derive(Error, Debug)]
pub enum AssetError {
    /// No qualifying asset or buffer was found.
    #[error("{what} not found")]
    NotFound {
        /// What was being looked for.
        what: String,
        /// Every location that was checked, in search order.
        searched: Vec<String>,
    },

    /// A descriptor is not valid glTF JSON.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// The descriptor that failed to parse.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A filesystem operation failed for a reason other than absence.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path being read or listed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    /// Builds an [`AssetError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable kind, used in response bodies and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Parse { .. } => "parse_failure",
            Self::Io { .. } => "io_failure",
        }
    }
}

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
