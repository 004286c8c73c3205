//! Errors specific to Go module handling.

use thiserror::Error;

/// Errors that can occur during Go module operations.
#[derive(Error, Debug)]
pub enum GoError {
    /// Package not present in vendor/, the module cache or a replacement
    #[error("Package '{package}' not found")]
    PackageNotFound { package: String },

    /// Failed to deserialize `go list -json` output
    #[error("Failed to parse go list output: {source}")]
    GoListError {
        #[source]
        source: serde_json::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Go operations.
pub type Result<T> = std::result::Result<T, GoError>;

impl GoError {
    pub fn package_not_found(package: impl Into<String>) -> Self {
        Self::PackageNotFound {
            package: package.into(),
        }
    }
}

/// Convert GoError to ScoutError for the engine boundary
impl From<GoError> for modscout_core::ScoutError {
    fn from(err: GoError) -> Self {
        match err {
            GoError::Io(e) => Self::Io(e),
            GoError::GoListError { .. } => Self::parse_error("go list", err),
            GoError::PackageNotFound { .. } => Self::parse_error("go.mod", err),
        }
    }
}

/// Convert ScoutError to GoError
impl From<modscout_core::ScoutError> for GoError {
    fn from(err: modscout_core::ScoutError) -> Self {
        match err {
            modscout_core::ScoutError::Io(e) => Self::Io(e),
            other => Self::Io(std::io::Error::other(other.to_string())),
        }
    }
}
