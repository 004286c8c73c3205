//! Errors specific to Python module handling.

use thiserror::Error;

/// Errors specific to Python module handling.
///
/// Covers pyproject.toml and requirements.txt parsing and reading package
/// sources. The engine logs these and degrades to empty results.
#[derive(Error, Debug)]
pub enum PypiError {
    /// Failed to parse pyproject.toml
    #[error("Failed to parse pyproject.toml: {source}")]
    TomlParseError {
        #[source]
        source: toml_edit::TomlError,
    },

    /// Invalid PEP 508 dependency specification
    #[error("Invalid PEP 508 dependency specification: {source}")]
    InvalidDependencySpec {
        #[source]
        source: Box<pep508_rs::Pep508Error>,
    },

    /// Package not importable from any site-packages directory
    #[error("Module '{module}' not found in site-packages")]
    ModuleNotFound { module: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Python operations.
pub type Result<T> = std::result::Result<T, PypiError>;

impl From<pep508_rs::Pep508Error> for PypiError {
    fn from(err: pep508_rs::Pep508Error) -> Self {
        Self::InvalidDependencySpec {
            source: Box::new(err),
        }
    }
}

/// Convert from modscout_core::ScoutError for compatibility
impl From<modscout_core::ScoutError> for PypiError {
    fn from(err: modscout_core::ScoutError) -> Self {
        match err {
            modscout_core::ScoutError::Io(e) => Self::Io(e),
            other => Self::Io(std::io::Error::other(other.to_string())),
        }
    }
}

/// Convert to modscout_core::ScoutError for interoperability
impl From<PypiError> for modscout_core::ScoutError {
    fn from(err: PypiError) -> Self {
        match err {
            PypiError::Io(e) => Self::Io(e),
            PypiError::TomlParseError { .. } => Self::parse_error("pyproject.toml", err),
            PypiError::InvalidDependencySpec { .. } | PypiError::ModuleNotFound { .. } => {
                Self::parse_error("requirement", err)
            }
        }
    }
}
