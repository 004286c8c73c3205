//! Errors specific to Rust crate handling.
//!
//! These errors cover parsing Cargo.toml files and reading crate sources
//! from vendor directories and the cargo registry cache.

use thiserror::Error;

/// Errors specific to Rust crate handling.
#[derive(Error, Debug)]
pub enum CargoError {
    /// Failed to parse Cargo.toml
    #[error("Failed to parse Cargo.toml: {source}")]
    TomlParseError {
        #[source]
        source: toml_edit::TomlError,
    },

    /// Invalid semver version requirement
    #[error("Invalid semver version requirement '{specifier}': {message}")]
    InvalidVersionSpecifier { specifier: String, message: String },

    /// Crate source not present in any local source directory
    #[error("Sources of crate '{package}' not found locally")]
    CrateNotFound { package: String },

    /// Failed to deserialize `cargo metadata` output
    #[error("Failed to parse cargo metadata output: {source}")]
    MetadataError {
        #[source]
        source: serde_json::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Cargo operations.
pub type Result<T> = std::result::Result<T, CargoError>;

impl From<semver::Error> for CargoError {
    fn from(err: semver::Error) -> Self {
        Self::InvalidVersionSpecifier {
            specifier: String::new(),
            message: err.to_string(),
        }
    }
}

/// Convert from modscout_core::ScoutError for compatibility
impl From<modscout_core::ScoutError> for CargoError {
    fn from(err: modscout_core::ScoutError) -> Self {
        match err {
            modscout_core::ScoutError::Io(e) => Self::Io(e),
            other => Self::Io(std::io::Error::other(other.to_string())),
        }
    }
}

/// Convert to modscout_core::ScoutError for interoperability
impl From<CargoError> for modscout_core::ScoutError {
    fn from(err: CargoError) -> Self {
        match err {
            CargoError::Io(e) => Self::Io(e),
            CargoError::TomlParseError { .. } => Self::parse_error("Cargo.toml", err),
            CargoError::MetadataError { .. } => Self::parse_error("cargo metadata", err),
            CargoError::InvalidVersionSpecifier { .. } | CargoError::CrateNotFound { .. } => {
                Self::parse_error("crate", err)
            }
        }
    }
}
