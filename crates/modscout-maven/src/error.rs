//! Errors specific to Maven and jar handling.

use thiserror::Error;

/// Errors that can occur during Maven operations.
#[derive(Error, Debug)]
pub enum MavenError {
    /// Failed to parse pom.xml or settings.xml
    #[error("Failed to parse XML: {source}")]
    XmlParseError {
        #[source]
        source: quick_xml::Error,
    },

    /// Failed to read a jar archive
    #[error("Failed to read jar {path}: {source}")]
    JarError {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// Malformed class file inside a jar
    #[error("Invalid class file {entry}")]
    InvalidClassFile { entry: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Maven operations.
pub type Result<T> = std::result::Result<T, MavenError>;

impl From<quick_xml::Error> for MavenError {
    fn from(source: quick_xml::Error) -> Self {
        Self::XmlParseError { source }
    }
}

/// Convert MavenError to ScoutError for the engine boundary
impl From<MavenError> for modscout_core::ScoutError {
    fn from(err: MavenError) -> Self {
        match err {
            MavenError::Io(e) => Self::Io(e),
            MavenError::XmlParseError { .. } => Self::parse_error("pom.xml", err),
            MavenError::JarError { .. } | MavenError::InvalidClassFile { .. } => {
                Self::parse_error("jar", err)
            }
        }
    }
}

/// Convert ScoutError to MavenError
impl From<modscout_core::ScoutError> for MavenError {
    fn from(err: modscout_core::ScoutError) -> Self {
        match err {
            modscout_core::ScoutError::Io(e) => Self::Io(e),
            other => Self::Io(std::io::Error::other(other.to_string())),
        }
    }
}
