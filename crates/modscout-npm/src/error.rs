//! Errors specific to JavaScript/TypeScript module handling.

use thiserror::Error;

/// Errors specific to JavaScript/TypeScript module handling.
///
/// These errors cover parsing package.json files, reading module sources and
/// interrogating the Node.js runtime. The engine logs them and degrades to
/// empty results.
#[derive(Error, Debug)]
pub enum NpmError {
    /// Failed to parse package.json
    #[error("Failed to parse package.json: {source}")]
    JsonParseError {
        #[source]
        source: serde_json::Error,
    },

    /// Invalid package.json structure
    #[error("Invalid package.json structure: {message}")]
    InvalidStructure { message: String },

    /// Module could not be found in any node_modules directory
    #[error("Module '{module}' not found in node_modules")]
    ModuleNotFound { module: String },

    /// tree-sitter could not produce a syntax tree
    #[error("Failed to parse source '{path}': {message}")]
    SourceParseError { path: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for npm operations.
pub type Result<T> = std::result::Result<T, NpmError>;

impl NpmError {
    /// Create an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Create a source parse error.
    pub fn source_parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Convert from modscout_core::ScoutError for compatibility
impl From<modscout_core::ScoutError> for NpmError {
    fn from(err: modscout_core::ScoutError) -> Self {
        match err {
            modscout_core::ScoutError::Io(e) => Self::Io(e),
            modscout_core::ScoutError::Json(e) => Self::JsonParseError { source: e },
            other => Self::InvalidStructure {
                message: other.to_string(),
            },
        }
    }
}

/// Convert to modscout_core::ScoutError for interoperability
impl From<NpmError> for modscout_core::ScoutError {
    fn from(err: NpmError) -> Self {
        match err {
            NpmError::JsonParseError { source } => Self::Json(source),
            NpmError::Io(e) => Self::Io(e),
            NpmError::SourceParseError { path, message } => {
                Self::parse_error(path, std::io::Error::other(message))
            }
            other @ (NpmError::InvalidStructure { .. } | NpmError::ModuleNotFound { .. }) => {
                Self::parse_error("package.json", other)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NpmError::ModuleNotFound {
            module: "nonexistent".into(),
        };
        assert_eq!(err.to_string(), "Module 'nonexistent' not found in node_modules");

        let err = NpmError::invalid_structure("dependencies is not an object");
        assert_eq!(
            err.to_string(),
            "Invalid package.json structure: dependencies is not an object"
        );
    }

    #[test]
    fn test_conversion_to_scout_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: modscout_core::ScoutError = NpmError::JsonParseError { source: json_err }.into();
        assert!(matches!(err, modscout_core::ScoutError::Json(_)));

        let err: modscout_core::ScoutError = NpmError::source_parse("index.js", "bad").into();
        assert!(err.to_string().contains("index.js"));
    }

    #[test]
    fn test_conversion_from_scout_error() {
        let err: NpmError = modscout_core::ScoutError::UnsupportedEcosystem("x".into()).into();
        assert!(matches!(err, NpmError::InvalidStructure { .. }));
    }
}
