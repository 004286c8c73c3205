use thiserror::Error;

/// Core error types for modscout.
///
/// Only [`ScoutError::UnsupportedEcosystem`] and [`ScoutError::InvalidRequest`]
/// are expected to reach a caller. Parse and external tool failures are
/// recovered inside the engines and surface as empty results.
///
/// # Examples
///
/// ```
/// use modscout_core::error::{ScoutError, Result};
///
/// fn lookup(id: &str) -> Result<()> {
///     if id != "rust" {
///         return Err(ScoutError::UnsupportedEcosystem(id.into()));
///     }
///     Ok(())
/// }
///
/// assert!(lookup("cobol").is_err());
/// ```
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("failed to parse {file_type}: {source}")]
    ParseError {
        file_type: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("external tool `{tool}` failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("unsupported ecosystem: {0}")]
    UnsupportedEcosystem(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScoutError {
    /// Create an external tool error.
    pub fn external_tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a parse error from any error type.
    pub fn parse_error(
        file_type: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ParseError {
            file_type: file_type.into(),
            source: Box::new(error),
        }
    }
}

/// Convenience type alias for `Result<T, ScoutError>`.
pub type Result<T> = std::result::Result<T, ScoutError>;
