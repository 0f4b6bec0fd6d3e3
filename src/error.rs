//! Error types shared by the pipeline, the CLI and the HTTP layer.

use thiserror::Error;

/// Result type alias for document generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a request into a PDF.
#[derive(Error, Debug)]
pub enum Error {
    /// A required parameter is missing or could not be parsed.
    #[error("{0}")]
    InvalidRequest(String),

    /// A parameter parsed fine but its value cannot be laid out.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The font could not be read or parsed.
    #[error("failed to load font: {0}")]
    FontLoad(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the caller is at fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidRequest(_) | Error::InvalidParameter { .. })
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
