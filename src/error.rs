//! Error types for exam extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using ExtractError.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can surface from extraction.
///
/// Missing card structure is never an error: absent containers degrade to
/// empty fragments, a `"0"` question number or an empty correct-answer set.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid CSS selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("document {name} is not valid UTF-8")]
    InvalidUtf8 { name: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown fragment type `{0}`")]
    UnknownFragmentType(String),
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
