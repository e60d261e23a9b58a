use thiserror::Error;

/// Errors produced while building, validating or converting execution model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Input violates a model invariant (duplicate local identifiers, dangling references,
    /// misplaced measure group, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Date format string outside of the supported set.
    #[error("unsupported date format '{0}'")]
    UnsupportedFormat(String),
    #[error("value '{value}' does not match date format {format}")]
    InvalidDate { value: String, format: String },
    #[error("failed to serialize model value: {0}")]
    Serialization(String),
}

impl ModelError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ModelError::InvalidInput(message.into())
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
