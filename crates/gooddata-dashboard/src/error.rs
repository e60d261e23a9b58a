use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Builder or path pointed at a position that does not hold the expected element.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid persisted layout: {0}")]
    Persisted(String),
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        LayoutError::Persisted(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
