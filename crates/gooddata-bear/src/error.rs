use gooddata_model::ModelError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BearError {
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The definition uses something the Bear execution API cannot express.
    #[error("not supported by bear: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, BearError>;
