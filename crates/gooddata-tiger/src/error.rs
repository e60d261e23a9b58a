use gooddata_model::ModelError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TigerError {
    #[error(transparent)]
    Model(#[from] ModelError),
    /// Tiger addresses metadata objects by identifier only.
    #[error("unsupported object reference {0}")]
    UnsupportedRef(String),
    #[error("not supported by tiger: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, TigerError>;
