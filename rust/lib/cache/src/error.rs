use stagecast_client::ApiError;
use thiserror::Error;

/// Error returned by cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Rejected locally before any network call; state untouched.
    #[error("validation: {0}")]
    Validation(String),

    /// The entity is not in local state.
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CacheError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CacheError::Api(e) if e.is_unauthorized())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CacheError::Validation(msg.into())
    }

    pub fn not_found(what: &str, id: &str) -> Self {
        CacheError::NotFound(format!("{what} {id}"))
    }
}
