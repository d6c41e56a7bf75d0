use thiserror::Error;

use crate::backend::BackendError;
use crate::locus::LocusError;

/// Errors surfaced by the search orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// User input problem. Never retried.
    #[error("{0}")]
    InvalidSearch(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl SearchError {
    pub fn invalid(message: impl Into<String>) -> Self {
        SearchError::InvalidSearch(message.into())
    }

    pub fn is_invalid_search(&self) -> bool {
        matches!(self, SearchError::InvalidSearch(_))
    }
}

impl From<LocusError> for SearchError {
    fn from(e: LocusError) -> Self {
        SearchError::InvalidSearch(e.to_string())
    }
}

/// Convenience result type for orchestrator operations.
pub type SearchResult<T> = Result<T, SearchError>;
