//! Error types shared by the search engine and metrics aggregator.

use thiserror::Error;

use crate::store::StoreError;

/// Result alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced to callers of the search and metrics layers.
///
/// "No matches" is never an error: it is `Ok` with an empty set.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A store lookup failed; the operation produced no result
    #[error("Lookup failed: {0}")]
    Lookup(#[from] StoreError),

    /// The request was rejected before reaching the engine
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CatalogError {
    /// Check if this error came from a store collaborator
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, CatalogError::Lookup(_))
    }
}
