//! Read-only store capabilities consumed by the search engine and metrics.
//!
//! Persistence is an external collaborator. The engine only needs a few
//! narrow lookups, so each one is its own trait instead of a general
//! repository supertype:
//!
//! - `LinkIndex`: module id -> content ids
//! - `ContentLookup`: content ids -> content
//! - `ContentListing`: the full content universe
//! - `ModuleDirectory`: module counts for reporting
//!
//! Two adapters are provided: `MemoryStore` (JSON snapshot) and
//! `SqliteStore`.

pub mod memory;
pub mod snapshot;
pub mod sqlite;

use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Content, ContentId, ModuleId};

pub use memory::MemoryStore;
pub use snapshot::CatalogSnapshot;
pub use sqlite::SqliteStore;

/// Result alias for store lookups
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Module -> content association lookup
#[async_trait]
pub trait LinkIndex: Send + Sync {
    /// Content ids linked to a module. Unknown modules yield an empty set.
    async fn content_ids_for_module(&self, module_id: ModuleId) -> StoreResult<BTreeSet<ContentId>>;
}

/// Content resolution by id
#[async_trait]
pub trait ContentLookup: Send + Sync {
    /// Resolve ids to content. Ids without content are skipped.
    async fn by_ids(&self, ids: &BTreeSet<ContentId>) -> StoreResult<Vec<Content>>;
}

/// Access to the whole content universe
#[async_trait]
pub trait ContentListing: Send + Sync {
    /// All content currently known to the store
    async fn all(&self) -> StoreResult<Vec<Content>>;
}

/// Module statistics for reporting
#[async_trait]
pub trait ModuleDirectory: Send + Sync {
    /// Number of distinct modules
    async fn module_count(&self) -> StoreResult<usize>;

    /// Number of links owned by a module. Unknown modules own none.
    async fn link_count(&self, module_id: ModuleId) -> StoreResult<usize>;
}

/// Every capability at once, for callers that pick a backend at runtime
pub trait CatalogStore: LinkIndex + ContentLookup + ContentListing + ModuleDirectory {}

impl<T> CatalogStore for T where T: LinkIndex + ContentLookup + ContentListing + ModuleDirectory {}
