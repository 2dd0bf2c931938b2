//! JSON snapshot of a catalog.
//!
//! A snapshot is the full content/module/link dump a `MemoryStore` is built
//! from and the payload `SqliteStore::import_snapshot` seeds a database with.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::{Content, Link, Module};

use super::{StoreError, StoreResult};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized catalog contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// All content items (their `links` field is ignored on load)
    #[serde(default)]
    pub contents: Vec<Content>,

    /// All modules
    #[serde(default)]
    pub modules: Vec<Module>,

    /// All module/content associations
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSnapshot {
    /// Create a new empty snapshot
    pub fn new() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            contents: Vec::new(),
            modules: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Load a snapshot from disk. A missing file is an `Io` error.
    pub async fn load(path: &Path) -> StoreResult<Self> {
        let raw = fs::read_to_string(path).await?;
        let snapshot: Self = serde_json::from_str(&raw)?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StoreError::Integrity(format!(
                "Snapshot version {} is newer than supported version {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        Ok(snapshot)
    }

    /// Save the snapshot to disk
    pub async fn save(&self, path: &Path) -> StoreResult<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).await?;

        Ok(())
    }

    /// Check ids are unique and every link points at existing rows
    pub fn validate(&self) -> StoreResult<()> {
        let mut content_ids = BTreeSet::new();
        for content in &self.contents {
            if !content_ids.insert(content.id) {
                return Err(StoreError::Integrity(format!(
                    "Duplicate content id: {}",
                    content.id
                )));
            }
        }

        let mut module_ids = BTreeSet::new();
        for module in &self.modules {
            if !module_ids.insert(module.id) {
                return Err(StoreError::Integrity(format!(
                    "Duplicate module id: {}",
                    module.id
                )));
            }
        }

        let mut link_ids = BTreeSet::new();
        for link in &self.links {
            if !link_ids.insert(link.id) {
                return Err(StoreError::Integrity(format!("Duplicate link id: {}", link.id)));
            }
            if !module_ids.contains(&link.module_id) {
                return Err(StoreError::Integrity(format!(
                    "Link {} references unknown module {}",
                    link.id, link.module_id
                )));
            }
            if !content_ids.contains(&link.content_id) {
                return Err(StoreError::Integrity(format!(
                    "Link {} references unknown content {}",
                    link.id, link.content_id
                )));
            }
        }

        Ok(())
    }
}
