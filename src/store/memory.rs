//! In-memory store built from a catalog snapshot.
//!
//! Links are indexed by module on construction and attached to their content,
//! so every lookup is a map access. The store is immutable once built and
//! can be shared across concurrent searches behind an `Arc`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::{Content, ContentId, Module, ModuleId};

use super::snapshot::CatalogSnapshot;
use super::{ContentListing, ContentLookup, LinkIndex, ModuleDirectory, StoreResult};

/// Immutable in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: BTreeMap<ContentId, Content>,
    modules: BTreeMap<ModuleId, Module>,
    by_module: HashMap<ModuleId, BTreeSet<ContentId>>,
    links_per_module: HashMap<ModuleId, usize>,
}

impl MemoryStore {
    /// Build a store from a snapshot, rejecting dangling links
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> StoreResult<Self> {
        if let Err(e) = snapshot.validate() {
            warn!(error = %e, "Rejecting catalog snapshot");
            return Err(e);
        }

        let mut contents: BTreeMap<ContentId, Content> = snapshot
            .contents
            .into_iter()
            .map(|mut content| {
                content.links.clear();
                (content.id, content)
            })
            .collect();

        let modules: BTreeMap<ModuleId, Module> = snapshot
            .modules
            .into_iter()
            .map(|module| (module.id, module))
            .collect();

        let mut by_module: HashMap<ModuleId, BTreeSet<ContentId>> = HashMap::new();
        let mut links_per_module: HashMap<ModuleId, usize> = HashMap::new();

        for link in snapshot.links {
            by_module
                .entry(link.module_id)
                .or_default()
                .insert(link.content_id);
            *links_per_module.entry(link.module_id).or_insert(0) += 1;

            if let Some(content) = contents.get_mut(&link.content_id) {
                content.links.push(link);
            }
        }

        Ok(Self {
            contents,
            modules,
            by_module,
            links_per_module,
        })
    }

    /// Load a JSON snapshot from disk and build a store from it
    pub async fn load(path: &Path) -> StoreResult<Self> {
        let snapshot = CatalogSnapshot::load(path).await?;
        let store = Self::from_snapshot(snapshot)?;

        info!(
            path = %path.display(),
            contents = store.contents.len(),
            modules = store.modules.len(),
            "Loaded catalog snapshot"
        );

        Ok(store)
    }

    /// Dump the store back into a snapshot
    pub fn to_snapshot(&self) -> CatalogSnapshot {
        let mut links: Vec<_> = self
            .contents
            .values()
            .flat_map(|content| content.links.iter().copied())
            .collect();
        links.sort_by_key(|link| link.id);

        CatalogSnapshot {
            contents: self
                .contents
                .values()
                .cloned()
                .map(|mut content| {
                    content.links.clear();
                    content
                })
                .collect(),
            modules: self.modules.values().cloned().collect(),
            links,
            ..CatalogSnapshot::new()
        }
    }

    /// Get the number of content items
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Check if the store holds no content
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

#[async_trait]
impl LinkIndex for MemoryStore {
    async fn content_ids_for_module(&self, module_id: ModuleId) -> StoreResult<BTreeSet<ContentId>> {
        Ok(self.by_module.get(&module_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ContentLookup for MemoryStore {
    async fn by_ids(&self, ids: &BTreeSet<ContentId>) -> StoreResult<Vec<Content>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.contents.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ContentListing for MemoryStore {
    async fn all(&self) -> StoreResult<Vec<Content>> {
        Ok(self.contents.values().cloned().collect())
    }
}

#[async_trait]
impl ModuleDirectory for MemoryStore {
    async fn module_count(&self) -> StoreResult<usize> {
        Ok(self.modules.len())
    }

    async fn link_count(&self, module_id: ModuleId) -> StoreResult<usize> {
        Ok(self.links_per_module.get(&module_id).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Link, LinkId};
    use crate::store::StoreError;

    fn sample_store() -> MemoryStore {
        let snapshot = CatalogSnapshot {
            contents: vec![
                Content::new(1, "Intro to Go", "Document"),
                Content::new(2, "Go Basics", "Code"),
                Content::new(3, "Java Intro", "Document"),
            ],
            modules: vec![Module::new(1, "Go"), Module::new(2, "Basics")],
            links: vec![
                Link::new(LinkId(1), ModuleId(1), ContentId(1)),
                Link::new(LinkId(2), ModuleId(1), ContentId(2)),
                Link::new(LinkId(3), ModuleId(2), ContentId(2)),
            ],
            ..CatalogSnapshot::new()
        };

        MemoryStore::from_snapshot(snapshot).unwrap()
    }

    #[tokio::test]
    async fn test_link_index() {
        let store = sample_store();

        let ids = store.content_ids_for_module(ModuleId(1)).await.unwrap();
        assert_eq!(ids, [ContentId(1), ContentId(2)].into());

        let unknown = store.content_ids_for_module(ModuleId(999)).await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_by_ids_skips_missing() {
        let store = sample_store();
        let ids = [ContentId(3), ContentId(42)].into();

        let found = store.by_ids(&ids).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Java Intro");
    }

    #[tokio::test]
    async fn test_links_attached_to_content() {
        let store = sample_store();
        let all = store.all().await.unwrap();

        let basics = all.iter().find(|c| c.id == ContentId(2)).unwrap();
        assert_eq!(basics.links.len(), 2);
        assert!(basics.is_linked_to(ModuleId(2)));
    }

    #[tokio::test]
    async fn test_module_directory() {
        let store = sample_store();

        assert_eq!(store.module_count().await.unwrap(), 2);
        assert_eq!(store.link_count(ModuleId(1)).await.unwrap(), 2);
        assert_eq!(store.link_count(ModuleId(404)).await.unwrap(), 0);
    }

    #[test]
    fn test_snapshot_round_trip_preserves_links() {
        let store = sample_store();
        let snapshot = store.to_snapshot();

        assert_eq!(snapshot.links.len(), 3);
        assert!(snapshot.contents.iter().all(|c| c.links.is_empty()));

        let rebuilt = MemoryStore::from_snapshot(snapshot).unwrap();
        assert_eq!(rebuilt.len(), 3);
    }

    #[tokio::test]
    async fn test_load_missing_snapshot_fails() {
        let temp = tempfile::TempDir::new().unwrap();

        let result = MemoryStore::load(&temp.path().join("nope.json")).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_saved_snapshot() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        sample_store().to_snapshot().save(&path).await.unwrap();

        let store = MemoryStore::load(&path).await.unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.link_count(ModuleId(1)).await.unwrap(), 2);
    }

    #[test]
    fn test_dangling_link_rejected() {
        let snapshot = CatalogSnapshot {
            contents: vec![Content::new(1, "Orphan", "Code")],
            links: vec![Link::new(LinkId(1), ModuleId(5), ContentId(1))],
            ..CatalogSnapshot::new()
        };

        let result = MemoryStore::from_snapshot(snapshot);
        assert!(matches!(result, Err(StoreError::Integrity(_))));
    }
}
