//! Filter engine: resolves a `FilterRequest` against a store.
//!
//! Stages run in a fixed order, each taking ownership of the previous
//! stage's survivors and returning a narrower set:
//!
//! 1. modules: intersection of the content linked to every listed module
//!    (or the whole universe when no module is listed)
//! 2. title: case-insensitive substring
//! 3. format: case-insensitive substring
//!
//! Store failures abort the search. They are never turned into an empty or
//! a full result.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::{Content, ContentId, ContentSet, ModuleId};
use crate::error::CatalogResult;
use crate::store::{ContentListing, ContentLookup, LinkIndex};

use super::request::FilterRequest;

/// Conjunctive search over a store
pub struct FilterEngine<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for FilterEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> FilterEngine<S>
where
    S: LinkIndex + ContentLookup + ContentListing + ?Sized,
{
    /// Create an engine over a shared store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Run a search. Every supplied criterion must hold.
    #[instrument(
        skip(self, request),
        fields(
            request_id = %Uuid::new_v4(),
            title = request.title_query().unwrap_or_default(),
            format = request.format_query().unwrap_or_default(),
            modules = request.modules.len(),
        )
    )]
    pub async fn filter(&self, request: &FilterRequest) -> CatalogResult<ContentSet> {
        let module_ids = request.module_ids();

        let candidates = if module_ids.is_empty() {
            self.universe().await?
        } else {
            self.linked_to_all(&module_ids).await?
        };
        debug!(candidates = candidates.len(), "Module stage done");

        let candidates = narrow_by_title(candidates, request.title_query());
        debug!(candidates = candidates.len(), "Title stage done");

        let candidates = narrow_by_format(candidates, request.format_query());
        info!(results = candidates.len(), "Search complete");

        Ok(candidates)
    }

    /// Content whose title contains `title`, case-insensitively
    pub async fn by_title(&self, title: &str) -> CatalogResult<ContentSet> {
        self.filter(&FilterRequest::new().with_title(title)).await
    }

    /// Content whose format contains `format`, case-insensitively
    pub async fn by_format(&self, format: &str) -> CatalogResult<ContentSet> {
        self.filter(&FilterRequest::new().with_format(format)).await
    }

    /// Content linked to every one of `module_ids`
    pub async fn by_modules(&self, module_ids: &[ModuleId]) -> CatalogResult<ContentSet> {
        self.filter(&FilterRequest::new().with_modules(module_ids.iter().copied()))
            .await
    }

    /// All content linked to a single module. Unknown modules yield nothing.
    pub async fn content_for_module(&self, module_id: ModuleId) -> CatalogResult<ContentSet> {
        let ids = self.store.content_ids_for_module(module_id).await?;
        self.resolve(&ids).await
    }

    async fn universe(&self) -> CatalogResult<ContentSet> {
        Ok(self.store.all().await?.into_iter().collect())
    }

    /// Intersect the link sets of every module, then resolve the survivors.
    ///
    /// `module_ids` must be non-empty.
    async fn linked_to_all(&self, module_ids: &[ModuleId]) -> CatalogResult<ContentSet> {
        let mut ids: Option<BTreeSet<ContentId>> = None;

        for &module_id in module_ids {
            let linked = self.store.content_ids_for_module(module_id).await?;
            debug!(%module_id, linked = linked.len(), "Module links resolved");

            let next = match ids {
                None => linked,
                Some(current) => current.intersection(&linked).copied().collect(),
            };

            if next.is_empty() {
                // Nothing can survive further intersections
                return Ok(ContentSet::new());
            }
            ids = Some(next);
        }

        match ids {
            Some(ids) => self.resolve(&ids).await,
            None => Ok(ContentSet::new()),
        }
    }

    async fn resolve(&self, ids: &BTreeSet<ContentId>) -> CatalogResult<ContentSet> {
        if ids.is_empty() {
            return Ok(ContentSet::new());
        }
        Ok(self.store.by_ids(ids).await?.into_iter().collect())
    }
}

fn narrow_by_title(candidates: ContentSet, query: Option<&str>) -> ContentSet {
    match query {
        Some(query) => {
            let needle = query.to_lowercase();
            candidates.narrow(|content| content.title_contains(&needle))
        }
        None => candidates,
    }
}

fn narrow_by_format(candidates: ContentSet, query: Option<&str>) -> ContentSet {
    match query {
        Some(query) => {
            let needle = query.to_lowercase();
            candidates.narrow(|content| content.format_contains(&needle))
        }
        None => candidates,
    }
}

/// Apply a request to content that is already loaded.
///
/// Module membership is read from each item's own `links`, so the items must
/// carry their links. Produces the same set `FilterEngine::filter` would for
/// a store holding exactly these items.
pub fn apply_to_loaded<I>(contents: I, request: &FilterRequest) -> ContentSet
where
    I: IntoIterator<Item = Content>,
{
    let module_ids = request.module_ids();

    let candidates: ContentSet = contents
        .into_iter()
        .filter(|content| module_ids.iter().all(|&id| content.is_linked_to(id)))
        .collect();

    let candidates = narrow_by_title(candidates, request.title_query());
    narrow_by_format(candidates, request.format_query())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Link, LinkId};

    fn linked(id: i64, title: &str, format: &str, modules: &[i64]) -> Content {
        let mut content = Content::new(id, title, format);
        content.links = modules
            .iter()
            .enumerate()
            .map(|(i, &m)| Link::new(LinkId(id * 100 + i as i64), ModuleId(m), ContentId(id)))
            .collect();
        content
    }

    fn loaded() -> Vec<Content> {
        vec![
            linked(1, "Intro to Go", "Document", &[1]),
            linked(2, "Go Basics", "Code", &[1, 2]),
            linked(3, "Java Intro", "Document", &[]),
        ]
    }

    #[test]
    fn test_narrow_by_title_none_is_identity() {
        let set: ContentSet = loaded().into();
        let narrowed = narrow_by_title(set.clone(), None);
        assert_eq!(narrowed.ids(), set.ids());
    }

    #[test]
    fn test_apply_to_loaded_intersects_modules() {
        let request = FilterRequest::new().with_modules([ModuleId(1), ModuleId(2)]);
        let result = apply_to_loaded(loaded(), &request);
        assert_eq!(result.ids(), [ContentId(2)].into());
    }

    #[test]
    fn test_apply_to_loaded_unrestricted_returns_everything() {
        let result = apply_to_loaded(loaded(), &FilterRequest::new());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_apply_to_loaded_no_match_is_empty() {
        let request = FilterRequest::new().with_title("python");
        let result = apply_to_loaded(loaded(), &request);
        assert!(result.is_empty());
    }

    #[test]
    fn test_apply_to_loaded_combines_title_and_format() {
        let request = FilterRequest::new().with_title("INTRO").with_format("doc");
        let result = apply_to_loaded(loaded(), &request);
        assert_eq!(result.ids(), [ContentId(1), ContentId(3)].into());
    }
}
