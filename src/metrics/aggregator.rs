//! Metrics aggregation over a store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::domain::{Content, ModuleId, KNOWN_FORMATS};
use crate::error::{CatalogError, CatalogResult};
use crate::store::{ContentListing, ModuleDirectory};

use super::snapshot::{MetricsSnapshot, TimeGraph};

/// Modules whose average link count should be reported
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsRequest {
    pub modules: Vec<ModuleId>,
}

impl MetricsRequest {
    /// Parse a request body, rejecting malformed shapes
    pub fn from_json(raw: &str) -> CatalogResult<Self> {
        serde_json::from_str(raw).map_err(|e| CatalogError::InvalidInput(e.to_string()))
    }
}

/// Count content per format. Every reported format appears, 0 if unused.
///
/// Formats are compared exactly as stored.
pub fn format_histogram(contents: &[Content], formats: &[String]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> =
        formats.iter().map(|format| (format.clone(), 0)).collect();

    for content in contents {
        if let Some(count) = counts.get_mut(&content.format) {
            *count += 1;
        }
    }

    counts
}

/// Arithmetic mean of per-module link counts. No modules -> 0.0.
pub fn average_link_count(link_counts: &[usize]) -> f64 {
    if link_counts.is_empty() {
        return 0.0;
    }
    link_counts.iter().sum::<usize>() as f64 / link_counts.len() as f64
}

/// Builds `MetricsSnapshot`s from a store
pub struct MetricsAggregator<S: ?Sized> {
    store: Arc<S>,
    formats: Vec<String>,
}

impl<S> MetricsAggregator<S>
where
    S: ContentListing + ModuleDirectory + ?Sized,
{
    /// Create an aggregator reporting the default known formats
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            formats: KNOWN_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Report these formats instead of the defaults
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Take a snapshot covering content created in the last `timeframe`
    pub async fn collect(
        &self,
        request: &MetricsRequest,
        timeframe: Duration,
    ) -> CatalogResult<MetricsSnapshot> {
        self.collect_at(request, timeframe, Utc::now()).await
    }

    /// Take a snapshot as of `now`
    #[instrument(skip(self, request), fields(modules = request.modules.len()))]
    pub async fn collect_at(
        &self,
        request: &MetricsRequest,
        timeframe: Duration,
        now: DateTime<Utc>,
    ) -> CatalogResult<MetricsSnapshot> {
        let contents = self.store.all().await?;
        let format_counts = format_histogram(&contents, &self.formats);
        debug!(?format_counts, "Format histogram built");

        let module_count = self.store.module_count().await?;

        // Each requested module counts once
        let requested: BTreeSet<ModuleId> = request.modules.iter().copied().collect();
        let mut link_counts = Vec::with_capacity(requested.len());
        for module_id in requested {
            link_counts.push(self.store.link_count(module_id).await?);
        }
        let average_resources = average_link_count(&link_counts);

        let time_graph = TimeGraph::from_timestamps(
            contents.iter().map(|content| content.created_at),
            now - timeframe,
            now,
        );

        info!(
            module_count,
            average_resources,
            recent = time_graph.total(),
            "Metrics snapshot taken"
        );

        Ok(MetricsSnapshot {
            format_counts,
            module_count,
            average_resources,
            time_graph,
            generated_at: now,
        })
    }
}
