//! Reporting records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of the content-creation time graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGraphPoint {
    /// Creation time of a content item
    pub at: DateTime<Utc>,

    /// Content created inside the window up to and including `at`
    pub total: usize,
}

/// Running total of content created inside a time window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGraph {
    /// Start of the window (inclusive)
    pub from: Option<DateTime<Utc>>,

    /// End of the window (inclusive)
    pub to: Option<DateTime<Utc>>,

    /// Points ordered by creation time
    pub points: Vec<TimeGraphPoint>,
}

impl TimeGraph {
    /// Build a graph from the creation times that fall inside `[from, to]`
    pub fn from_timestamps<I>(timestamps: I, from: DateTime<Utc>, to: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut inside: Vec<_> = timestamps
            .into_iter()
            .filter(|at| *at >= from && *at <= to)
            .collect();
        inside.sort();

        let points = inside
            .into_iter()
            .enumerate()
            .map(|(i, at)| TimeGraphPoint { at, total: i + 1 })
            .collect();

        Self {
            from: Some(from),
            to: Some(to),
            points,
        }
    }

    /// Number of content items created inside the window
    pub fn total(&self) -> usize {
        self.points.last().map(|p| p.total).unwrap_or(0)
    }
}

/// Immutable metrics record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Content count per reported format
    pub format_counts: BTreeMap<String, usize>,

    /// Number of distinct modules
    pub module_count: usize,

    /// Mean link count over the requested modules (0 when none requested)
    pub average_resources: f64,

    /// Content created inside the requested timeframe
    pub time_graph: TimeGraph,

    /// When the snapshot was taken
    pub generated_at: DateTime<Utc>,
}

impl MetricsSnapshot {
    /// Count for a format, 0 if it is not reported
    pub fn count_for(&self, format: &str) -> usize {
        self.format_counts.get(format).copied().unwrap_or(0)
    }
}
