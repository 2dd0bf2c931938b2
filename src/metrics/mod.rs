//! Usage metrics for reporting.
//!
//! Produces an immutable `MetricsSnapshot` from a store: per-format content
//! counts, module count, average link count across a chosen set of modules,
//! and a time graph of recently created content.

pub mod aggregator;
pub mod snapshot;

pub use aggregator::{average_link_count, format_histogram, MetricsAggregator, MetricsRequest};
pub use snapshot::{MetricsSnapshot, TimeGraph, TimeGraphPoint};
