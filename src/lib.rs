//! content-catalog - content catalog backend with conjunctive search
//!
//! Stores learning content (code samples, documents, presentations),
//! groups it into modules through many-to-many links, and answers
//! filtered searches plus aggregate usage metrics.
//!
//! # Architecture
//!
//! Searches are a one-way pipeline over read-only stores:
//! - The caller builds a `FilterRequest` (title, format, module ids)
//! - `FilterEngine` narrows the candidate set one criterion at a time
//! - Stores are reached only through narrow lookup traits
//!
//! # Modules
//!
//! - `domain`: Data structures (Content, Module, Link, ContentSet)
//! - `store`: Lookup traits and the memory/SQLite adapters
//! - `search`: Request shape and the filter engine
//! - `metrics`: Reporting snapshot aggregation
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Content linked to modules 1 and 2 whose title contains "go"
//! catalog search --title go --module 1 --module 2
//!
//! # Usage metrics for the last week
//! catalog metrics --days 7 --module 1,2
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod search;
pub mod store;

// Re-export main types at crate root for convenience
pub use domain::{Content, ContentId, ContentSet, Link, Module, ModuleId};
pub use error::{CatalogError, CatalogResult};
pub use metrics::{MetricsAggregator, MetricsRequest, MetricsSnapshot};
pub use search::{FilterEngine, FilterRequest};
pub use store::{CatalogSnapshot, MemoryStore, SqliteStore, StoreError};
