//! Catalogued content items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::link::Link;
use super::module::ModuleId;

/// Formats reported by default in metrics snapshots.
///
/// The format set is open: content may carry any format string, these are
/// only the ones the reporting layer knows by name.
pub const KNOWN_FORMATS: [&str; 3] = ["Code", "Document", "Powerpoint"];

/// Content identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub i64);

impl ContentId {
    /// Get the raw integer value
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ContentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A catalogued learning resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Unique content identifier
    pub id: ContentId,

    /// Human-readable title
    pub title: String,

    /// Category string, e.g. "Code", "Document", "Powerpoint"
    pub format: String,

    /// Location of the resource
    #[serde(default)]
    pub url: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// When the content was catalogued
    pub created_at: DateTime<Utc>,

    /// Links this content participates in (filled in by the store)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Content {
    /// Create new content with no links
    pub fn new(id: i64, title: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            id: ContentId(id),
            title: title.into(),
            format: format.into(),
            url: String::new(),
            description: String::new(),
            created_at: Utc::now(),
            links: Vec::new(),
        }
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Check whether this content is linked to a module
    pub fn is_linked_to(&self, module_id: ModuleId) -> bool {
        self.links.iter().any(|link| link.module_id == module_id)
    }

    /// Case-insensitive substring match on the title.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn title_contains(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
    }

    /// Case-insensitive substring match on the format.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn format_contains(&self, needle_lower: &str) -> bool {
        self.format.to_lowercase().contains(needle_lower)
    }
}
