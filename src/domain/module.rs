//! Modules group related content through links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Module identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub i64);

impl ModuleId {
    /// Get the raw integer value
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ModuleId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A grouping of related content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Unique module identifier
    pub id: ModuleId,

    /// Subject name shown to users
    pub subject: String,

    /// When the module was created
    pub created_at: DateTime<Utc>,
}

impl Module {
    /// Create a new module
    pub fn new(id: i64, subject: impl Into<String>) -> Self {
        Self {
            id: ModuleId(id),
            subject: subject.into(),
            created_at: Utc::now(),
        }
    }
}
