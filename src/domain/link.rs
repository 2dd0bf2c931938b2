//! Module/content associations.

use serde::{Deserialize, Serialize};

use super::content::ContentId;
use super::module::ModuleId;

/// Link identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub i64);

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// "This content is associated with this module"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub module_id: ModuleId,
    pub content_id: ContentId,
}

impl Link {
    pub fn new(id: LinkId, module_id: ModuleId, content_id: ContentId) -> Self {
        Self {
            id,
            module_id,
            content_id,
        }
    }
}
