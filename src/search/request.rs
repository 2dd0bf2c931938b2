//! Search request shape and boundary validation.

use serde::{Deserialize, Serialize};

use crate::domain::ModuleId;
use crate::error::{CatalogError, CatalogResult};

/// Criteria for a conjunctive content search.
///
/// Every field is optional. An empty string behaves exactly like an absent
/// one, and an empty module list means "no module restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterRequest {
    /// Case-insensitive title substring
    pub title: Option<String>,

    /// Case-insensitive format substring
    pub format: Option<String>,

    /// Content must be linked to every one of these modules
    pub modules: Vec<ModuleId>,
}

impl FilterRequest {
    /// Create an empty request (matches the whole catalog)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a request body, rejecting malformed shapes
    pub fn from_json(raw: &str) -> CatalogResult<Self> {
        serde_json::from_str(raw).map_err(|e| CatalogError::InvalidInput(e.to_string()))
    }

    /// Set the title criterion
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the format criterion
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Add a module criterion
    pub fn with_module(mut self, module_id: ModuleId) -> Self {
        self.modules.push(module_id);
        self
    }

    /// Add several module criteria
    pub fn with_modules(mut self, module_ids: impl IntoIterator<Item = ModuleId>) -> Self {
        self.modules.extend(module_ids);
        self
    }

    /// The title criterion, if it restricts anything
    pub fn title_query(&self) -> Option<&str> {
        self.title.as_deref().filter(|q| !q.is_empty())
    }

    /// The format criterion, if it restricts anything
    pub fn format_query(&self) -> Option<&str> {
        self.format.as_deref().filter(|q| !q.is_empty())
    }

    /// Module criteria with repeats removed, in first-seen order
    pub fn module_ids(&self) -> Vec<ModuleId> {
        let mut seen = std::collections::HashSet::new();
        self.modules
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
