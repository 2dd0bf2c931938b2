//! Domain types for the content catalog.
//!
//! This module contains the core data structures:
//! - Content: catalogued learning resources (code, documents, slides)
//! - Module: grouping entities that aggregate content
//! - Link: many-to-many association between a module and a content item
//! - ContentSet: duplicate-free result collection produced by searches

pub mod content;
pub mod link;
pub mod module;
pub mod set;

// Re-export commonly used types
pub use content::{Content, ContentId, KNOWN_FORMATS};
pub use link::{Link, LinkId};
pub use module::{Module, ModuleId};
pub use set::ContentSet;
