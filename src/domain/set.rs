//! Duplicate-free collection of content returned by searches.
//!
//! Backed by a `BTreeMap` keyed on content id, so membership checks are
//! cheap and iteration order is stable for display. Narrowing consumes the
//! set and returns a new one; a stage can only drop items, never add them.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::content::{Content, ContentId};

/// An unordered set of content, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Content>", into = "Vec<Content>")]
pub struct ContentSet {
    items: BTreeMap<ContentId, Content>,
}

impl ContentSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the items matching `predicate`, producing a new set
    pub fn narrow<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&Content) -> bool,
    {
        self.items
            .into_iter()
            .filter(|(_, content)| predicate(content))
            .collect()
    }

    /// Check whether the set holds a content id
    pub fn contains(&self, id: ContentId) -> bool {
        self.items.contains_key(&id)
    }

    /// Get an item by id
    pub fn get(&self, id: ContentId) -> Option<&Content> {
        self.items.get(&id)
    }

    /// All ids in the set
    pub fn ids(&self) -> BTreeSet<ContentId> {
        self.items.keys().copied().collect()
    }

    /// Iterate over the items in id order
    pub fn iter(&self) -> btree_map::Values<'_, ContentId, Content> {
        self.items.values()
    }

    /// Check if `self` holds only ids that `other` also holds
    pub fn is_subset(&self, other: &ContentSet) -> bool {
        self.items.keys().all(|id| other.contains(*id))
    }

    /// Get the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the set into a vector ordered by id
    pub fn into_vec(self) -> Vec<Content> {
        self.items.into_values().collect()
    }
}

impl FromIterator<Content> for ContentSet {
    fn from_iter<I: IntoIterator<Item = Content>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|c| (c.id, c)).collect(),
        }
    }
}

impl FromIterator<(ContentId, Content)> for ContentSet {
    fn from_iter<I: IntoIterator<Item = (ContentId, Content)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ContentSet {
    type Item = Content;
    type IntoIter = btree_map::IntoValues<ContentId, Content>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_values()
    }
}

impl<'a> IntoIterator for &'a ContentSet {
    type Item = &'a Content;
    type IntoIter = btree_map::Values<'a, ContentId, Content>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

impl From<Vec<Content>> for ContentSet {
    fn from(contents: Vec<Content>) -> Self {
        contents.into_iter().collect()
    }
}

impl From<ContentSet> for Vec<Content> {
    fn from(set: ContentSet) -> Self {
        set.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContentSet {
        vec![
            Content::new(1, "Intro to Go", "Document"),
            Content::new(2, "Go Basics", "Code"),
            Content::new(3, "Java Intro", "Document"),
        ]
        .into()
    }

    #[test]
    fn test_duplicates_collapse() {
        let set: ContentSet = vec![
            Content::new(1, "First", "Code"),
            Content::new(1, "First again", "Code"),
        ]
        .into();

        assert_eq!(set.len(), 1);
        assert_eq!(set.get(ContentId(1)).unwrap().title, "First again");
    }

    #[test]
    fn test_narrow_only_drops_items() {
        let set = sample();
        let original = set.clone();

        let narrowed = set.narrow(|c| c.format == "Document");
        assert_eq!(narrowed.ids(), [ContentId(1), ContentId(3)].into());
        assert!(narrowed.is_subset(&original));

        // A second stage sees only survivors of the first one
        let narrowed = narrowed.narrow(|c| c.format == "Code" || c.title.contains("Java"));
        assert_eq!(narrowed.ids(), [ContentId(3)].into());
    }

    #[test]
    fn test_serializes_as_list() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(3));

        let parsed: ContentSet = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.ids(), sample().ids());
    }
}
