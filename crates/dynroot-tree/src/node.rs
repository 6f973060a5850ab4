//! Content nodes and type filters

use crate::key::NodeKey;
use crate::path::TreePath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A persisted content node as seen by traversal
///
/// Only the fields traversal needs: identity, position and type alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    /// Node key
    pub key: NodeKey,
    /// Materialized path (ends with `key`)
    pub path: TreePath,
    /// Content type alias (e.g. `"folder"`, `"page"`)
    pub content_type: String,
    /// Whether the node sits in the recycle bin
    pub trashed: bool,
}

impl ContentNode {
    /// Create node under `parent` (or at top level when `None`)
    #[must_use]
    pub fn new(key: NodeKey, parent: Option<&TreePath>, content_type: impl Into<String>) -> Self {
        let path = match parent {
            Some(p) => p.child(key),
            None => TreePath::single(key),
        };
        Self {
            key,
            path,
            content_type: content_type.into(),
            trashed: false,
        }
    }

    /// Mark as trashed
    #[inline]
    #[must_use]
    pub fn trashed(mut self) -> Self {
        self.trashed = true;
        self
    }

    /// Node level (top-level nodes are level 1)
    #[inline]
    #[must_use]
    pub fn level(&self) -> usize {
        self.path.level()
    }

    /// Parent key (`None` for top-level nodes)
    #[inline]
    #[must_use]
    pub fn parent_key(&self) -> Option<NodeKey> {
        self.path.parent().and_then(|p| p.node())
    }
}

/// Set of content type aliases a traversal step accepts
///
/// An empty filter is a wildcard and matches every type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeFilter(BTreeSet<String>);

impl TypeFilter {
    /// Wildcard filter
    #[inline]
    #[must_use]
    pub fn any() -> Self {
        Self(BTreeSet::new())
    }

    /// Filter accepting any of the given aliases
    #[must_use]
    pub fn of<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(aliases.into_iter().map(Into::into).collect())
    }

    /// Check if the filter matches every type
    #[inline]
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.0.is_empty()
    }

    /// Check a content type alias against the filter
    #[inline]
    #[must_use]
    pub fn matches(&self, content_type: &str) -> bool {
        self.0.is_empty() || self.0.contains(content_type)
    }

    /// Aliases in the filter (sorted)
    #[inline]
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
