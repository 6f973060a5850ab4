//! Deduplicated node key sets
//!
//! Provides [`OriginSet`], used both as traversal input (origins) and
//! traversal output (roots).

use crate::key::NodeKey;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Finite set of unique node keys
///
/// Insertion order is kept so results are stable for a given store, but
/// equality is set equality and callers must not rely on order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginSet(IndexSet<NodeKey>);

impl OriginSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexSet::new())
    }

    /// Set with a single key
    #[inline]
    #[must_use]
    pub fn single(key: NodeKey) -> Self {
        let mut set = IndexSet::with_capacity(1);
        set.insert(key);
        Self(set)
    }

    /// Insert key, returning `false` if it was already present
    #[inline]
    pub fn insert(&mut self, key: NodeKey) -> bool {
        self.0.insert(key)
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.0.contains(key)
    }

    /// Number of keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over keys in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &NodeKey> {
        self.0.iter()
    }

    /// Copy keys into a vector
    #[inline]
    #[must_use]
    pub fn to_vec(&self) -> Vec<NodeKey> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<NodeKey> for OriginSet {
    fn from_iter<I: IntoIterator<Item = NodeKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<NodeKey> for OriginSet {
    fn extend<I: IntoIterator<Item = NodeKey>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for OriginSet {
    type Item = NodeKey;
    type IntoIter = indexmap::set::IntoIter<NodeKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a OriginSet {
    type Item = &'a NodeKey;
    type IntoIter = indexmap::set::Iter<'a, NodeKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<NodeKey> for OriginSet {
    fn from(key: NodeKey) -> Self {
        Self::single(key)
    }
}
