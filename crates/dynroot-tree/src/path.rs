//! Materialized tree paths
//!
//! Provides [`TreePath`], the persisted list of ancestor keys of a node.

use crate::key::{KeyError, NodeKey};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator used by [`TreePath::to_index_key`]
pub const INDEX_SEPARATOR: char = '/';

/// Materialized path of a node, from the top-level node down to the node itself
///
/// The tree root is virtual and has no key, so a top-level node has a path of
/// length 1 and the path length is the node level.
///
/// # Examples
/// - `[years]` → a top-level node
/// - `[years, y2022, acts]` → `acts` at level 3
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreePath(Vec<NodeKey>);

impl TreePath {
    /// Create new path from keys (top-level first)
    #[inline]
    #[must_use]
    pub fn new(keys: Vec<NodeKey>) -> Self {
        Self(keys)
    }

    /// Path of a top-level node
    #[inline]
    #[must_use]
    pub fn single(key: NodeKey) -> Self {
        Self(vec![key])
    }

    /// Empty path (the virtual tree root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Keys from top-level to self
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[NodeKey] {
        &self.0
    }

    /// Node level (top-level nodes are level 1)
    #[inline]
    #[must_use]
    pub fn level(&self) -> usize {
        self.0.len()
    }

    /// Check if path is the virtual root
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Key of the node this path addresses
    #[inline]
    #[must_use]
    pub fn node(&self) -> Option<NodeKey> {
        self.0.last().copied()
    }

    /// Key of the top-level ancestor-or-self
    #[inline]
    #[must_use]
    pub fn top(&self) -> Option<NodeKey> {
        self.0.first().copied()
    }

    /// Append a key, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, key: NodeKey) -> Self {
        let mut new = self.clone();
        new.0.push(key);
        new
    }

    /// Check if this path is a prefix of another (ancestor-or-self)
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0 == other.0[..self.0.len()]
    }

    /// Check if this path is a strict ancestor of another
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Check if `key` is on this path
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.0.contains(key)
    }

    /// Zero-based position of `key` on this path
    #[inline]
    #[must_use]
    pub fn position_of(&self, key: &NodeKey) -> Option<usize> {
        self.0.iter().position(|k| k == key)
    }

    /// Ancestors-or-self, nearest (self) first
    #[inline]
    pub fn ancestors_or_self(&self) -> impl Iterator<Item = &NodeKey> {
        self.0.iter().rev()
    }

    /// Ancestors-or-self, furthest (top-level) first
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &NodeKey> {
        self.0.iter()
    }

    /// Key used in prefix indexes
    ///
    /// Every key is followed by [`INDEX_SEPARATOR`], so the index key of a
    /// node is a string prefix of exactly the index keys of its subtree.
    #[must_use]
    pub fn to_index_key(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * 37);
        for key in &self.0 {
            out.push_str(&key.to_string());
            out.push(INDEX_SEPARATOR);
        }
        out
    }
}

impl Display for TreePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", joined.join(","))
    }
}

impl FromStr for TreePath {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let keys = s
            .split(',')
            .map(|seg| {
                if seg.trim().is_empty() {
                    Err(KeyError::EmptySegment)
                } else {
                    seg.parse::<NodeKey>()
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(keys))
    }
}

impl From<Vec<NodeKey>> for TreePath {
    fn from(keys: Vec<NodeKey>) -> Self {
        Self(keys)
    }
}

impl Default for TreePath {
    fn default() -> Self {
        Self::root()
    }
}
