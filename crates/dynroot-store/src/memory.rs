//! In-memory materialized-path store
//!
//! Provides [`InMemoryTreeStore`], implementing [`TreeQueryRepository`] and
//! [`ContentLookup`] over nodes kept in process memory.
//!
//! Subtrees are found with a radix trie keyed by [`TreePath::to_index_key`]:
//! the index key of a node is a prefix of exactly the keys of its subtree,
//! so one prefix lookup yields every descendant-or-self.

use crate::error::StorageError;
use crate::repository::{ContentLookup, TreeQueryRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use dynroot_tree::{ContentNode, NodeKey, OriginSet, TreePath, TypeFilter};
use parking_lot::RwLock;
use radix_trie::{Trie, TrieCommon};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

/// Nodes and their path index, guarded together so one read lock is a
/// consistent snapshot
#[derive(Debug)]
struct TreeIndex {
    nodes: HashMap<NodeKey, ContentNode>,
    paths: Trie<String, NodeKey>,
}

impl TreeIndex {
    fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            paths: Trie::new(),
        }
    }

    fn qualifies(&self, key: &NodeKey, filter: &TypeFilter) -> bool {
        self.nodes
            .get(key)
            .is_some_and(|node| filter.matches(&node.content_type))
    }

    /// Descendants-or-self of `path`, shallowest first
    fn subtree(&self, path: &TreePath) -> Vec<&ContentNode> {
        let prefix = path.to_index_key();
        let mut found: Vec<&ContentNode> = self
            .paths
            .get_raw_descendant(&prefix)
            .map(|sub| {
                sub.values()
                    .filter_map(|key| self.nodes.get(key))
                    .filter(|node| path.is_prefix_of(&node.path))
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by(|a, b| a.level().cmp(&b.level()).then_with(|| a.path.cmp(&b.path)));
        found
    }

    /// Qualifying descendants-or-self of `origin`, with the origin's path offset
    fn candidates(&self, origin: &NodeKey, filter: &TypeFilter) -> Option<(usize, Vec<&ContentNode>)> {
        let node = self.nodes.get(origin)?;
        let offset = node.level() - 1;
        let candidates = self
            .subtree(&node.path)
            .into_iter()
            .filter(|n| filter.matches(&n.content_type))
            .collect();
        Some((offset, candidates))
    }
}

/// Content tree held in memory
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct InMemoryTreeStore {
    index: RwLock<TreeIndex>,
    domains: DashMap<NodeKey, Vec<String>>,
    unavailable: AtomicBool,
}

impl InMemoryTreeStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: RwLock::new(TreeIndex::new()),
            domains: DashMap::new(),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Insert a node whose path is already materialized
    ///
    /// # Errors
    /// - `StorageError::InvalidPath` if the path is empty or does not end
    ///   with the node's key
    /// - `StorageError::DuplicateNode` if the key is already stored
    /// - `StorageError::ParentNotFound` if the parent is missing or its path
    ///   disagrees with the node's path
    pub fn insert(&self, node: ContentNode) -> Result<(), StorageError> {
        if node.path.node() != Some(node.key) {
            return Err(StorageError::InvalidPath {
                node: node.key,
                path: node.path.to_string(),
            });
        }

        let mut index = self.index.write();

        if index.nodes.contains_key(&node.key) {
            return Err(StorageError::DuplicateNode(node.key));
        }

        if let Some(parent_path) = node.path.parent() {
            if let Some(parent_key) = parent_path.node() {
                let parent_ok = index
                    .nodes
                    .get(&parent_key)
                    .is_some_and(|parent| parent.path == parent_path);
                if !parent_ok {
                    return Err(StorageError::ParentNotFound {
                        node: node.key,
                        parent: parent_key,
                    });
                }
            }
        }

        tracing::trace!(node = %node.key, level = node.level(), "node inserted");
        index.paths.insert(node.path.to_index_key(), node.key);
        index.nodes.insert(node.key, node);
        Ok(())
    }

    /// Create and insert a node under `parent` (top level when `None`)
    ///
    /// # Errors
    /// - `StorageError::ParentNotFound` if `parent` is not stored
    /// - `StorageError::DuplicateNode` if `key` is already stored
    pub fn add_child(
        &self,
        parent: Option<NodeKey>,
        key: NodeKey,
        content_type: impl Into<String>,
    ) -> Result<ContentNode, StorageError> {
        let parent_path = match parent {
            Some(parent_key) => Some(
                self.get(&parent_key)
                    .map(|p| p.path)
                    .ok_or(StorageError::ParentNotFound {
                        node: key,
                        parent: parent_key,
                    })?,
            ),
            None => None,
        };

        let node = ContentNode::new(key, parent_path.as_ref(), content_type);
        self.insert(node.clone())?;
        Ok(node)
    }

    /// Assign a domain (hostname) to a node
    ///
    /// # Errors
    /// Returns `StorageError::NodeNotFound` if the node is not stored
    pub fn assign_domain(&self, key: NodeKey, hostname: impl Into<String>) -> Result<(), StorageError> {
        if !self.index.read().nodes.contains_key(&key) {
            return Err(StorageError::NodeNotFound(key));
        }
        self.domains.entry(key).or_default().push(hostname.into());
        Ok(())
    }

    /// Fetch a node synchronously
    #[must_use]
    pub fn get(&self, key: &NodeKey) -> Option<ContentNode> {
        self.index.read().nodes.get(key).cloned()
    }

    /// Number of stored nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.read().nodes.len()
    }

    /// Check if store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make subsequent queries fail with `StorageError::Unavailable` (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }

    fn ancestor_or_self<F>(&self, origins: &OriginSet, filter: &TypeFilter, pick: F) -> OriginSet
    where
        F: Fn(&TreeIndex, &TreePath, &TypeFilter) -> Option<NodeKey>,
    {
        let index = self.index.read();
        origins
            .iter()
            .filter_map(|origin| index.nodes.get(origin))
            .filter_map(|node| pick(&index, &node.path, filter))
            .collect()
    }
}

impl Default for InMemoryTreeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TreeQueryRepository for InMemoryTreeStore {
    async fn nearest_ancestor_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.ensure_available()?;
        Ok(self.ancestor_or_self(origins, filter, |index, path, filter| {
            path.ancestors_or_self()
                .find(|key| index.qualifies(key, filter))
                .copied()
        }))
    }

    async fn furthest_ancestor_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.ensure_available()?;
        Ok(self.ancestor_or_self(origins, filter, |index, path, filter| {
            path.iter().find(|key| index.qualifies(key, filter)).copied()
        }))
    }

    async fn nearest_descendant_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.ensure_available()?;
        let index = self.index.read();
        let mut found = OriginSet::new();

        for origin in origins {
            let Some((offset, candidates)) = index.candidates(origin, filter) else {
                continue;
            };
            let qualifying: HashSet<NodeKey> = candidates.iter().map(|n| n.key).collect();

            // A candidate is cut when a qualifying node sits between the
            // origin (inclusive) and itself (exclusive).
            for node in candidates {
                let between = &node.path.keys()[offset..node.level() - 1];
                if !between.iter().any(|k| qualifying.contains(k)) {
                    found.insert(node.key);
                }
            }
        }

        Ok(found)
    }

    async fn furthest_descendant_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.ensure_available()?;
        let index = self.index.read();
        let mut found = OriginSet::new();

        for origin in origins {
            let Some((offset, candidates)) = index.candidates(origin, filter) else {
                continue;
            };
            let qualifying: HashSet<NodeKey> = candidates.iter().map(|n| n.key).collect();

            let mut has_qualifying_below = HashSet::new();
            for node in &candidates {
                for key in &node.path.keys()[offset..node.level() - 1] {
                    if qualifying.contains(key) {
                        has_qualifying_below.insert(*key);
                    }
                }
            }

            for node in candidates {
                if !has_qualifying_below.contains(&node.key) {
                    found.insert(node.key);
                }
            }
        }

        Ok(found)
    }
}

#[async_trait]
impl ContentLookup for InMemoryTreeStore {
    async fn get_node(&self, key: NodeKey) -> Result<Option<ContentNode>, StorageError> {
        self.ensure_available()?;
        Ok(self.get(&key))
    }

    async fn domain_roots(&self) -> Result<HashSet<NodeKey>, StorageError> {
        self.ensure_available()?;
        Ok(self
            .domains
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| *entry.key())
            .collect())
    }
}
