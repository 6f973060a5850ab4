//! Outbound query contracts
//!
//! [`TreeQueryRepository`] answers the four directional lookups over the
//! persisted tree. [`ContentLookup`] answers the point lookups origin
//! resolution needs. Both are implemented by the storage layer.

use crate::error::StorageError;
use async_trait::async_trait;
use dynroot_tree::{ContentNode, NodeKey, OriginSet, TypeFilter};
use std::collections::HashSet;

/// Path-based ancestor/descendant lookups, filtered by content type
///
/// Every method answers for the whole origin set in a single round-trip.
/// Results are deduplicated; origins that do not exist contribute nothing.
#[async_trait]
pub trait TreeQueryRepository: Send + Sync {
    /// Closest ancestor-or-self of each origin whose type passes `filter`
    ///
    /// At most one node per origin.
    async fn nearest_ancestor_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError>;

    /// Topmost ancestor-or-self of each origin whose type passes `filter`
    ///
    /// At most one node per origin.
    async fn furthest_ancestor_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError>;

    /// First qualifying node on every downward branch of each origin
    ///
    /// The origin itself is the depth-zero candidate. Descent stops on a
    /// branch once a qualifying node is found there.
    async fn nearest_descendant_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError>;

    /// Deepest qualifying node on every downward branch of each origin
    ///
    /// Only qualifying nodes with no qualifying descendant are kept.
    async fn furthest_descendant_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError>;
}

/// Point lookups on content nodes
#[async_trait]
pub trait ContentLookup: Send + Sync {
    /// Fetch a content node, trashed or not
    async fn get_node(&self, key: NodeKey) -> Result<Option<ContentNode>, StorageError>;

    /// Keys of nodes that have at least one assigned domain
    async fn domain_roots(&self) -> Result<HashSet<NodeKey>, StorageError>;
}
