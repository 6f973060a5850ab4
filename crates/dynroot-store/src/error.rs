//! Storage error types
//!
//! Failures of the tree query repository or the scope boundary. These
//! propagate unchanged through traversal; nothing in this workspace retries them.

use dynroot_tree::NodeKey;

/// Storage layer error
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    /// Backend cannot be reached
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer in time
    #[error("storage operation '{operation}' timed out after {elapsed_ms}ms")]
    Timeout { operation: String, elapsed_ms: u64 },

    /// Scope could not be opened or finalized
    #[error("scope failure: {0}")]
    ScopeFailed(String),

    /// Node does not exist
    #[error("node not found: {0}")]
    NodeNotFound(NodeKey),

    /// Parent of a new node does not exist
    #[error("parent {parent} of node {node} not found")]
    ParentNotFound { node: NodeKey, parent: NodeKey },

    /// Node already stored
    #[error("node already exists: {0}")]
    DuplicateNode(NodeKey),

    /// Materialized path does not end with the node's own key
    #[error("path '{path}' does not address node {node}")]
    InvalidPath { node: NodeKey, path: String },
}

impl StorageError {
    /// Check if the failure is transient (connectivity or timeout)
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Timeout { .. } | Self::ScopeFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(StorageError::Unavailable("down".into()).is_transient());
        assert!(StorageError::Timeout {
            operation: "nearest_ancestor_or_self".into(),
            elapsed_ms: 30_000,
        }
        .is_transient());
        assert!(!StorageError::NodeNotFound(NodeKey::new()).is_transient());
        assert!(!StorageError::DuplicateNode(NodeKey::new()).is_transient());
        assert!(!StorageError::InvalidPath {
            node: NodeKey::new(),
            path: String::new(),
        }
        .is_transient());
    }

    #[test]
    fn display_mentions_operation() {
        let err = StorageError::Timeout {
            operation: "furthest_descendant_or_self".into(),
            elapsed_ms: 5,
        };
        assert!(err.to_string().contains("furthest_descendant_or_self"));
    }
}
