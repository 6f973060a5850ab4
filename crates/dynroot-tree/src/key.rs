//! Node identifiers
//!
//! Provides [`NodeKey`], the opaque, globally unique identifier of a content node.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Globally unique content node identifier (UUID)
///
/// Immutable and cheap to copy. Ordering is by UUID bytes and carries no
/// tree meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(Uuid);

impl NodeKey {
    /// Generate a new random key
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short string representation (first 8 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for NodeKey {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for NodeKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| KeyError::InvalidKey {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<Uuid> for NodeKey {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Errors parsing keys and paths
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// Not a UUID
    #[error("invalid node key '{input}': {reason}")]
    InvalidKey { input: String, reason: String },

    /// A path segment was empty
    #[error("path contains empty segment")]
    EmptySegment,
}
