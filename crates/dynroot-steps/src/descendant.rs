//! Downward traversal strategies
//!
//! Descendants fan out, so both may match several nodes per origin: one per
//! branch. Nearest stops descending a branch at its first match; furthest
//! searches a branch to exhaustion and keeps only matches with no matching
//! descendant.

use crate::step::{Direction, QueryStep};
use crate::strategy::{TraversalContext, TraversalResult, TraversalStrategy};
use async_trait::async_trait;
use dynroot_store::StorageError;
use dynroot_tree::OriginSet;

/// First matching node on each downward branch of each origin
#[derive(Debug, Clone)]
pub struct NearestDescendantOrSelf {
    context: TraversalContext,
    tag: String,
}

impl NearestDescendantOrSelf {
    /// Built-in direction this strategy runs
    pub const DIRECTION: Direction = Direction::NearestDescendantOrSelf;

    /// Create strategy handling the built-in tag
    #[must_use]
    pub fn new(context: TraversalContext) -> Self {
        Self {
            context,
            tag: Self::DIRECTION.as_tag().to_string(),
        }
    }

    /// Handle steps tagged `tag` instead of the built-in tag
    #[inline]
    #[must_use]
    pub fn with_direction_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

#[async_trait]
impl TraversalStrategy for NearestDescendantOrSelf {
    fn direction_tag(&self) -> &str {
        &self.tag
    }

    async fn execute(
        &self,
        origins: &OriginSet,
        step: &QueryStep,
    ) -> Result<TraversalResult, StorageError> {
        self.context
            .traverse(&self.tag, Self::DIRECTION, origins, step)
            .await
    }
}

/// Deepest matching node on each downward branch of each origin
#[derive(Debug, Clone)]
pub struct FurthestDescendantOrSelf {
    context: TraversalContext,
    tag: String,
}

impl FurthestDescendantOrSelf {
    /// Built-in direction this strategy runs
    pub const DIRECTION: Direction = Direction::FurthestDescendantOrSelf;

    /// Create strategy handling the built-in tag
    #[must_use]
    pub fn new(context: TraversalContext) -> Self {
        Self {
            context,
            tag: Self::DIRECTION.as_tag().to_string(),
        }
    }

    /// Handle steps tagged `tag` instead of the built-in tag
    #[inline]
    #[must_use]
    pub fn with_direction_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

#[async_trait]
impl TraversalStrategy for FurthestDescendantOrSelf {
    fn direction_tag(&self) -> &str {
        &self.tag
    }

    async fn execute(
        &self,
        origins: &OriginSet,
        step: &QueryStep,
    ) -> Result<TraversalResult, StorageError> {
        self.context
            .traverse(&self.tag, Self::DIRECTION, origins, step)
            .await
    }
}
