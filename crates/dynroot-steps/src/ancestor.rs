//! Upward traversal strategies
//!
//! Both walk each origin's materialized path and include the origin itself
//! as the distance-zero candidate. They differ only in tie-break: nearest
//! keeps the closest match, furthest keeps the topmost one.

use crate::step::{Direction, QueryStep};
use crate::strategy::{TraversalContext, TraversalResult, TraversalStrategy};
use async_trait::async_trait;
use dynroot_store::StorageError;
use dynroot_tree::OriginSet;

/// Closest matching ancestor-or-self of each origin
#[derive(Debug, Clone)]
pub struct NearestAncestorOrSelf {
    context: TraversalContext,
    tag: String,
}

impl NearestAncestorOrSelf {
    /// Built-in direction this strategy runs
    pub const DIRECTION: Direction = Direction::NearestAncestorOrSelf;

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
impl TraversalStrategy for NearestAncestorOrSelf {
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

/// Topmost matching ancestor-or-self of each origin
#[derive(Debug, Clone)]
pub struct FurthestAncestorOrSelf {
    context: TraversalContext,
    tag: String,
}

impl FurthestAncestorOrSelf {
    /// Built-in direction this strategy runs
    pub const DIRECTION: Direction = Direction::FurthestAncestorOrSelf;

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
impl TraversalStrategy for FurthestAncestorOrSelf {
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
