//! Traversal strategy trait and shared execution
//!
//! Provides the [`TraversalStrategy`] trait, the three-way
//! [`TraversalResult`], and [`TraversalContext`], the repository and scope
//! handles every built-in strategy executes through.

use crate::step::{Direction, QueryStep};
use async_trait::async_trait;
use dynroot_store::{ScopeProvider, StorageError, TreeQueryRepository};
use dynroot_tree::OriginSet;
use std::fmt;
use std::sync::Arc;

/// Outcome of offering a step to a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalResult {
    /// Step's direction tag is not handled by this strategy
    NotApplicable,
    /// Step handled; nothing matched (or there were no origins)
    ApplicableEmpty,
    /// Step handled; non-empty deduplicated matches
    Match(OriginSet),
}

impl TraversalResult {
    /// Wrap repository output, mapping an empty set to `ApplicableEmpty`
    #[inline]
    #[must_use]
    pub fn from_set(found: OriginSet) -> Self {
        if found.is_empty() {
            Self::ApplicableEmpty
        } else {
            Self::Match(found)
        }
    }

    /// Check if the strategy handled the step
    #[inline]
    #[must_use]
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Self::NotApplicable)
    }

    /// Matches of an applicable result (`None` when not applicable)
    #[must_use]
    pub fn into_origins(self) -> Option<OriginSet> {
        match self {
            Self::NotApplicable => None,
            Self::ApplicableEmpty => Some(OriginSet::new()),
            Self::Match(found) => Some(found),
        }
    }
}

/// A directional traversal over the content tree
///
/// Strategies are stateless; they are built once and shared behind `Arc`.
/// `execute` must answer [`TraversalResult::NotApplicable`] for any step
/// whose tag differs from [`TraversalStrategy::direction_tag`], and must not
/// touch storage in that case.
#[async_trait]
pub trait TraversalStrategy: Send + Sync + fmt::Debug {
    /// Tag of the steps this strategy handles
    fn direction_tag(&self) -> &str;

    /// Execute `step` from `origins`
    ///
    /// # Errors
    /// Propagates repository and scope failures unchanged
    async fn execute(
        &self,
        origins: &OriginSet,
        step: &QueryStep,
    ) -> Result<TraversalResult, StorageError>;
}

/// Repository and scope handles shared by strategies
#[derive(Clone)]
pub struct TraversalContext {
    repository: Arc<dyn TreeQueryRepository>,
    scopes: Arc<dyn ScopeProvider>,
}

impl TraversalContext {
    /// Create context
    #[inline]
    #[must_use]
    pub fn new(repository: Arc<dyn TreeQueryRepository>, scopes: Arc<dyn ScopeProvider>) -> Self {
        Self { repository, scopes }
    }

    /// Tree query repository
    #[inline]
    #[must_use]
    pub fn repository(&self) -> &Arc<dyn TreeQueryRepository> {
        &self.repository
    }

    /// Scope provider
    #[inline]
    #[must_use]
    pub fn scopes(&self) -> &Arc<dyn ScopeProvider> {
        &self.scopes
    }

    /// Run one built-in direction for a strategy tagged `own_tag`
    ///
    /// Dispatch and empty-origin checks happen before a scope is opened. The
    /// repository call runs inside a scope that is completed only on success;
    /// an error (or a dropped future) releases it uncompleted.
    ///
    /// # Errors
    /// Propagates repository and scope failures unchanged
    pub async fn traverse(
        &self,
        own_tag: &str,
        direction: Direction,
        origins: &OriginSet,
        step: &QueryStep,
    ) -> Result<TraversalResult, StorageError> {
        if step.direction_tag() != own_tag {
            tracing::trace!(strategy = own_tag, step = step.direction_tag(), "strategy skipped");
            return Ok(TraversalResult::NotApplicable);
        }

        if origins.is_empty() {
            return Ok(TraversalResult::ApplicableEmpty);
        }

        let mut scope = self.scopes.begin_scope().await?;
        let filter = step.type_filter();

        let found = match direction {
            Direction::NearestAncestorOrSelf => {
                self.repository.nearest_ancestor_or_self(origins, filter).await?
            }
            Direction::FurthestAncestorOrSelf => {
                self.repository.furthest_ancestor_or_self(origins, filter).await?
            }
            Direction::NearestDescendantOrSelf => {
                self.repository.nearest_descendant_or_self(origins, filter).await?
            }
            Direction::FurthestDescendantOrSelf => {
                self.repository.furthest_descendant_or_self(origins, filter).await?
            }
        };

        scope.complete();
        Ok(TraversalResult::from_set(found))
    }
}

impl fmt::Debug for TraversalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalContext").finish_non_exhaustive()
    }
}
