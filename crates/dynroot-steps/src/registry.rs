//! Strategy registry for traversal strategies
//!
//! Provides [`StrategyRegistry`], the ordered, read-only set of strategies
//! assembled at startup, and [`StrategyRegistryBuilder`] for assembling it.

use crate::ancestor::{FurthestAncestorOrSelf, NearestAncestorOrSelf};
use crate::descendant::{FurthestDescendantOrSelf, NearestDescendantOrSelf};
use crate::error::RegistryError;
use crate::strategy::{TraversalContext, TraversalStrategy};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Registered traversal strategies, in registration order
///
/// Strategies are looked up by direction tag through a table built once in
/// [`StrategyRegistryBuilder::build`], so zero or duplicate matches are
/// detected at startup rather than per call. Read-only after construction.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: IndexMap<String, Arc<dyn TraversalStrategy>>,
}

impl StrategyRegistry {
    /// Start an empty builder
    #[inline]
    #[must_use]
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::new()
    }

    /// Create registry with the four built-in strategies
    #[must_use]
    pub fn with_defaults(context: &TraversalContext) -> Self {
        let strategies = default_strategies(context)
            .into_iter()
            .map(|s| (s.direction_tag().to_string(), s))
            .collect();
        Self { strategies }
    }

    /// Strategy registered for `tag`
    #[inline]
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&Arc<dyn TraversalStrategy>> {
        self.strategies.get(tag)
    }

    /// Check if a strategy handles `tag`
    #[inline]
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.strategies.contains_key(tag)
    }

    /// Registered direction tags, in registration order
    #[must_use]
    pub fn step_directions(&self) -> Vec<String> {
        self.strategies.keys().cloned().collect()
    }

    /// Get number of registered strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Iterate over strategies in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TraversalStrategy>> {
        self.strategies.values()
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("directions", &self.step_directions())
            .finish()
    }
}

fn default_strategies(context: &TraversalContext) -> Vec<Arc<dyn TraversalStrategy>> {
    vec![
        Arc::new(NearestAncestorOrSelf::new(context.clone())),
        Arc::new(FurthestAncestorOrSelf::new(context.clone())),
        Arc::new(NearestDescendantOrSelf::new(context.clone())),
        Arc::new(FurthestDescendantOrSelf::new(context.clone())),
    ]
}

/// Builder for [`StrategyRegistry`]
///
/// Appends strategies in order; host applications add custom directions
/// next to (or instead of) the built-in ones.
#[derive(Default)]
pub struct StrategyRegistryBuilder {
    strategies: Vec<Arc<dyn TraversalStrategy>>,
}

impl StrategyRegistryBuilder {
    /// Create new empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the four built-in strategies
    #[must_use]
    pub fn with_defaults(mut self, context: &TraversalContext) -> Self {
        self.strategies.extend(default_strategies(context));
        self
    }

    /// Append a strategy
    #[must_use]
    pub fn append(mut self, strategy: Arc<dyn TraversalStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Remove every strategy handling `tag`
    #[must_use]
    pub fn remove(mut self, tag: &str) -> Self {
        self.strategies.retain(|s| s.direction_tag() != tag);
        self
    }

    /// Build the lookup table
    ///
    /// # Errors
    /// - `RegistryError::EmptyDirectionTag` if a strategy has an empty tag
    /// - `RegistryError::DuplicateDirection` if two strategies share a tag
    pub fn build(self) -> Result<StrategyRegistry, RegistryError> {
        let mut strategies: IndexMap<String, Arc<dyn TraversalStrategy>> =
            IndexMap::with_capacity(self.strategies.len());

        for (position, strategy) in self.strategies.into_iter().enumerate() {
            let tag = strategy.direction_tag().to_string();
            if tag.is_empty() {
                return Err(RegistryError::EmptyDirectionTag { position });
            }
            if let Some(first) = strategies.get_index_of(&tag) {
                return Err(RegistryError::DuplicateDirection {
                    tag,
                    first,
                    second: position,
                });
            }
            strategies.insert(tag, strategy);
        }

        Ok(StrategyRegistry { strategies })
    }
}

impl fmt::Debug for StrategyRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.strategies.iter().map(|s| s.direction_tag()).collect();
        f.debug_struct("StrategyRegistryBuilder")
            .field("directions", &tags)
            .finish()
    }
}
