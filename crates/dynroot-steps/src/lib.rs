//! DynRoot Traversal Steps
//!
//! Pluggable directional traversals over the content tree.
//!
//! # Core Concepts
//!
//! - [`QueryStep`]: One traversal instruction (direction tag + type filter)
//! - [`TraversalStrategy`]: Core trait; each strategy self-selects by tag
//! - [`TraversalResult`]: Not-applicable, applicable-empty or match
//! - [`NearestAncestorOrSelf`] / [`FurthestAncestorOrSelf`]: Upward walks
//! - [`NearestDescendantOrSelf`] / [`FurthestDescendantOrSelf`]: Downward walks
//! - [`StrategyRegistry`]: Ordered registry, indexed by direction tag
//!
//! # Example
//!
//! ```rust,ignore
//! use dynroot_steps::{Direction, QueryStep, StrategyRegistry, TraversalContext};
//!
//! let context = TraversalContext::new(repository, scopes);
//! let registry = StrategyRegistry::with_defaults(&context);
//!
//! let step = QueryStep::of(Direction::NearestAncestorOrSelf, TypeFilter::of(["folder"]));
//! let strategy = registry.get(step.direction_tag()).unwrap();
//! let result = strategy.execute(&origins, &step).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod ancestor;
mod descendant;
mod error;
#[cfg(test)]
mod mocks;
mod registry;
mod step;
mod strategy;

pub use ancestor::{FurthestAncestorOrSelf, NearestAncestorOrSelf};
pub use descendant::{FurthestDescendantOrSelf, NearestDescendantOrSelf};
pub use error::RegistryError;
pub use registry::{StrategyRegistry, StrategyRegistryBuilder};
pub use step::{Direction, ParseDirectionError, QueryStep};
pub use strategy::{TraversalContext, TraversalResult, TraversalStrategy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
