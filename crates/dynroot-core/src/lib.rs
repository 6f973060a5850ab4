//! DynRoot Core - Dynamic Root Resolution
//!
//! The orchestrator that:
//! - Resolves a query's origin through pluggable origin finders
//! - Validates step pipelines against the strategy registry up front
//! - Folds traversal steps over origin sets, one scoped repository call per step
//! - Honours cancellation and per-step deadlines
//!
//! # Example
//!
//! ```rust,ignore
//! use dynroot_core::{DynamicRootService, OriginAlias, ResolverConfig, RootContext, RootQuery};
//! use dynroot_steps::{Direction, QueryStep};
//! use dynroot_tree::TypeFilter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = DynamicRootService::with_defaults(store, scopes, ResolverConfig::new());
//!
//! let query = RootQuery::from_origin(OriginAlias::Current, RootContext::new(current, parent))
//!     .with_step(QueryStep::of(Direction::NearestAncestorOrSelf, TypeFilter::of(["folder"])))
//!     .with_step(QueryStep::of(Direction::FurthestDescendantOrSelf, TypeFilter::of(["page"])));
//!
//! let roots = service.get_dynamic_roots(&query).await?;
//! println!("Resolved {} roots", roots.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod error;
pub mod origin;
pub mod service;
pub mod types;

// Re-exports for convenience
pub use error::{
    ConfigError, ConfigurationError, OriginRegistryError, ParseOriginAliasError, ResolveError,
};
pub use origin::{
    ByKeyOrigin, CurrentOrigin, OriginFinder, OriginFinderRegistry, OriginFinderRegistryBuilder,
    ParentOrigin, RootOrigin, SiteOrigin,
};
pub use service::DynamicRootService;
pub use types::{OriginAlias, ResolverConfig, RootContext, RootQuery};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with DynRoot Core
    pub use crate::{
        DynamicRootService, OriginAlias, ResolveError, ResolverConfig, RootContext, RootQuery,
    };
    pub use dynroot_steps::{Direction, QueryStep};
    pub use dynroot_tree::{NodeKey, OriginSet, TypeFilter};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
