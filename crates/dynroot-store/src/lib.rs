//! DynRoot Storage Boundary
//!
//! Contracts the traversal layer consumes, and an in-memory implementation.
//!
//! # Core Concepts
//!
//! - [`TreeQueryRepository`]: Batched ancestor/descendant lookups by content type
//! - [`ContentLookup`]: Point lookups for origin resolution
//! - [`ScopeProvider`] / [`Scope`]: Unit of work around each repository call,
//!   rolled back on drop unless completed
//! - [`InMemoryTreeStore`]: Materialized-path store backed by a radix trie
//!
//! # Example
//!
//! ```rust
//! use dynroot_store::{InMemoryTreeStore, TreeQueryRepository};
//! use dynroot_tree::{NodeKey, OriginSet, TypeFilter};
//!
//! let store = InMemoryTreeStore::new();
//! let folder = NodeKey::new();
//! let page = NodeKey::new();
//! store.add_child(None, folder, "folder").unwrap();
//! store.add_child(Some(folder), page, "page").unwrap();
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let found = rt
//!     .block_on(store.nearest_ancestor_or_self(&OriginSet::single(page), &TypeFilter::of(["folder"])))
//!     .unwrap();
//! assert!(found.contains(&folder));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod memory;
mod repository;
mod scope;

pub use error::StorageError;
pub use memory::InMemoryTreeStore;
pub use repository::{ContentLookup, TreeQueryRepository};
pub use scope::{MemoryScope, MemoryScopeProvider, Scope, ScopeId, ScopeProvider, ScopeStats, ScopeTracker};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
