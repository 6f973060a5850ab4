//! DynRoot Tree Primitives
//!
//! Identity and position of content nodes in a materialized-path tree.
//!
//! # Core Concepts
//!
//! - [`NodeKey`]: Opaque, globally unique node identifier
//! - [`TreePath`]: Materialized path (ancestor keys, top-level first)
//! - [`ContentNode`]: Node identity, position and content type
//! - [`TypeFilter`]: Content type aliases a step accepts (empty = any)
//! - [`OriginSet`]: Deduplicated set of node keys
//!
//! # Example
//!
//! ```rust
//! use dynroot_tree::{ContentNode, NodeKey, TypeFilter};
//!
//! let folder = ContentNode::new(NodeKey::new(), None, "folder");
//! let page = ContentNode::new(NodeKey::new(), Some(&folder.path), "page");
//!
//! assert_eq!(page.parent_key(), Some(folder.key));
//! assert!(TypeFilter::of(["page"]).matches(&page.content_type));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod key;
mod node;
mod origin_set;
mod path;

pub use key::{KeyError, NodeKey};
pub use node::{ContentNode, TypeFilter};
pub use origin_set::OriginSet;
pub use path::{TreePath, INDEX_SEPARATOR};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
