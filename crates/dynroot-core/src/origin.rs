//! Origin finders
//!
//! An origin finder turns a [`RootQuery`] into the single node key the step
//! pipeline starts from. Finders are keyed by alias in an
//! [`OriginFinderRegistry`]; host applications may register their own.
//!
//! Every built-in finder answers `None` when its key does not name an
//! existing content node. Trashed nodes are valid origins.

use crate::error::OriginRegistryError;
use crate::types::{OriginAlias, RootQuery};
use async_trait::async_trait;
use dynroot_store::{ContentLookup, StorageError};
use dynroot_tree::{ContentNode, NodeKey};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Resolves the origin of a root query
#[async_trait]
pub trait OriginFinder: Send + Sync + fmt::Debug {
    /// Alias of the queries this finder handles
    fn alias(&self) -> &str;

    /// Origin key, or `None` when it does not exist
    ///
    /// # Errors
    /// Propagates content lookup failures
    async fn find(&self, query: &RootQuery) -> Result<Option<NodeKey>, StorageError>;
}

async fn existing(
    lookup: &dyn ContentLookup,
    key: Option<NodeKey>,
) -> Result<Option<ContentNode>, StorageError> {
    match key {
        Some(key) => lookup.get_node(key).await,
        None => Ok(None),
    }
}

/// `Root`: top-level ancestor-or-self of the parent
#[derive(Clone)]
pub struct RootOrigin {
    lookup: Arc<dyn ContentLookup>,
}

impl RootOrigin {
    #[must_use]
    pub fn new(lookup: Arc<dyn ContentLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl OriginFinder for RootOrigin {
    fn alias(&self) -> &str {
        OriginAlias::Root.as_str()
    }

    async fn find(&self, query: &RootQuery) -> Result<Option<NodeKey>, StorageError> {
        let parent = existing(self.lookup.as_ref(), Some(query.context.parent_key)).await?;
        Ok(parent.and_then(|node| node.path.top()))
    }
}

/// `Parent`: the parent itself
#[derive(Clone)]
pub struct ParentOrigin {
    lookup: Arc<dyn ContentLookup>,
}

impl ParentOrigin {
    #[must_use]
    pub fn new(lookup: Arc<dyn ContentLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl OriginFinder for ParentOrigin {
    fn alias(&self) -> &str {
        OriginAlias::Parent.as_str()
    }

    async fn find(&self, query: &RootQuery) -> Result<Option<NodeKey>, StorageError> {
        let parent = existing(self.lookup.as_ref(), Some(query.context.parent_key)).await?;
        Ok(parent.map(|node| node.key))
    }
}

/// `Current`: the node being edited (none while creating)
#[derive(Clone)]
pub struct CurrentOrigin {
    lookup: Arc<dyn ContentLookup>,
}

impl CurrentOrigin {
    #[must_use]
    pub fn new(lookup: Arc<dyn ContentLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl OriginFinder for CurrentOrigin {
    fn alias(&self) -> &str {
        OriginAlias::Current.as_str()
    }

    async fn find(&self, query: &RootQuery) -> Result<Option<NodeKey>, StorageError> {
        let current = existing(self.lookup.as_ref(), query.context.current_key).await?;
        Ok(current.map(|node| node.key))
    }
}

/// `Site`: nearest ancestor-or-self with an assigned domain
///
/// Starts from the current node, or the parent while creating. Falls back to
/// the top-level ancestor when no node on the path has a domain.
#[derive(Clone)]
pub struct SiteOrigin {
    lookup: Arc<dyn ContentLookup>,
}

impl SiteOrigin {
    #[must_use]
    pub fn new(lookup: Arc<dyn ContentLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl OriginFinder for SiteOrigin {
    fn alias(&self) -> &str {
        OriginAlias::Site.as_str()
    }

    async fn find(&self, query: &RootQuery) -> Result<Option<NodeKey>, StorageError> {
        let start = query.context.current_key.unwrap_or(query.context.parent_key);
        let Some(node) = existing(self.lookup.as_ref(), Some(start)).await? else {
            return Ok(None);
        };

        let domain_roots = self.lookup.domain_roots().await?;
        let site = node
            .path
            .ancestors_or_self()
            .find(|key| domain_roots.contains(key))
            .copied();

        Ok(site.or_else(|| node.path.top()))
    }
}

/// `ByKey`: the explicit origin key
#[derive(Clone)]
pub struct ByKeyOrigin {
    lookup: Arc<dyn ContentLookup>,
}

impl ByKeyOrigin {
    #[must_use]
    pub fn new(lookup: Arc<dyn ContentLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl OriginFinder for ByKeyOrigin {
    fn alias(&self) -> &str {
        OriginAlias::ByKey.as_str()
    }

    async fn find(&self, query: &RootQuery) -> Result<Option<NodeKey>, StorageError> {
        let node = existing(self.lookup.as_ref(), query.origin_key).await?;
        Ok(node.map(|node| node.key))
    }
}

macro_rules! opaque_debug {
    ($($ty:ident),* $(,)?) => {
        $(
            impl fmt::Debug for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($ty)).finish_non_exhaustive()
                }
            }
        )*
    };
}

opaque_debug!(RootOrigin, ParentOrigin, CurrentOrigin, SiteOrigin, ByKeyOrigin);

/// Registered origin finders, keyed by alias in registration order
#[derive(Clone, Default)]
pub struct OriginFinderRegistry {
    finders: IndexMap<String, Arc<dyn OriginFinder>>,
}

impl OriginFinderRegistry {
    /// Start an empty builder
    #[inline]
    #[must_use]
    pub fn builder() -> OriginFinderRegistryBuilder {
        OriginFinderRegistryBuilder::new()
    }

    /// Create registry with the five built-in finders
    #[must_use]
    pub fn with_defaults(lookup: &Arc<dyn ContentLookup>) -> Self {
        let finders = default_finders(lookup)
            .into_iter()
            .map(|f| (f.alias().to_string(), f))
            .collect();
        Self { finders }
    }

    /// Finder registered for `alias`
    #[inline]
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&Arc<dyn OriginFinder>> {
        self.finders.get(alias)
    }

    /// Registered aliases, in registration order
    #[must_use]
    pub fn aliases(&self) -> Vec<String> {
        self.finders.keys().cloned().collect()
    }

    /// Get number of registered finders
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.finders.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }
}

impl fmt::Debug for OriginFinderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OriginFinderRegistry")
            .field("aliases", &self.aliases())
            .finish()
    }
}

fn default_finders(lookup: &Arc<dyn ContentLookup>) -> Vec<Arc<dyn OriginFinder>> {
    vec![
        Arc::new(RootOrigin::new(Arc::clone(lookup))),
        Arc::new(ParentOrigin::new(Arc::clone(lookup))),
        Arc::new(CurrentOrigin::new(Arc::clone(lookup))),
        Arc::new(SiteOrigin::new(Arc::clone(lookup))),
        Arc::new(ByKeyOrigin::new(Arc::clone(lookup))),
    ]
}

/// Builder for [`OriginFinderRegistry`]
#[derive(Default)]
pub struct OriginFinderRegistryBuilder {
    finders: Vec<Arc<dyn OriginFinder>>,
}

impl OriginFinderRegistryBuilder {
    /// Create new empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the five built-in finders
    #[must_use]
    pub fn with_defaults(mut self, lookup: &Arc<dyn ContentLookup>) -> Self {
        self.finders.extend(default_finders(lookup));
        self
    }

    /// Append a finder
    #[must_use]
    pub fn append(mut self, finder: Arc<dyn OriginFinder>) -> Self {
        self.finders.push(finder);
        self
    }

    /// Build the lookup table
    ///
    /// # Errors
    /// - `OriginRegistryError::EmptyAlias` if a finder has an empty alias
    /// - `OriginRegistryError::DuplicateAlias` if two finders share an alias
    pub fn build(self) -> Result<OriginFinderRegistry, OriginRegistryError> {
        let mut finders: IndexMap<String, Arc<dyn OriginFinder>> =
            IndexMap::with_capacity(self.finders.len());

        for (position, finder) in self.finders.into_iter().enumerate() {
            let alias = finder.alias().to_string();
            if alias.is_empty() {
                return Err(OriginRegistryError::EmptyAlias { position });
            }
            if let Some(first) = finders.get_index_of(&alias) {
                return Err(OriginRegistryError::DuplicateAlias {
                    alias,
                    first,
                    second: position,
                });
            }
            finders.insert(alias, finder);
        }

        Ok(OriginFinderRegistry { finders })
    }
}

impl fmt::Debug for OriginFinderRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aliases: Vec<&str> = self.finders.iter().map(|f| f.alias()).collect();
        f.debug_struct("OriginFinderRegistryBuilder")
            .field("aliases", &aliases)
            .finish()
    }
}
