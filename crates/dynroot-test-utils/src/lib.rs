//! Testing utilities for DynRoot workspace
//!
//! Shared test helpers, fixtures, and storage doubles.

#![allow(missing_docs)]

use async_trait::async_trait;
use dynroot_store::{InMemoryTreeStore, MemoryScopeProvider, StorageError, TreeQueryRepository};
use dynroot_tree::{NodeKey, OriginSet, TypeFilter};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Install a test-writer subscriber once; `RUST_LOG` overrides the `warn` default
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Content tree used across integration tests
///
/// ```text
/// Years (years)
///   - 2022 (year)
///       - Acts (acts)
///           - Ran-D (act)
///       - Stages (stages)
///           - Red (stage)
///           - Blue (stage)
///   - 2023 (year)
///   - 2024 (year)
/// Deleted (years, trashed)
/// ```
#[derive(Debug)]
pub struct YearsTree {
    pub store: Arc<InMemoryTreeStore>,
    pub scopes: Arc<MemoryScopeProvider>,
    pub years: NodeKey,
    pub year_2022: NodeKey,
    pub acts_2022: NodeKey,
    pub ran_d: NodeKey,
    pub stages_2022: NodeKey,
    pub red: NodeKey,
    pub blue: NodeKey,
    pub year_2023: NodeKey,
    pub year_2024: NodeKey,
    pub trashed: NodeKey,
}

impl YearsTree {
    pub fn build() -> Self {
        let store = Arc::new(InMemoryTreeStore::new());
        let add = |parent: Option<NodeKey>, content_type: &str| {
            let key = NodeKey::new();
            store.add_child(parent, key, content_type).unwrap();
            key
        };

        let years = add(None, "years");
        let year_2022 = add(Some(years), "year");
        let acts_2022 = add(Some(year_2022), "acts");
        let ran_d = add(Some(acts_2022), "act");
        let stages_2022 = add(Some(year_2022), "stages");
        let red = add(Some(stages_2022), "stage");
        let blue = add(Some(stages_2022), "stage");
        let year_2023 = add(Some(years), "year");
        let year_2024 = add(Some(years), "year");

        let trashed = NodeKey::new();
        store
            .insert(dynroot_tree::ContentNode::new(trashed, None, "years").trashed())
            .unwrap();

        Self {
            store,
            scopes: Arc::new(MemoryScopeProvider::new()),
            years,
            year_2022,
            acts_2022,
            ran_d,
            stages_2022,
            red,
            blue,
            year_2023,
            year_2024,
            trashed,
        }
    }

    /// Add `Acts (acts) > act (act)` under Ran-D, returning `(new_acts, new_act)`
    pub fn add_nested_acts(&self) -> (NodeKey, NodeKey) {
        let new_acts = NodeKey::new();
        let new_act = NodeKey::new();
        self.store.add_child(Some(self.ran_d), new_acts, "acts").unwrap();
        self.store.add_child(Some(new_acts), new_act, "act").unwrap();
        (new_acts, new_act)
    }
}

/// Build a random tree from `(parent selector, type index)` pairs
///
/// Selector 0 puts the node at top level; otherwise its parent is node
/// `selector % i`.
pub fn random_tree(shape: &[(usize, usize)], types: &[&str]) -> (InMemoryTreeStore, Vec<NodeKey>) {
    let store = InMemoryTreeStore::new();
    let mut keys = Vec::with_capacity(shape.len());

    for (i, (selector, ty)) in shape.iter().enumerate() {
        let parent = if i == 0 || *selector == 0 {
            None
        } else {
            Some(keys[selector % i])
        };
        let key = NodeKey::new();
        store.add_child(parent, key, types[ty % types.len()]).unwrap();
        keys.push(key);
    }

    (store, keys)
}

/// Repository wrapper counting calls, with optional failure injection
pub struct SpyRepository {
    inner: Arc<dyn TreeQueryRepository>,
    calls: AtomicUsize,
    failure: Mutex<Option<StorageError>>,
}

impl SpyRepository {
    pub fn new(inner: Arc<dyn TreeQueryRepository>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            failure: Mutex::new(None),
        }
    }

    /// Total repository calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fail every subsequent call with `error`
    pub fn fail_with(&self, error: StorageError) {
        *self.failure.lock() = Some(error);
    }

    fn record(&self) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TreeQueryRepository for SpyRepository {
    async fn nearest_ancestor_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.record()?;
        self.inner.nearest_ancestor_or_self(origins, filter).await
    }

    async fn furthest_ancestor_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.record()?;
        self.inner.furthest_ancestor_or_self(origins, filter).await
    }

    async fn nearest_descendant_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.record()?;
        self.inner.nearest_descendant_or_self(origins, filter).await
    }

    async fn furthest_descendant_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.record()?;
        self.inner.furthest_descendant_or_self(origins, filter).await
    }
}

/// Repository whose calls block until the test opens the gate
///
/// Each call counts one arrival before waiting; [`GatedRepository::entered`]
/// consumes one arrival, so tests can cancel or time out a step at a known
/// point.
pub struct GatedRepository {
    inner: Arc<dyn TreeQueryRepository>,
    gate: Semaphore,
    arrivals: Semaphore,
}

impl GatedRepository {
    pub fn new(inner: Arc<dyn TreeQueryRepository>) -> Self {
        Self {
            inner,
            gate: Semaphore::new(0),
            arrivals: Semaphore::new(0),
        }
    }

    /// Wait for the next repository call to reach the gate
    pub async fn entered(&self) {
        if let Ok(permit) = self.arrivals.acquire().await {
            permit.forget();
        }
    }

    /// Let `calls` blocked or future calls through
    pub fn open(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    async fn pass(&self) -> Result<(), StorageError> {
        self.arrivals.add_permits(1);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| StorageError::Unavailable("gate closed".to_string()))?;
        permit.forget();
        Ok(())
    }
}

#[async_trait]
impl TreeQueryRepository for GatedRepository {
    async fn nearest_ancestor_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.pass().await?;
        self.inner.nearest_ancestor_or_self(origins, filter).await
    }

    async fn furthest_ancestor_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.pass().await?;
        self.inner.furthest_ancestor_or_self(origins, filter).await
    }

    async fn nearest_descendant_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.pass().await?;
        self.inner.nearest_descendant_or_self(origins, filter).await
    }

    async fn furthest_descendant_or_self(
        &self,
        origins: &OriginSet,
        filter: &TypeFilter,
    ) -> Result<OriginSet, StorageError> {
        self.pass().await?;
        self.inner.furthest_descendant_or_self(origins, filter).await
    }
}
