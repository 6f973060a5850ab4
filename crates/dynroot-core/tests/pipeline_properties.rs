//! Behavioural properties of the resolution pipeline.
//!
//! These pin down the contract independent of any particular fixture:
//! - Cardinality and tie-break of each direction.
//! - Deduplication when origins converge.
//! - Configuration defects surface before any repository access.
//! - Repeated resolution against unchanged storage is stable.

use dynroot_core::prelude::*;
use dynroot_core::ConfigurationError;
use dynroot_steps::{StrategyRegistry, TraversalContext};
use dynroot_store::{InMemoryTreeStore, MemoryScopeProvider, ScopeProvider, TreeQueryRepository};
use dynroot_test_utils::{init_test_tracing, random_tree, SpyRepository};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

struct Harness {
    store: Arc<InMemoryTreeStore>,
    spy: Arc<SpyRepository>,
    scopes: Arc<MemoryScopeProvider>,
    service: DynamicRootService,
}

fn harness(store: InMemoryTreeStore) -> Harness {
    init_test_tracing();
    let store = Arc::new(store);
    let spy = Arc::new(SpyRepository::new(store.clone()));
    let scopes = Arc::new(MemoryScopeProvider::new());

    let repository: Arc<dyn TreeQueryRepository> = spy.clone();
    let scope_provider: Arc<dyn ScopeProvider> = scopes.clone();
    let lookup: Arc<dyn dynroot_store::ContentLookup> = store.clone();
    let service = DynamicRootService::new(
        StrategyRegistry::with_defaults(&TraversalContext::new(repository, scope_provider)),
        dynroot_core::OriginFinderRegistry::with_defaults(&lookup),
        ResolverConfig::new(),
    );

    Harness {
        store,
        spy,
        scopes,
        service,
    }
}

fn add(store: &InMemoryTreeStore, parent: Option<NodeKey>, content_type: &str) -> NodeKey {
    let key = NodeKey::new();
    store.add_child(parent, key, content_type).unwrap();
    key
}

fn step(direction: Direction, alias: &str) -> QueryStep {
    QueryStep::of(direction, TypeFilter::of([alias]))
}

fn set(keys: &[NodeKey]) -> OriginSet {
    keys.iter().copied().collect()
}

/// Property: an unregistered direction is rejected before any I/O.
#[tokio::test]
async fn unknown_direction_fails_before_repository_access() {
    let store = InMemoryTreeStore::new();
    let origin = add(&store, None, "folder");
    let h = harness(store);

    let steps = [
        step(Direction::NearestAncestorOrSelf, "folder"),
        QueryStep::new("SidewaysOrSelf", TypeFilter::any()),
    ];
    let err = h.service.resolve(&steps, OriginSet::single(origin)).await.unwrap_err();

    assert!(err.is_configuration_error());
    assert!(matches!(
        err,
        ResolveError::Configuration(ConfigurationError::UnknownDirection { step_index: 1, .. })
    ));
    assert_eq!(h.spy.calls(), 0);
    assert_eq!(h.scopes.stats().opened, 0);
}

/// Property: an empty origin set resolves to empty without I/O.
#[tokio::test]
async fn empty_origins_skip_repository() {
    let h = harness(InMemoryTreeStore::new());

    let steps = [step(Direction::NearestDescendantOrSelf, "page")];
    let roots = h.service.resolve(&steps, OriginSet::new()).await.unwrap();

    assert!(roots.is_empty());
    assert_eq!(h.spy.calls(), 0);
    assert_eq!(h.scopes.stats().opened, 0);
}

/// Property: converging origins produce one shared ancestor, once.
#[tokio::test]
async fn nearest_ancestor_deduplicates_converging_origins() {
    let store = InMemoryTreeStore::new();
    let r = add(&store, None, "folder");
    let a = add(&store, Some(r), "page");
    let b = add(&store, Some(r), "page");
    let h = harness(store);

    let roots = h
        .service
        .resolve(&[step(Direction::NearestAncestorOrSelf, "folder")], set(&[a, b]))
        .await
        .unwrap();

    assert_eq!(roots.to_vec(), vec![r]);
    assert_eq!(h.spy.calls(), 1);
}

/// Property: furthest ancestor picks the topmost qualifying node on the chain.
#[tokio::test]
async fn furthest_ancestor_picks_the_root_of_the_chain() {
    let store = InMemoryTreeStore::new();
    let root = add(&store, None, "folder");
    let mid = add(&store, Some(root), "folder");
    let leaf = add(&store, Some(mid), "folder");
    let h = harness(store);

    let roots = h
        .service
        .resolve(&[step(Direction::FurthestAncestorOrSelf, "folder")], OriginSet::single(leaf))
        .await
        .unwrap();

    assert_eq!(roots, set(&[root]));
}

/// Property: nearest descendant answers per branch, not globally.
#[tokio::test]
async fn nearest_descendant_answers_per_branch() {
    let store = InMemoryTreeStore::new();
    let p = add(&store, None, "folder");
    let shallow = add(&store, Some(p), "page");
    let d1 = add(&store, Some(p), "folder");
    let d2 = add(&store, Some(d1), "folder");
    let deep = add(&store, Some(d2), "page");
    let h = harness(store);

    let roots = h
        .service
        .resolve(&[step(Direction::NearestDescendantOrSelf, "page")], OriginSet::single(p))
        .await
        .unwrap();

    assert_eq!(roots, set(&[shallow, deep]));
}

/// Property: furthest descendant keeps only the deepest match on a branch.
#[tokio::test]
async fn furthest_descendant_keeps_the_deepest_match() {
    let store = InMemoryTreeStore::new();
    let origin = add(&store, None, "folder");
    let depth1 = add(&store, Some(origin), "page");
    let depth2 = add(&store, Some(depth1), "folder");
    let depth3 = add(&store, Some(depth2), "folder");
    let depth4 = add(&store, Some(depth3), "page");
    let h = harness(store);

    let roots = h
        .service
        .resolve(&[step(Direction::FurthestDescendantOrSelf, "page")], OriginSet::single(origin))
        .await
        .unwrap();

    assert_eq!(roots, set(&[depth4]));
}

/// Scenario: from a page, up to its folder, then down to the deepest pages.
#[tokio::test]
async fn folder_then_pages_end_to_end() {
    let store = InMemoryTreeStore::new();
    let site = add(&store, None, "site");
    let f = add(&store, Some(site), "folder");
    let x = add(&store, Some(f), "article");
    let branch_a = add(&store, Some(f), "page");
    let p1 = add(&store, Some(branch_a), "page");
    let branch_b = add(&store, Some(f), "section");
    let p2 = add(&store, Some(branch_b), "page");
    let h = harness(store);

    let steps = [
        step(Direction::NearestAncestorOrSelf, "folder"),
        step(Direction::FurthestDescendantOrSelf, "page"),
    ];
    let roots = h.service.resolve(&steps, OriginSet::single(x)).await.unwrap();

    assert_eq!(roots, set(&[p1, p2]));
    assert_eq!(h.spy.calls(), 2);

    let stats = h.scopes.stats();
    assert_eq!(stats.opened, 2);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.active(), 0);
}

/// Storage failures abort the whole resolution and leave no scope open.
#[tokio::test]
async fn storage_failure_propagates_without_partial_result() {
    let store = InMemoryTreeStore::new();
    let origin = add(&store, None, "folder");
    let h = harness(store);
    h.spy.fail_with(dynroot_store::StorageError::Timeout {
        operation: "nearest_ancestor_or_self".to_string(),
        elapsed_ms: 30_000,
    });

    let err = h
        .service
        .resolve(&[step(Direction::NearestAncestorOrSelf, "folder")], OriginSet::single(origin))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Storage(_)));
    assert!(err.is_retryable());

    let stats = h.scopes.stats();
    assert_eq!(stats.rolled_back, 1);
    assert_eq!(stats.active(), 0);
}

/// A scope that cannot be opened surfaces as a storage error.
#[tokio::test]
async fn scope_acquisition_failure_propagates() {
    let store = InMemoryTreeStore::new();
    let origin = add(&store, None, "folder");
    let h = harness(store);
    h.scopes.set_unavailable(true);

    let err = h
        .service
        .resolve(&[step(Direction::NearestAncestorOrSelf, "folder")], OriginSet::single(origin))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::Storage(dynroot_store::StorageError::ScopeFailed(_))
    ));
    assert_eq!(h.spy.calls(), 0);
}

/// A store outage is reported the same way through the real store.
#[tokio::test]
async fn unavailable_store_propagates() {
    let store = InMemoryTreeStore::new();
    let origin = add(&store, None, "folder");
    let h = harness(store);
    h.store.set_unavailable(true);

    let err = h
        .service
        .resolve(&[step(Direction::FurthestDescendantOrSelf, "page")], OriginSet::single(origin))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Storage(dynroot_store::StorageError::Unavailable(_))
    ));
}

const TYPES: [&str; 3] = ["folder", "page", "section"];

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    /// Property: resolving twice against unchanged storage gives the same set.
    #[test]
    fn prop_resolution_is_idempotent(
        shape in proptest::collection::vec((0..8usize, 0..3usize), 1..30),
        origin_picks in proptest::collection::vec(0..30usize, 1..4),
        pipeline in proptest::collection::vec((direction_strategy(), 0..3usize), 0..4),
    ) {
        let (store, keys) = random_tree(&shape, &TYPES);
        let origins: OriginSet = origin_picks.iter().map(|i| keys[i % keys.len()]).collect();
        let steps: Vec<QueryStep> = pipeline
            .iter()
            .map(|(direction, ty)| QueryStep::of(*direction, TypeFilter::of([TYPES[*ty]])))
            .collect();

        let h = harness(store);
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let first = rt.block_on(h.service.resolve(&steps, origins.clone())).unwrap();
        let second = rt.block_on(h.service.resolve(&steps, origins)).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(h.scopes.stats().active(), 0);
    }

    /// Property: every root of a single step satisfies the step's filter.
    #[test]
    fn prop_roots_satisfy_filter(
        shape in proptest::collection::vec((0..8usize, 0..3usize), 1..30),
        origin in 0..30usize,
        direction in direction_strategy(),
        ty in 0..3usize,
    ) {
        let (store, keys) = random_tree(&shape, &TYPES);
        let origin = keys[origin % keys.len()];
        let h = harness(store);

        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let step = QueryStep::of(direction, TypeFilter::of([TYPES[ty]]));
        let roots = rt.block_on(h.service.resolve(&[step], OriginSet::single(origin))).unwrap();

        if direction.is_ancestor() {
            prop_assert!(roots.len() <= 1);
        }
        for key in &roots {
            let node = h.store.get(key).unwrap();
            prop_assert_eq!(node.content_type.as_str(), TYPES[ty]);
        }
    }
}
