//! Functional tests for origin resolution and step pipelines over a content tree.
//!
//! Every test runs against the shared years tree:
//! - Origin finders pick the pipeline's starting node (or none).
//! - Pipelines of nearest/furthest steps narrow or widen from that node.
//! - Missing origins and dead-end pipelines yield empty root sets, not errors.

use dynroot_core::prelude::*;
use dynroot_core::ConfigurationError;
use dynroot_test_utils::{init_test_tracing, YearsTree};
use pretty_assertions::assert_eq;

fn service(tree: &YearsTree) -> DynamicRootService {
    init_test_tracing();
    DynamicRootService::with_defaults(tree.store.clone(), tree.scopes.clone(), ResolverConfig::new())
}

fn step(direction: Direction, alias: &str) -> QueryStep {
    QueryStep::of(direction, TypeFilter::of([alias]))
}

fn set(keys: &[NodeKey]) -> OriginSet {
    keys.iter().copied().collect()
}

/// A node of the filtered type is its own nearest ancestor-or-self.
#[tokio::test]
async fn nearest_ancestor_with_own_type_returns_self() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Current, RootContext::new(tree.ran_d, tree.acts_2022))
        .with_step(step(Direction::NearestAncestorOrSelf, "act"));

    let roots = service(&tree).get_dynamic_roots(&query).await.unwrap();
    assert_eq!(roots, set(&[tree.ran_d]));
}

/// Nothing above the top-level node can be an `act`.
#[tokio::test]
async fn nearest_ancestor_from_root_origin_is_empty() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Root, RootContext::new(tree.ran_d, tree.acts_2022))
        .with_step(step(Direction::NearestAncestorOrSelf, "act"));

    let roots = service(&tree).get_dynamic_roots(&query).await.unwrap();
    assert!(roots.is_empty());
}

/// A filter naming a type no node has finds nothing in either descendant direction.
#[tokio::test]
async fn descendant_steps_with_unknown_type_are_empty() {
    let tree = YearsTree::build();
    let service = service(&tree);

    for direction in [Direction::NearestDescendantOrSelf, Direction::FurthestDescendantOrSelf] {
        let query = RootQuery::from_origin(OriginAlias::Current, RootContext::new(tree.ran_d, tree.acts_2022))
            .with_step(step(direction, "no-such-type"));
        let roots = service.get_dynamic_roots(&query).await.unwrap();
        assert!(roots.is_empty(), "{direction}");
    }
}

/// Nearest descendant stops at the first `acts` on the branch, ignoring the nested one.
#[tokio::test]
async fn nearest_descendant_finds_only_the_nearest() {
    let tree = YearsTree::build();
    let (new_acts, new_act) = tree.add_nested_acts();

    let query = RootQuery::from_origin(OriginAlias::Root, RootContext::new(new_act, new_acts))
        .with_step(step(Direction::NearestDescendantOrSelf, "acts"));

    let roots = service(&tree).get_dynamic_roots(&query).await.unwrap();
    assert_eq!(roots, set(&[tree.acts_2022]));
}

/// Furthest descendant keeps the nested `acts` and drops the one above it.
#[tokio::test]
async fn furthest_descendant_finds_only_the_furthest() {
    let tree = YearsTree::build();
    let (new_acts, new_act) = tree.add_nested_acts();

    let query = RootQuery::from_origin(OriginAlias::Root, RootContext::new(new_act, new_acts))
        .with_step(step(Direction::FurthestDescendantOrSelf, "acts"));

    let roots = service(&tree).get_dynamic_roots(&query).await.unwrap();
    assert_eq!(roots, set(&[new_acts]));
}

/// Every year branch contributes its own nearest `acts`.
#[tokio::test]
async fn nearest_descendant_answers_once_per_branch() {
    let tree = YearsTree::build();
    tree.add_nested_acts();
    let acts_2023 = NodeKey::new();
    tree.store.add_child(Some(tree.year_2023), acts_2023, "acts").unwrap();

    let query = RootQuery::from_origin(OriginAlias::Current, RootContext::new(tree.years, tree.years))
        .with_step(step(Direction::NearestDescendantOrSelf, "acts"));

    let roots = service(&tree).get_dynamic_roots(&query).await.unwrap();
    assert_eq!(roots, set(&[tree.acts_2022, acts_2023]));
}

/// Up to the year, then down to its stages.
#[tokio::test]
async fn chained_steps_walk_up_then_down() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Current, RootContext::new(tree.ran_d, tree.acts_2022))
        .with_step(step(Direction::NearestAncestorOrSelf, "year"))
        .with_step(step(Direction::NearestDescendantOrSelf, "stages"));

    let roots = service(&tree).get_dynamic_roots(&query).await.unwrap();
    assert_eq!(roots, set(&[tree.stages_2022]));
}

/// Nearest descendant of own type from the year is the year itself.
#[tokio::test]
async fn nearest_descendant_with_own_type_returns_self() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Current, RootContext::new(tree.year_2022, tree.years))
        .with_step(step(Direction::NearestDescendantOrSelf, "year"));

    let roots = service(&tree).get_dynamic_roots(&query).await.unwrap();
    assert_eq!(roots, set(&[tree.year_2022]));
}

/// Without steps the root set is the origin.
#[tokio::test]
async fn no_steps_returns_what_the_origin_finds() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Parent, RootContext::new(tree.year_2022, tree.years));

    let roots = service(&tree).get_dynamic_roots(&query).await.unwrap();
    assert_eq!(roots, set(&[tree.years]));
}

/// Once a step finds nothing, later steps see an empty set and the result stays empty.
#[tokio::test]
async fn dead_end_pipeline_is_empty() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Current, RootContext::new(tree.ran_d, tree.acts_2022))
        .with_step(step(Direction::NearestAncestorOrSelf, "year"))
        .with_step(step(Direction::NearestDescendantOrSelf, "stages"))
        .with_step(step(Direction::NearestDescendantOrSelf, "years"))
        .with_step(step(Direction::NearestDescendantOrSelf, "years"));

    let roots = service(&tree).get_dynamic_roots(&query).await.unwrap();
    assert!(roots.is_empty());
}

/// Stage nodes under one parent are both reached from their shared year.
#[tokio::test]
async fn sibling_matches_are_all_returned() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::ByKey, RootContext::creating(tree.years))
        .with_origin_key(tree.year_2022)
        .with_step(step(Direction::FurthestDescendantOrSelf, "stage"));

    let roots = service(&tree).get_dynamic_roots(&query).await.unwrap();
    assert_eq!(roots, set(&[tree.red, tree.blue]));
}

#[tokio::test]
async fn origin_parent_returns_parent_key() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Parent, RootContext::new(tree.year_2022, tree.years));
    assert_eq!(service(&tree).find_origin_key(&query).await.unwrap(), Some(tree.years));
}

#[tokio::test]
async fn origin_current_returns_current_key_when_it_exists() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Current, RootContext::new(tree.year_2022, tree.years));
    assert_eq!(service(&tree).find_origin_key(&query).await.unwrap(), Some(tree.year_2022));
}

#[tokio::test]
async fn origin_current_is_none_when_it_does_not_exist() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Current, RootContext::new(NodeKey::new(), tree.years));
    assert_eq!(service(&tree).find_origin_key(&query).await.unwrap(), None);
}

#[tokio::test]
async fn origin_root_takes_first_level_of_the_path() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Root, RootContext::new(tree.ran_d, tree.acts_2022));
    assert_eq!(service(&tree).find_origin_key(&query).await.unwrap(), Some(tree.years));
}

#[tokio::test]
async fn origin_site_includes_self_when_it_has_a_domain() {
    let tree = YearsTree::build();
    tree.store.assign_domain(tree.year_2022, "test.example.com").unwrap();

    let query = RootQuery::from_origin(OriginAlias::Site, RootContext::new(tree.year_2022, tree.years))
        .with_origin_key(tree.year_2022);
    assert_eq!(service(&tree).find_origin_key(&query).await.unwrap(), Some(tree.year_2022));
}

#[tokio::test]
async fn origin_site_returns_nearest_ancestor_with_a_domain() {
    let tree = YearsTree::build();
    tree.store.assign_domain(tree.years, "test.example.com").unwrap();

    let query = RootQuery::from_origin(OriginAlias::Site, RootContext::new(tree.ran_d, tree.acts_2022));
    assert_eq!(service(&tree).find_origin_key(&query).await.unwrap(), Some(tree.years));
}

#[tokio::test]
async fn origin_site_falls_back_to_root_without_domains() {
    let tree = YearsTree::build();
    let query = RootQuery::from_origin(OriginAlias::Site, RootContext::new(tree.ran_d, tree.acts_2022))
        .with_origin_key(tree.acts_2022);
    assert_eq!(service(&tree).find_origin_key(&query).await.unwrap(), Some(tree.years));
}

#[tokio::test]
async fn origin_with_random_key_is_none() {
    let tree = YearsTree::build();
    let service = service(&tree);

    for alias in [OriginAlias::ByKey, OriginAlias::Parent, OriginAlias::Root, OriginAlias::Site] {
        let random = NodeKey::new();
        let query = RootQuery::from_origin(alias, RootContext::new(random, NodeKey::new())).with_origin_key(random);
        assert_eq!(service.find_origin_key(&query).await.unwrap(), None, "{alias}");
    }
}

#[tokio::test]
async fn origin_with_trashed_key_is_still_allowed() {
    let tree = YearsTree::build();
    let service = service(&tree);

    for alias in OriginAlias::ALL {
        let query = RootQuery::from_origin(alias, RootContext::new(tree.trashed, tree.trashed))
            .with_origin_key(tree.trashed);
        assert!(service.find_origin_key(&query).await.unwrap().is_some(), "{alias}");
    }
}

/// Keys that name something other than a content node are not origins.
#[tokio::test]
async fn origin_with_foreign_key_is_none() {
    let tree = YearsTree::build();
    let service = service(&tree);
    let content_type_key = NodeKey::new();

    for alias in OriginAlias::ALL {
        let query = RootQuery::from_origin(alias, RootContext::new(content_type_key, content_type_key))
            .with_origin_key(content_type_key);
        assert_eq!(service.find_origin_key(&query).await.unwrap(), None, "{alias}");
    }
}

#[tokio::test]
async fn unknown_origin_alias_fails_before_lookup() {
    let tree = YearsTree::build();
    tree.store.set_unavailable(true);

    let query = RootQuery::new("Grandparent", RootContext::new(tree.ran_d, tree.acts_2022));
    let err = service(&tree).get_dynamic_roots(&query).await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Configuration(ConfigurationError::UnknownOrigin { .. })
    ));
}
