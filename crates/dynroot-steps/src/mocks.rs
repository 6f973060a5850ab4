//! Test doubles for the storage boundary

use async_trait::async_trait;
use dynroot_store::{Scope, ScopeProvider, StorageError, TreeQueryRepository};
use dynroot_tree::{OriginSet, TypeFilter};
use mockall::mock;

mock! {
    pub Repository {}

    #[async_trait]
    impl TreeQueryRepository for Repository {
        async fn nearest_ancestor_or_self(
            &self,
            origins: &OriginSet,
            filter: &TypeFilter,
        ) -> Result<OriginSet, StorageError>;

        async fn furthest_ancestor_or_self(
            &self,
            origins: &OriginSet,
            filter: &TypeFilter,
        ) -> Result<OriginSet, StorageError>;

        async fn nearest_descendant_or_self(
            &self,
            origins: &OriginSet,
            filter: &TypeFilter,
        ) -> Result<OriginSet, StorageError>;

        async fn furthest_descendant_or_self(
            &self,
            origins: &OriginSet,
            filter: &TypeFilter,
        ) -> Result<OriginSet, StorageError>;
    }
}

mock! {
    pub Scopes {}

    #[async_trait]
    impl ScopeProvider for Scopes {
        async fn begin_scope(&self) -> Result<Box<dyn Scope>, StorageError>;
    }
}

/// Repository and scope provider that fail the test on any call
pub(crate) fn untouchable() -> (MockRepository, MockScopes) {
    let mut repository = MockRepository::new();
    repository.expect_nearest_ancestor_or_self().never();
    repository.expect_furthest_ancestor_or_self().never();
    repository.expect_nearest_descendant_or_self().never();
    repository.expect_furthest_descendant_or_self().never();

    let mut scopes = MockScopes::new();
    scopes.expect_begin_scope().never();

    (repository, scopes)
}
