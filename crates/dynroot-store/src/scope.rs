//! Scope / unit-of-work boundary
//!
//! A [`Scope`] groups the repository reads of one traversal step. Callers
//! call [`Scope::complete`] on success; dropping a scope that was not
//! completed rolls it back. Release therefore happens on every exit path,
//! including `?` returns and dropped (cancelled) futures.

use crate::error::StorageError;
use async_trait::async_trait;
use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Scope identifier (unique per provider)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u64);

impl Display for ScopeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// An open unit of work
///
/// Implementations finalize in `Drop`: committed if completed, rolled back
/// otherwise.
pub trait Scope: Send {
    /// Scope identifier
    fn id(&self) -> ScopeId;

    /// Mark the unit of work as successful
    fn complete(&mut self);

    /// Whether [`Scope::complete`] was called
    fn is_completed(&self) -> bool;
}

/// Source of scopes
///
/// Acquisition may suspend (e.g. waiting for a pooled connection).
#[async_trait]
pub trait ScopeProvider: Send + Sync {
    /// Open a read-only scope
    async fn begin_scope(&self) -> Result<Box<dyn Scope>, StorageError>;
}

/// Scope lifecycle statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeStats {
    /// Scopes opened
    pub opened: usize,
    /// Scopes completed before release
    pub completed: usize,
    /// Scopes released without completion
    pub rolled_back: usize,
}

impl ScopeStats {
    /// Scopes not yet released
    #[inline]
    #[must_use]
    pub fn active(&self) -> usize {
        self.opened
            .saturating_sub(self.completed)
            .saturating_sub(self.rolled_back)
    }
}

/// Shared counters for scope lifecycle events
#[derive(Debug, Default)]
pub struct ScopeTracker {
    opened: AtomicUsize,
    completed: AtomicUsize,
    rolled_back: AtomicUsize,
}

impl ScopeTracker {
    /// Create new tracker
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the counters
    ///
    /// Release counters are read before `opened`, so a snapshot never shows
    /// more releases than opens.
    #[must_use]
    pub fn stats(&self) -> ScopeStats {
        let rolled_back = self.rolled_back.load(Ordering::SeqCst);
        let completed = self.completed.load(Ordering::SeqCst);
        let opened = self.opened.load(Ordering::SeqCst);
        ScopeStats {
            opened,
            completed,
            rolled_back,
        }
    }

    fn record_open(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
    }

    fn record_release(&self, completed: bool) {
        if completed {
            self.completed.fetch_add(1, Ordering::SeqCst);
        } else {
            self.rolled_back.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// In-process scope provider
///
/// Hands out [`MemoryScope`]s and records their lifecycle in a shared
/// [`ScopeTracker`]. Can be switched unavailable to simulate connection
/// acquisition failures.
#[derive(Debug, Default)]
pub struct MemoryScopeProvider {
    tracker: Arc<ScopeTracker>,
    next_id: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryScopeProvider {
    /// Create new provider
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle counters shared with every scope this provider opened
    #[inline]
    #[must_use]
    pub fn tracker(&self) -> Arc<ScopeTracker> {
        Arc::clone(&self.tracker)
    }

    /// Snapshot of lifecycle counters
    #[inline]
    #[must_use]
    pub fn stats(&self) -> ScopeStats {
        self.tracker.stats()
    }

    /// Make subsequent `begin_scope` calls fail (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ScopeProvider for MemoryScopeProvider {
    async fn begin_scope(&self) -> Result<Box<dyn Scope>, StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::ScopeFailed(
                "no connection available".to_string(),
            ));
        }

        let id = ScopeId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.tracker.record_open();
        tracing::trace!(scope = %id, "scope opened");

        Ok(Box::new(MemoryScope {
            id,
            completed: false,
            tracker: Arc::clone(&self.tracker),
        }))
    }
}

/// Scope handed out by [`MemoryScopeProvider`]
#[derive(Debug)]
pub struct MemoryScope {
    id: ScopeId,
    completed: bool,
    tracker: Arc<ScopeTracker>,
}

impl Scope for MemoryScope {
    fn id(&self) -> ScopeId {
        self.id
    }

    fn complete(&mut self) {
        self.completed = true;
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}

impl Drop for MemoryScope {
    fn drop(&mut self) {
        self.tracker.record_release(self.completed);
        if self.completed {
            tracing::trace!(scope = %self.id, "scope completed");
        } else {
            tracing::trace!(scope = %self.id, "scope rolled back");
        }
    }
}
