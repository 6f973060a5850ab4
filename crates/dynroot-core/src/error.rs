//! Error types for DynRoot Core
//!
//! Provides error handling for:
//! - Pipeline configuration defects (unknown direction, unknown origin)
//! - Storage failures, propagated unchanged
//! - Cancellation and per-step deadlines
//!
//! A step that finds nothing is not an error; it resolves to an empty set.

use dynroot_store::StorageError;

/// Main resolution error type
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Pipeline is misconfigured; never retried
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Repository or scope failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Caller cancelled the resolution
    #[error("resolution cancelled")]
    Cancelled,

    /// A step exceeded its deadline
    #[error("step {step_index} timed out after {timeout_ms}ms")]
    StepTimedOut { step_index: usize, timeout_ms: u64 },
}

impl ResolveError {
    /// Check if error is a configuration defect
    #[inline]
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if a caller may reasonably retry
    ///
    /// Transient storage failures and deadlines are retryable; configuration
    /// defects and cancellation are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::StepTimedOut { .. } => true,
            Self::Configuration(_) | Self::Cancelled => false,
        }
    }
}

/// Broken pipeline setup, detected before any repository access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// No registered strategy handles the step's direction tag
    #[error("no strategy registered for direction '{tag}' (step {step_index})")]
    UnknownDirection { tag: String, step_index: usize },

    /// The strategy registered for a tag refused a step carrying that tag
    #[error("strategy for direction '{tag}' declined step {step_index}")]
    StrategyDeclined { tag: String, step_index: usize },

    /// No origin finder registered for the alias
    #[error("no origin finder registered for alias '{alias}'")]
    UnknownOrigin { alias: String },

    /// Pipeline longer than the configured maximum
    #[error("pipeline has {count} steps, maximum is {max}")]
    TooManySteps { count: usize, max: usize },
}

/// Origin finder registry could not be built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginRegistryError {
    /// A finder reported an empty alias
    #[error("origin finder at position {position} has an empty alias")]
    EmptyAlias { position: usize },

    /// Two finders claim the same alias
    #[error("origin alias '{alias}' registered twice (positions {first} and {second})")]
    DuplicateAlias {
        alias: String,
        first: usize,
        second: usize,
    },
}

/// Alias does not name a built-in origin
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown origin alias: {0}")]
pub struct ParseOriginAliasError(pub String);

/// Resolver configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed TOML
    #[error("invalid resolver config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Well-formed but unusable values
    #[error("invalid resolver config: {0}")]
    Invalid(String),
}
