//! Core types for DynRoot resolution

use crate::error::{ConfigError, ParseOriginAliasError};
use dynroot_steps::QueryStep;
use dynroot_tree::NodeKey;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

/// Built-in origin aliases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginAlias {
    /// Top-level ancestor-or-self of the parent
    Root,
    /// The parent itself
    Parent,
    /// The node being edited
    Current,
    /// Nearest ancestor-or-self with an assigned domain
    Site,
    /// An explicit node key
    ByKey,
}

impl OriginAlias {
    /// All built-in aliases, in default registration order
    pub const ALL: [Self; 5] = [Self::Root, Self::Parent, Self::Current, Self::Site, Self::ByKey];

    /// Alias carried by root queries
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Parent => "Parent",
            Self::Current => "Current",
            Self::Site => "Site",
            Self::ByKey => "ByKey",
        }
    }
}

impl Display for OriginAlias {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OriginAlias {
    type Err = ParseOriginAliasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ParseOriginAliasError(s.to_string()))
    }
}

/// Where in the tree the query is evaluated from
///
/// `current_key` is absent while a node is being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootContext {
    #[serde(default)]
    pub current_key: Option<NodeKey>,
    pub parent_key: NodeKey,
}

impl RootContext {
    /// Context of an existing node
    #[inline]
    #[must_use]
    pub fn new(current_key: NodeKey, parent_key: NodeKey) -> Self {
        Self {
            current_key: Some(current_key),
            parent_key,
        }
    }

    /// Context of a node not yet created under `parent_key`
    #[inline]
    #[must_use]
    pub fn creating(parent_key: NodeKey) -> Self {
        Self {
            current_key: None,
            parent_key,
        }
    }
}

/// A dynamic root query: origin selection plus the step pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootQuery {
    pub origin_alias: String,
    #[serde(default)]
    pub origin_key: Option<NodeKey>,
    pub context: RootContext,
    #[serde(default)]
    pub steps: Vec<QueryStep>,
}

impl RootQuery {
    /// Create query without steps
    #[must_use]
    pub fn new(origin_alias: impl Into<String>, context: RootContext) -> Self {
        Self {
            origin_alias: origin_alias.into(),
            origin_key: None,
            context,
            steps: Vec::new(),
        }
    }

    /// Create query for a built-in origin
    #[inline]
    #[must_use]
    pub fn from_origin(origin: OriginAlias, context: RootContext) -> Self {
        Self::new(origin.as_str(), context)
    }

    /// With explicit origin key (used by `ByKey`)
    #[inline]
    #[must_use]
    pub fn with_origin_key(mut self, key: NodeKey) -> Self {
        self.origin_key = Some(key);
        self
    }

    /// Append a step
    #[inline]
    #[must_use]
    pub fn with_step(mut self, step: QueryStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Replace all steps
    #[inline]
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<QueryStep>) -> Self {
        self.steps = steps;
        self
    }
}

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Deadline per step in milliseconds (`None` = unbounded)
    pub step_timeout_ms: Option<u64>,
    /// Longest accepted pipeline
    pub max_steps: usize,
    /// Emit an info event per completed resolution
    pub log_resolutions: bool,
}

impl ResolverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With per-step deadline
    #[inline]
    #[must_use]
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// With maximum pipeline length
    #[inline]
    #[must_use]
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    /// With resolution summary logging on or off
    #[inline]
    #[must_use]
    pub fn with_log_resolutions(mut self, enabled: bool) -> Self {
        self.log_resolutions = enabled;
        self
    }

    /// Per-step deadline
    #[inline]
    #[must_use]
    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_ms.map(Duration::from_millis)
    }

    /// Parse and validate from TOML
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML
    /// - `ConfigError::Invalid` on a zero step limit or zero deadline
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values are usable
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` on a zero step limit or zero deadline
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::Invalid("max_steps must be at least 1".to_string()));
        }
        if self.step_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "step_timeout_ms must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            step_timeout_ms: None,
            max_steps: 32,
            log_resolutions: true,
        }
    }
}
