//! Query step descriptors
//!
//! Provides [`QueryStep`], one traversal instruction, and [`Direction`], the
//! built-in direction tags.

use dynroot_tree::TypeFilter;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Built-in traversal directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Closest matching ancestor-or-self
    NearestAncestorOrSelf,
    /// Topmost matching ancestor-or-self
    FurthestAncestorOrSelf,
    /// First matching node on each downward branch
    NearestDescendantOrSelf,
    /// Deepest matching node on each downward branch
    FurthestDescendantOrSelf,
}

impl Direction {
    /// All built-in directions, in default registration order
    pub const ALL: [Self; 4] = [
        Self::NearestAncestorOrSelf,
        Self::FurthestAncestorOrSelf,
        Self::NearestDescendantOrSelf,
        Self::FurthestDescendantOrSelf,
    ];

    /// Direction tag carried by query steps
    #[inline]
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::NearestAncestorOrSelf => "NearestAncestorOrSelf",
            Self::FurthestAncestorOrSelf => "FurthestAncestorOrSelf",
            Self::NearestDescendantOrSelf => "NearestDescendantOrSelf",
            Self::FurthestDescendantOrSelf => "FurthestDescendantOrSelf",
        }
    }

    /// Check if the direction walks upward
    #[inline]
    #[must_use]
    pub const fn is_ancestor(self) -> bool {
        matches!(self, Self::NearestAncestorOrSelf | Self::FurthestAncestorOrSelf)
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Tag does not name a built-in direction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction tag: {0}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_tag() == s)
            .ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}

/// One traversal instruction: which direction to walk and which types match
///
/// The tag is a plain string so host applications can register directions
/// beyond the built-in ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStep {
    direction_tag: String,
    #[serde(default)]
    type_filter: TypeFilter,
}

impl QueryStep {
    /// Create step for any direction tag
    #[must_use]
    pub fn new(direction_tag: impl Into<String>, type_filter: TypeFilter) -> Self {
        Self {
            direction_tag: direction_tag.into(),
            type_filter,
        }
    }

    /// Create step for a built-in direction
    #[inline]
    #[must_use]
    pub fn of(direction: Direction, type_filter: TypeFilter) -> Self {
        Self::new(direction.as_tag(), type_filter)
    }

    /// Direction tag
    #[inline]
    #[must_use]
    pub fn direction_tag(&self) -> &str {
        &self.direction_tag
    }

    /// Built-in direction, if the tag names one
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.direction_tag.parse().ok()
    }

    /// Accepted content types (empty = any)
    #[inline]
    #[must_use]
    pub fn type_filter(&self) -> &TypeFilter {
        &self.type_filter
    }
}

impl Display for QueryStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.type_filter.is_wildcard() {
            write!(f, "{}(*)", self.direction_tag)
        } else {
            let aliases: Vec<&str> = self.type_filter.aliases().collect();
            write!(f, "{}({})", self.direction_tag, aliases.join("|"))
        }
    }
}
