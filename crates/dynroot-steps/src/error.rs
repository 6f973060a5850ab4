//! Registry construction errors

/// Strategy registry could not be built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A strategy reported an empty direction tag
    #[error("strategy at position {position} has an empty direction tag")]
    EmptyDirectionTag { position: usize },

    /// Two strategies claim the same direction tag
    #[error("direction tag '{tag}' registered twice (positions {first} and {second})")]
    DuplicateDirection {
        tag: String,
        first: usize,
        second: usize,
    },
}
