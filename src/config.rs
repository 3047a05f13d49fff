//! Graph configuration
//!
//! This module provides the knobs of a [`crate::Graph`]: how much arena space to
//! reserve up front and whether every mutation is followed by a full structural
//! verification of the use lists.

/// Configuration for a [`crate::Graph`]
///
/// Verification after mutation walks every use list in the graph and is therefore
/// O(total operands) per mutation. It is meant for tests, fuzzing and debugging passes
/// that rewrite operands, not for production pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphConfig {
    /// Number of nodes the arena reserves space for at construction
    pub initial_capacity: usize,

    /// Run [`crate::Graph::verify`] after every insertion, removal and rebind, and
    /// panic on the first inconsistency
    pub verify_after_mutation: bool,
}

impl Default for GraphConfig {
    /// Verification follows `debug_assertions`: on in debug builds, off in release.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::checked()
        } else {
            Self::fast()
        }
    }
}

impl GraphConfig {
    /// Creates a configuration without verification
    #[must_use]
    pub fn fast() -> Self {
        Self {
            initial_capacity: 0,
            verify_after_mutation: false,
        }
    }

    /// Creates a configuration that verifies the use lists after every mutation
    ///
    /// **Warning**: Quadratic overall for large graphs. Use for tests and fuzzing.
    #[must_use]
    pub fn checked() -> Self {
        Self {
            initial_capacity: 0,
            verify_after_mutation: true,
        }
    }

    /// Returns this configuration with `capacity` nodes reserved up front
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
