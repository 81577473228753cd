//! Error types for tree resolution
//!
//! Resolution failures abort the whole root: nothing partial is cached.

use triage_model::{Address, ADDRESS_SEPARATOR};

/// Errors from resolving a root issue into a presentation tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Root issue absent from the store
    #[error("issue not found: '{0}'")]
    NotFound(String),

    /// A reference chain returned to an issue still being expanded
    #[error("circular reference detected among: {}", .chain.join(ADDRESS_SEPARATOR))]
    CycleDetected {
        /// Names from the first occurrence of the repeated issue to the repeat
        chain: Vec<String>,
    },

    /// Two siblings would share an address
    #[error("duplicate sibling title '{title}' under {parent}")]
    DuplicateSibling {
        /// Address of the common parent
        parent: Address,
        /// Colliding title
        title: String,
    },

    /// Expansion went deeper than the configured ceiling
    #[error("tree deeper than {limit} levels at {address}")]
    DepthExceeded {
        /// Address where the ceiling was crossed
        address: Address,
        /// Configured ceiling
        limit: usize,
    },
}

impl ResolveError {
    /// Offending chain for cycle errors
    #[must_use]
    pub fn cycle_chain(&self) -> Option<&[String]> {
        match self {
            Self::CycleDetected { chain } => Some(chain),
            _ => None,
        }
    }

    /// Check if the error comes from the shape of the records rather than
    /// from a missing root
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::CycleDetected { .. } | Self::DuplicateSibling { .. } | Self::DepthExceeded { .. }
        )
    }
}

/// Errors while reading resolver configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed TOML
    #[error("invalid resolver config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Value outside its accepted range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type alias for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;
