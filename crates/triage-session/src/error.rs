//! Error types for navigation sessions
//!
//! Every failed transition leaves the session exactly as it was.

use crate::state::{NavState, Transition};
use triage_model::Address;
use triage_resolve::ResolveError;

/// Errors from navigation transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// Operation needs a root and none is set
    #[error("no root issue selected; cannot {transition}")]
    StaleState {
        /// Attempted operation
        transition: Transition,
    },

    /// Address does not resolve against the current tree
    #[error("cannot navigate there: {address}")]
    InvalidPath {
        /// Rejected address
        address: Address,
    },

    /// Ascend attempted with the root as current node
    #[error("already at the root issue")]
    AlreadyAtRoot,

    /// Transition not permitted from the current state
    #[error("cannot {transition} while {state}")]
    IllegalTransition {
        /// State the session was in
        state: NavState,
        /// Rejected operation
        transition: Transition,
    },

    /// Root issue could not be resolved
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl NavigationError {
    /// Check if the caller can carry on with the same session
    ///
    /// Navigation failures are recoverable; a root that failed to resolve
    /// needs different records or a different root.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Resolve(e) => !e.is_structural(),
            _ => true,
        }
    }

    /// Invalid path error for `address`
    #[inline]
    #[must_use]
    pub fn invalid_path(address: &Address) -> Self {
        Self::InvalidPath {
            address: address.clone(),
        }
    }
}

/// Result type for navigation operations
pub type NavigationResult<T> = Result<T, NavigationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = NavigationError::invalid_path(&Address::from(["A", "Q"]));
        assert_eq!(err.to_string(), "cannot navigate there: A → Q");

        let err = NavigationError::StaleState {
            transition: Transition::Descend,
        };
        assert_eq!(err.to_string(), "no root issue selected; cannot descend");

        let err: NavigationError = ResolveError::NotFound("Z".into()).into();
        assert_eq!(err.to_string(), "issue not found: 'Z'");
    }

    #[test]
    fn recoverability() {
        assert!(NavigationError::AlreadyAtRoot.is_recoverable());
        assert!(NavigationError::from(ResolveError::NotFound("Z".into())).is_recoverable());
        assert!(!NavigationError::from(ResolveError::CycleDetected {
            chain: vec!["A".into(), "A".into()]
        })
        .is_recoverable());
    }
}
