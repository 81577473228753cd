//! Navigation state machine
//!
//! ```text
//! NoRoot ──set_root──▶ AtRoot ──descend / confirm / navigate──▶ AtNode { confirmed }
//!    ▲                   ▲  ◀──────── ascend / navigate ────────────┘
//!    └──── reset ────────┴───────────────────────────────────────────┘
//! ```
//!
//! Every public session operation checks [`validate_transition`] before it
//! touches any field.

use crate::error::NavigationError;
use serde::Serialize;
use std::fmt;

/// Coarse state of a navigation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NavState {
    /// No root selected
    NoRoot,
    /// Current node is the tree root
    AtRoot,
    /// Current node is below the root
    AtNode {
        /// A confirmed item is being displayed
        confirmed: bool,
    },
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRoot => f.write_str("no root is selected"),
            Self::AtRoot => f.write_str("at the root"),
            Self::AtNode { confirmed: true } => f.write_str("showing a confirmed item"),
            Self::AtNode { confirmed: false } => f.write_str("below the root"),
        }
    }
}

/// Session operation, as checked against the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Select a root issue
    SetRoot,
    /// Move to a child of the current node
    Descend,
    /// Move to the parent of the current node
    Ascend,
    /// Jump to any address in the tree
    NavigateToPath,
    /// Mark an item as ruled out
    Exclude,
    /// Mark an item as the cause
    Confirm,
    /// Drop the confirmation and show the checklist again
    ClearConfirmation,
    /// Back to no root
    Reset,
}

impl Transition {
    /// Every transition, in declaration order
    pub const ALL: [Self; 8] = [
        Self::SetRoot,
        Self::Descend,
        Self::Ascend,
        Self::NavigateToPath,
        Self::Exclude,
        Self::Confirm,
        Self::ClearConfirmation,
        Self::Reset,
    ];
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SetRoot => "set root",
            Self::Descend => "descend",
            Self::Ascend => "ascend",
            Self::NavigateToPath => "navigate to path",
            Self::Exclude => "exclude",
            Self::Confirm => "confirm",
            Self::ClearConfirmation => "clear confirmation",
            Self::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// Transitions permitted from `from`
#[must_use]
pub fn allowed_transitions(from: NavState) -> Vec<Transition> {
    use Transition::*;
    match from {
        NavState::NoRoot => vec![SetRoot, Reset],
        NavState::AtRoot => vec![SetRoot, Descend, NavigateToPath, Exclude, Confirm, Reset],
        NavState::AtNode { confirmed: false } => vec![
            SetRoot,
            Descend,
            Ascend,
            NavigateToPath,
            Exclude,
            Confirm,
            Reset,
        ],
        NavState::AtNode { confirmed: true } => vec![
            SetRoot,
            Descend,
            Ascend,
            NavigateToPath,
            Exclude,
            Confirm,
            ClearConfirmation,
            Reset,
        ],
    }
}

/// Check a transition against the table
///
/// # Errors
/// - [`NavigationError::StaleState`] for anything but `SetRoot`/`Reset`
///   before a root is set
/// - [`NavigationError::AlreadyAtRoot`] for `Ascend` at the root
/// - [`NavigationError::IllegalTransition`] otherwise
pub fn validate_transition(from: NavState, transition: Transition) -> Result<(), NavigationError> {
    if allowed(from, transition) {
        return Ok(());
    }
    Err(match (from, transition) {
        (NavState::NoRoot, _) => NavigationError::StaleState { transition },
        (NavState::AtRoot, Transition::Ascend) => NavigationError::AlreadyAtRoot,
        _ => NavigationError::IllegalTransition {
            state: from,
            transition,
        },
    })
}

fn allowed(from: NavState, transition: Transition) -> bool {
    allowed_transitions(from).into_iter().any(|t| t == transition)
}
