//! Read-only snapshots of a session for API and rendering layers

use crate::state::NavState;
use serde::Serialize;
use triage_model::Address;

/// One step of the path from the root to the current node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Title of the node at this step
    pub title: String,
    /// Address to pass to `navigate_to_path` to return here
    pub address: Address,
}

/// Result of a transition that moves or confirms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationOutcome {
    /// Current path after the transition
    pub address: Address,
    /// Remedy surfaced as the solution, if any
    pub solution: Option<String>,
    /// Whether the target's children became the checklist
    pub descended: bool,
}

/// Serializable snapshot of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Coarse state
    pub state: NavState,
    /// Selected root issue
    pub root: Option<String>,
    /// Current path
    pub path: Address,
    /// Current path joined for display
    pub path_display: String,
    /// Title of the displayed node
    pub current_title: Option<String>,
    /// Number of checklist items under the checklist node
    pub item_count: usize,
    /// Number of excluded addresses
    pub excluded_count: usize,
    /// Whether a remedy is being shown
    pub has_remedy: bool,
    /// Whether the current node is the root
    pub at_root: bool,
    /// Whether an item is confirmed
    pub has_confirmation: bool,
}
