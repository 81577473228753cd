//! Resolved tree handed to sessions

use serde::Serialize;
use triage_model::{Address, PresentationNode};

/// Reference whose target was missing when the tree was built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedReference {
    /// Issue whose checklist held the reference
    pub origin: String,
    /// Missing target
    pub target: String,
    /// Address the expansion would have had
    pub address: Address,
}

/// Fully expanded, cycle-free tree for one root issue
///
/// Immutable once built; shared between sessions through `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTree {
    /// Issue the tree was built for
    pub root_name: String,
    /// Store generation the tree was built from
    pub generation: u64,
    /// Root node; its address is `[root title]`
    pub root: PresentationNode,
    /// Dangling references omitted during the build
    pub skipped_references: Vec<SkippedReference>,
}

impl ResolvedTree {
    /// Look up a node by address
    #[inline]
    #[must_use]
    pub fn find(&self, address: &Address) -> Option<&PresentationNode> {
        self.root.find(address)
    }

    /// Whether `address` names a node of this tree
    #[inline]
    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.find(address).is_some()
    }

    /// Number of nodes, root included
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Every node in pre-order
    pub fn nodes(&self) -> impl Iterator<Item = &PresentationNode> {
        self.root.iter()
    }
}
