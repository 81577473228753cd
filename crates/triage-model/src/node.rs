//! Resolved presentation tree nodes
//!
//! A [`PresentationNode`] tree is built once per root by the resolver and
//! shared read-only between sessions. Per-session facts (excluded,
//! confirmed) never live on the node.

use crate::address::Address;
use crate::issue::{Links, Priority};
use serde::Serialize;

/// Node of a fully expanded, cycle-free tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentationNode {
    /// Display title; unique among siblings
    pub title: String,
    /// How to confirm the cause
    pub description: String,
    /// Importance among siblings
    pub priority: Priority,
    /// Affected version range
    pub version: Option<String>,
    /// Fix for this cause, empty for roots and reference expansions
    pub remedy: String,
    /// Supporting links
    pub links: Links,
    /// Record that produced this node
    pub source_record_id: String,
    /// Titles from the tree root down to this node
    pub address: Address,
    /// Children in declaration order
    pub children: Vec<PresentationNode>,
    /// Inlined root of a referenced issue
    pub is_reference_expansion: bool,
    /// Issue whose checklist held the reference, for expansions
    pub reference_origin: Option<String>,
}

impl PresentationNode {
    /// Whether the node has any children
    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether a non-empty remedy is attached
    #[inline]
    #[must_use]
    pub fn has_remedy(&self) -> bool {
        !self.remedy.trim().is_empty()
    }

    /// Children sorted by priority, highest first
    ///
    /// Ties keep declaration order.
    #[must_use]
    pub fn children_by_priority(&self) -> Vec<&PresentationNode> {
        let mut children: Vec<_> = self.children.iter().collect();
        children.sort_by(|a, b| b.priority.cmp(&a.priority));
        children
    }

    /// Direct child with the given title
    #[must_use]
    pub fn child(&self, title: &str) -> Option<&PresentationNode> {
        self.children.iter().find(|c| c.title == title)
    }

    /// Walk `address` from this node
    ///
    /// `address[0]` must equal this node's title; each further segment
    /// descends one level by title. Returns `None` on any miss.
    #[must_use]
    pub fn find(&self, address: &Address) -> Option<&PresentationNode> {
        let mut segments = address.iter();
        if segments.next()? != self.title {
            return None;
        }
        segments.try_fold(self, |node, title| node.child(title))
    }

    /// Number of nodes in this subtree, including this node
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Depth of this subtree; a lone node has depth 0
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children.iter().map(|c| c.depth() + 1).max().unwrap_or(0)
    }

    /// Pre-order iterator over this subtree
    pub fn iter(&self) -> impl Iterator<Item = &PresentationNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}
