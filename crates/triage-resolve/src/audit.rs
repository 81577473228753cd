//! Reference audit over a store generation
//!
//! Reports on the reference graph without failing: dangling references,
//! issues nothing points at, the transitive reference closure of a root,
//! and structural findings on a resolved tree.

use crate::engine::TreeResolver;
use crate::error::ResolveResult;
use crate::tree::ResolvedTree;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use triage_model::{Address, ChecklistEntry, IssueSet, PresentationNode};

/// Reference whose target is not in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DanglingReference {
    /// Issue holding the reference
    pub source: String,
    /// Missing target
    pub target: String,
}

/// Structural finding on a resolved tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeFinding {
    /// Node deeper than the allowed ceiling
    TooDeep {
        /// Offending node
        address: Address,
        /// Ceiling
        limit: usize,
    },
    /// Node with a blank title
    EmptyTitle {
        /// Offending node
        address: Address,
    },
    /// Two nodes share an address
    DuplicateAddress {
        /// Shared address
        address: Address,
    },
    /// Reference omitted because its target is missing
    SkippedReference {
        /// Issue holding the reference
        origin: String,
        /// Missing target
        target: String,
    },
}

impl fmt::Display for TreeFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooDeep { address, limit } => {
                write!(f, "tree deeper than {limit} levels: {address}")
            }
            Self::EmptyTitle { address } => write!(f, "empty title at {address}"),
            Self::DuplicateAddress { address } => write!(f, "duplicate address {address}"),
            Self::SkippedReference { origin, target } => {
                write!(f, "issue '{origin}' references missing issue '{target}'")
            }
        }
    }
}

fn collect_references<'a>(entries: &'a [ChecklistEntry], out: &mut Vec<&'a str>) {
    for entry in entries {
        match entry {
            ChecklistEntry::Reference(r) => out.push(&r.issue),
            ChecklistEntry::Detail(d) => collect_references(&d.children, out),
        }
    }
}

/// Names referenced from `root`, following references transitively
///
/// Safe on cyclic graphs; `root` itself appears only if something refers
/// back to it. Missing targets are included.
#[must_use]
pub fn referenced_issues(issues: &IssueSet, root: &str) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut expanded = HashSet::new();
    let mut pending = vec![root.to_string()];

    while let Some(name) = pending.pop() {
        if !expanded.insert(name.clone()) {
            continue;
        }
        let Some(issue) = issues.get(&name) else { continue };

        let mut refs = Vec::new();
        collect_references(&issue.checklist, &mut refs);
        for target in refs {
            seen.insert(target.to_string());
            pending.push(target.to_string());
        }
    }

    seen
}

/// Every reference, at any nesting level, whose target is missing
#[must_use]
pub fn dangling_references(issues: &IssueSet) -> Vec<DanglingReference> {
    let mut dangling = Vec::new();
    for issue in issues.iter() {
        let mut refs = Vec::new();
        collect_references(&issue.checklist, &mut refs);
        dangling.extend(
            refs.into_iter()
                .filter(|target| !issues.contains(target))
                .map(|target| DanglingReference {
                    source: issue.name.clone(),
                    target: target.to_string(),
                }),
        );
    }
    dangling
}

/// Issues that are neither visible nor referenced by any other issue
///
/// Such issues can never be reached by navigation.
#[must_use]
pub fn orphan_issues(issues: &IssueSet) -> Vec<String> {
    let mut referenced = HashSet::new();
    for issue in issues.iter() {
        let mut refs = Vec::new();
        collect_references(&issue.checklist, &mut refs);
        referenced.extend(refs.into_iter().filter(|target| *target != issue.name));
    }

    issues
        .iter()
        .filter(|issue| !issue.visible && !referenced.contains(issue.name.as_str()))
        .map(|issue| issue.name.clone())
        .collect()
}

/// Structural findings on a resolved tree
///
/// Empty when the tree is sound.
#[must_use]
pub fn validate_tree(tree: &ResolvedTree, max_depth: usize) -> Vec<TreeFinding> {
    let mut findings: Vec<TreeFinding> = tree
        .skipped_references
        .iter()
        .map(|s| TreeFinding::SkippedReference {
            origin: s.origin.clone(),
            target: s.target.clone(),
        })
        .collect();

    let mut seen = HashSet::new();
    validate_node(&tree.root, 0, max_depth, &mut seen, &mut findings);
    findings
}

impl TreeResolver {
    /// Resolve `root_name` and report structural findings on the result
    ///
    /// # Errors
    /// Returns the resolution error when the tree cannot be built at all
    pub fn validate_tree_structure(&self, root_name: &str) -> ResolveResult<Vec<TreeFinding>> {
        let tree = self.resolve(root_name)?;
        Ok(validate_tree(&tree, self.config().max_depth))
    }
}

fn validate_node<'a>(
    node: &'a PresentationNode,
    depth: usize,
    max_depth: usize,
    seen: &mut HashSet<&'a Address>,
    findings: &mut Vec<TreeFinding>,
) {
    if depth > max_depth {
        findings.push(TreeFinding::TooDeep {
            address: node.address.clone(),
            limit: max_depth,
        });
        return;
    }
    if node.title.trim().is_empty() {
        findings.push(TreeFinding::EmptyTitle {
            address: node.address.clone(),
        });
    }
    if !seen.insert(&node.address) {
        findings.push(TreeFinding::DuplicateAddress {
            address: node.address.clone(),
        });
    }
    for child in &node.children {
        validate_node(child, depth + 1, max_depth, seen, findings);
    }
}
