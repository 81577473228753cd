//! Navigation session over one resolved tree
//!
//! The session holds a shared, read-only [`ResolvedTree`] plus its own
//! overlays: current path, excluded addresses, confirmed address and the
//! remedy being shown. Nodes are never modified.
//!
//! Transitions are all-or-nothing: each one validates against the
//! transition table and resolves every address it needs before assigning
//! any field.

use crate::error::{NavigationError, NavigationResult};
use crate::state::{validate_transition, NavState, Transition};
use crate::view::{Breadcrumb, NavigationOutcome, SessionSummary};
use std::collections::BTreeSet;
use std::sync::Arc;
use triage_model::{Address, IssueStore, PresentationNode};
use triage_resolve::{ResolvedTree, TreeResolver};

/// One user's navigation state
///
/// Not shareable between threads without external locking; callers
/// serialize transitions per session.
#[derive(Debug)]
pub struct NavigationSession {
    resolver: Arc<TreeResolver>,
    root_name: Option<String>,
    tree: Option<Arc<ResolvedTree>>,
    path: Address,
    excluded: BTreeSet<Address>,
    confirmed: Option<Address>,
    active_remedy: Option<String>,
}

impl NavigationSession {
    /// Create a session with no root selected
    #[must_use]
    pub fn new(resolver: Arc<TreeResolver>) -> Self {
        Self {
            resolver,
            root_name: None,
            tree: None,
            path: Address::default(),
            excluded: BTreeSet::new(),
            confirmed: None,
            active_remedy: None,
        }
    }

    /// Current coarse state
    #[must_use]
    pub fn state(&self) -> NavState {
        match &self.tree {
            None => NavState::NoRoot,
            Some(_) if self.path.is_root() => NavState::AtRoot,
            Some(_) => NavState::AtNode {
                confirmed: self.confirmed.is_some(),
            },
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Select `name` as the root issue
    ///
    /// Clears exclusions, confirmation and remedy, and moves to the root.
    ///
    /// # Errors
    /// Returns [`NavigationError::Resolve`] when the tree cannot be built;
    /// the session is unchanged
    pub fn set_root(&mut self, name: &str) -> NavigationResult<()> {
        self.check(Transition::SetRoot)?;
        let tree = self.resolver.resolve(name).map_err(|e| {
            tracing::warn!(root = name, error = %e, "failed to set root");
            NavigationError::from(e)
        })?;

        self.path = tree.root.address.clone();
        self.root_name = Some(name.to_string());
        self.tree = Some(tree);
        self.excluded.clear();
        self.confirmed = None;
        self.active_remedy = None;

        tracing::debug!(root = name, "root selected");
        Ok(())
    }

    /// Move to the child of the current node titled `title`
    ///
    /// A leaf child with a remedy yields it as the solution. Any
    /// confirmation is released.
    ///
    /// # Errors
    /// - [`NavigationError::StaleState`] without a root
    /// - [`NavigationError::InvalidPath`] when no such child exists
    pub fn descend(&mut self, title: &str) -> NavigationResult<NavigationOutcome> {
        let tree = self.guard(Transition::Descend)?;
        let target = self.path.child(title);
        let node = self.lookup(&tree, &target)?;

        let solution = (!node.has_children() && node.has_remedy()).then(|| node.remedy.clone());

        self.path = target.clone();
        self.confirmed = None;
        self.active_remedy = solution.clone();

        tracing::debug!(path = %target, solution = solution.is_some(), "descended");
        Ok(NavigationOutcome {
            address: target,
            solution,
            descended: true,
        })
    }

    /// Move to the parent of the current node, releasing any confirmation
    ///
    /// # Errors
    /// - [`NavigationError::StaleState`] without a root
    /// - [`NavigationError::AlreadyAtRoot`] at the root
    pub fn ascend(&mut self) -> NavigationResult<Address> {
        let tree = self.guard(Transition::Ascend)?;
        let parent = self.path.parent().ok_or(NavigationError::AlreadyAtRoot)?;
        self.lookup(&tree, &parent)?;

        self.path = parent.clone();
        self.confirmed = None;
        self.active_remedy = None;

        tracing::debug!(path = %parent, "ascended");
        Ok(parent)
    }

    /// Jump to `address`, releasing any confirmation
    ///
    /// # Errors
    /// - [`NavigationError::StaleState`] without a root
    /// - [`NavigationError::InvalidPath`] when `address` is not in the tree
    pub fn navigate_to_path(&mut self, address: &Address) -> NavigationResult<()> {
        let tree = self.guard(Transition::NavigateToPath)?;
        self.lookup(&tree, address)?;

        self.path = address.clone();
        self.confirmed = None;
        self.active_remedy = None;

        tracing::debug!(path = %address, "navigated");
        Ok(())
    }

    /// Jump back to the root node
    ///
    /// # Errors
    /// Returns [`NavigationError::StaleState`] without a root
    pub fn navigate_to_root(&mut self) -> NavigationResult<()> {
        let tree = self.guard(Transition::NavigateToPath)?;
        self.navigate_to_path(&tree.root.address)
    }

    /// Mark `address` as ruled out
    ///
    /// Idempotent; returns whether the address was newly excluded. The
    /// current path is not affected.
    ///
    /// # Errors
    /// - [`NavigationError::StaleState`] without a root
    /// - [`NavigationError::InvalidPath`] for the root or an unknown address
    pub fn exclude(&mut self, address: &Address) -> NavigationResult<bool> {
        let tree = self.guard(Transition::Exclude)?;
        self.lookup_item(&tree, address)?;

        let added = self.excluded.insert(address.clone());
        tracing::debug!(item = %address, added, "excluded");
        Ok(added)
    }

    /// Confirm `address` as the cause and move the current path to it
    ///
    /// In order:
    /// 1. a reference expansion with children is descended into
    /// 2. a reference expansion without children stays confirmed
    /// 3. a leaf with a remedy surfaces it as the solution
    /// 4. any other node with children is descended into
    /// 5. anything else stays confirmed with no solution
    ///
    /// Excluded items may be confirmed; they stay excluded.
    ///
    /// # Errors
    /// - [`NavigationError::StaleState`] without a root
    /// - [`NavigationError::InvalidPath`] for the root or an unknown address
    pub fn confirm(&mut self, address: &Address) -> NavigationResult<NavigationOutcome> {
        let tree = self.guard(Transition::Confirm)?;
        let node = self.lookup_item(&tree, address)?;

        let (solution, descended) = if node.is_reference_expansion {
            (None, node.has_children())
        } else if !node.has_children() && node.has_remedy() {
            (Some(node.remedy.clone()), false)
        } else {
            (None, node.has_children())
        };

        self.path = address.clone();
        self.confirmed = Some(address.clone());
        self.active_remedy = solution.clone();

        tracing::debug!(item = %address, descended, solution = solution.is_some(), "confirmed");
        Ok(NavigationOutcome {
            address: address.clone(),
            solution,
            descended,
        })
    }

    /// Drop the confirmation and return to the checklist it was made from
    ///
    /// # Errors
    /// - [`NavigationError::StaleState`] without a root
    /// - [`NavigationError::IllegalTransition`] when nothing is confirmed
    pub fn clear_confirmation(&mut self) -> NavigationResult<Address> {
        let tree = self.guard(Transition::ClearConfirmation)?;
        let confirmed = self
            .confirmed
            .as_ref()
            .ok_or_else(|| NavigationError::IllegalTransition {
                state: self.state(),
                transition: Transition::ClearConfirmation,
            })?;
        let parent = confirmed
            .parent()
            .ok_or_else(|| NavigationError::invalid_path(confirmed))?;
        self.lookup(&tree, &parent)?;

        self.path = parent.clone();
        self.confirmed = None;
        self.active_remedy = None;

        tracing::debug!(path = %parent, "confirmation cleared");
        Ok(parent)
    }

    /// Back to no root; always succeeds
    pub fn reset(&mut self) {
        self.root_name = None;
        self.tree = None;
        self.path = Address::default();
        self.excluded.clear();
        self.confirmed = None;
        self.active_remedy = None;
        tracing::debug!("session reset");
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Selected root issue
    #[must_use]
    pub fn root_name(&self) -> Option<&str> {
        self.root_name.as_deref()
    }

    /// Tree the session walks
    #[must_use]
    pub fn tree(&self) -> Option<&Arc<ResolvedTree>> {
        self.tree.as_ref()
    }

    /// Current path; empty before a root is set
    #[must_use]
    pub fn current_path(&self) -> &Address {
        &self.path
    }

    /// Node at the current path
    #[must_use]
    pub fn current_node(&self) -> Option<&PresentationNode> {
        self.tree.as_ref()?.find(&self.path)
    }

    /// Confirmed address
    #[must_use]
    pub fn confirmed_address(&self) -> Option<&Address> {
        self.confirmed.as_ref()
    }

    /// Confirmed node
    #[must_use]
    pub fn confirmed_node(&self) -> Option<&PresentationNode> {
        self.tree.as_ref()?.find(self.confirmed.as_ref()?)
    }

    /// Node the detail view shows: the confirmed node, else the current one
    #[must_use]
    pub fn display_node(&self) -> Option<&PresentationNode> {
        self.confirmed_node().or_else(|| self.current_node())
    }

    /// Children of the current checklist node, highest priority first
    ///
    /// The checklist node is the confirmed node when it has children,
    /// otherwise the node at the current path. Ties keep declaration order.
    #[must_use]
    pub fn current_checklist_items(&self) -> Vec<&PresentationNode> {
        self.confirmed_node()
            .filter(|node| node.has_children())
            .or_else(|| self.current_node())
            .map(PresentationNode::children_by_priority)
            .unwrap_or_default()
    }

    /// Whether `address` has been excluded
    #[must_use]
    pub fn is_excluded(&self, address: &Address) -> bool {
        self.excluded.contains(address)
    }

    /// Excluded addresses in address order
    pub fn excluded(&self) -> impl Iterator<Item = &Address> {
        self.excluded.iter()
    }

    /// Remedy surfaced by the last descend or confirm
    #[must_use]
    pub fn active_remedy(&self) -> Option<&str> {
        self.active_remedy.as_deref()
    }

    /// Path prefixes from the root to the current node
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.path
            .prefixes()
            .into_iter()
            .map(|address| Breadcrumb {
                title: address.last().unwrap_or_default().to_string(),
                address,
            })
            .collect()
    }

    /// Parent of the current path
    #[must_use]
    pub fn parent_path(&self) -> Option<Address> {
        self.path.parent()
    }

    /// Whether the current node is the root
    #[must_use]
    pub fn is_at_root(&self) -> bool {
        self.state() == NavState::AtRoot
    }

    /// Whether the store has moved past the generation this tree came from
    ///
    /// An outdated session keeps working on its own tree; call
    /// [`set_root`](Self::set_root) again to pick up new records.
    #[must_use]
    pub fn is_outdated(&self) -> bool {
        self.tree
            .as_ref()
            .is_some_and(|tree| tree.generation != self.resolver.store().generation())
    }

    /// Serializable snapshot
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            state: self.state(),
            root: self.root_name.clone(),
            path: self.path.clone(),
            path_display: self.path.to_string(),
            current_title: self.display_node().map(|n| n.title.clone()),
            item_count: self.current_checklist_items().len(),
            excluded_count: self.excluded.len(),
            has_remedy: self.active_remedy.is_some(),
            at_root: self.is_at_root(),
            has_confirmation: self.confirmed.is_some(),
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn check(&self, transition: Transition) -> NavigationResult<()> {
        validate_transition(self.state(), transition).map_err(|error| {
            tracing::warn!(%error, "rejected navigation transition");
            error
        })
    }

    /// Validate `transition` and hand back the tree it operates on
    fn guard(&self, transition: Transition) -> NavigationResult<Arc<ResolvedTree>> {
        self.check(transition)?;
        self.tree
            .clone()
            .ok_or(NavigationError::StaleState { transition })
    }

    fn lookup<'t>(
        &self,
        tree: &'t ResolvedTree,
        address: &Address,
    ) -> NavigationResult<&'t PresentationNode> {
        tree.find(address).ok_or_else(|| {
            tracing::warn!(path = %address, "address not in current tree");
            NavigationError::invalid_path(address)
        })
    }

    /// Like [`lookup`](Self::lookup) but the root is not a checklist item
    fn lookup_item<'t>(
        &self,
        tree: &'t ResolvedTree,
        address: &Address,
    ) -> NavigationResult<&'t PresentationNode> {
        if *address == tree.root.address {
            tracing::warn!(path = %address, "root is not a checklist item");
            return Err(NavigationError::invalid_path(address));
        }
        self.lookup(tree, address)
    }
}
