//! Issue store: generations of issue records
//!
//! Readers take an [`IssueSet`] snapshot and work against it; a reload
//! installs a whole new generation at once, so nobody observes a mix of
//! old and new records.

use crate::error::ModelError;
use crate::issue::Issue;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Read side of the issue store consumed by the resolver
pub trait IssueStore: Send + Sync {
    /// Current generation of records
    fn snapshot(&self) -> Arc<IssueSet>;

    /// Look up an issue in the current generation
    fn get_issue_by_name(&self, name: &str) -> Option<Arc<Issue>> {
        self.snapshot().get(name).cloned()
    }

    /// Names of visible issues, in load order
    fn list_visible_issue_names(&self) -> Vec<String> {
        self.snapshot().visible_names()
    }

    /// Generation counter of the current snapshot
    fn generation(&self) -> u64 {
        self.snapshot().generation()
    }
}

/// Summary counts over one generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreStatistics {
    /// Number of issues
    pub total_issues: usize,
    /// Number of top-level checklist entries across all issues
    pub total_entries: usize,
    /// Average top-level entries per issue
    pub avg_entries_per_issue: f64,
}

/// Immutable generation of issue records
#[derive(Debug, Default)]
pub struct IssueSet {
    generation: u64,
    issues: HashMap<String, Arc<Issue>>,
    order: Vec<String>,
}

impl IssueSet {
    /// Build a generation from records, validating each one
    ///
    /// # Errors
    /// Returns the first invalid record or a duplicated name
    pub fn new(generation: u64, issues: impl IntoIterator<Item = Issue>) -> Result<Self, ModelError> {
        let mut set = Self {
            generation,
            ..Self::default()
        };
        for issue in issues {
            issue.validate()?;
            if set.issues.contains_key(&issue.name) {
                return Err(ModelError::DuplicateIssue(issue.name));
            }
            set.order.push(issue.name.clone());
            set.issues.insert(issue.name.clone(), Arc::new(issue));
        }
        Ok(set)
    }

    /// Generation counter
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Look up an issue by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Issue>> {
        self.issues.get(name)
    }

    /// Check if an issue exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.issues.contains_key(name)
    }

    /// All names in load order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Visible names in load order
    #[must_use]
    pub fn visible_names(&self) -> Vec<String> {
        self.iter()
            .filter(|issue| issue.visible)
            .map(|issue| issue.name.clone())
            .collect()
    }

    /// Issues in load order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Issue>> {
        self.order.iter().filter_map(|name| self.issues.get(name))
    }

    /// Number of issues
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Whether the generation holds no issues
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Summary counts
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn statistics(&self) -> StoreStatistics {
        let total_entries: usize = self.issues.values().map(|i| i.checklist.len()).sum();
        let avg_entries_per_issue = if self.issues.is_empty() {
            0.0
        } else {
            total_entries as f64 / self.issues.len() as f64
        };
        StoreStatistics {
            total_issues: self.issues.len(),
            total_entries,
            avg_entries_per_issue,
        }
    }
}

/// In-memory store with atomic generation swaps
#[derive(Debug, Default)]
pub struct MemoryIssueStore {
    current: RwLock<Arc<IssueSet>>,
}

impl MemoryIssueStore {
    /// Create an empty store at generation 0
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `issues` as generation 1
    ///
    /// # Errors
    /// Returns the first invalid record or a duplicated name
    pub fn with_issues(issues: impl IntoIterator<Item = Issue>) -> Result<Self, ModelError> {
        let store = Self::new();
        store.replace(issues)?;
        Ok(store)
    }

    /// Install a new generation of records
    ///
    /// The previous generation stays intact on error. Returns the new
    /// generation number.
    ///
    /// # Errors
    /// Returns the first invalid record or a duplicated name
    pub fn replace(&self, issues: impl IntoIterator<Item = Issue>) -> Result<u64, ModelError> {
        let mut current = self.current.write();
        let generation = current.generation() + 1;
        let set = IssueSet::new(generation, issues)?;
        tracing::info!(generation, issues = set.len(), "installed issue generation");
        *current = Arc::new(set);
        Ok(generation)
    }

    /// Names of all issues, in load order
    #[must_use]
    pub fn issue_names(&self) -> Vec<String> {
        self.snapshot().names().to_vec()
    }

    /// Number of issues in the current generation
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.snapshot().len()
    }

    /// Summary counts for the current generation
    #[must_use]
    pub fn statistics(&self) -> StoreStatistics {
        self.snapshot().statistics()
    }
}

impl IssueStore for MemoryIssueStore {
    fn snapshot(&self) -> Arc<IssueSet> {
        self.current.read().clone()
    }
}
