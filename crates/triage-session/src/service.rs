//! Host for one issue store, its resolver and the sessions over them

use crate::session::NavigationSession;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use triage_model::loader::{self, LoadFailure};
use triage_model::{Issue, IssueStore, MemoryIssueStore, ModelResult};
use triage_resolve::{ResolveResult, ResolvedTree, ResolverConfig, TreeResolver};

/// Outcome of reloading records from a directory
#[derive(Debug)]
pub struct ReloadReport {
    /// Generation now served
    pub generation: u64,
    /// Issues installed
    pub loaded: usize,
    /// Files skipped
    pub failures: Vec<LoadFailure>,
}

/// Issue store, tree resolver and session factory
///
/// Reloads swap the store generation and then drop cached trees, so
/// resolution always sees one whole generation. Sessions opened earlier
/// keep the tree they already hold until they select a root again.
#[derive(Debug)]
pub struct TriageService {
    store: Arc<MemoryIssueStore>,
    resolver: Arc<TreeResolver>,
    reload_lock: Mutex<()>,
}

impl TriageService {
    /// Create service with default resolver configuration
    #[must_use]
    pub fn new(store: Arc<MemoryIssueStore>) -> Self {
        Self::with_config(store, ResolverConfig::default())
    }

    /// Create service with custom resolver configuration
    #[must_use]
    pub fn with_config(store: Arc<MemoryIssueStore>, config: ResolverConfig) -> Self {
        let resolver = Arc::new(TreeResolver::with_config(store.clone(), config));
        Self {
            store,
            resolver,
            reload_lock: Mutex::new(()),
        }
    }

    /// Create service holding `issues` as its first generation
    ///
    /// # Errors
    /// Returns the first invalid record or a duplicated name
    pub fn from_issues(
        issues: impl IntoIterator<Item = Issue>,
        config: ResolverConfig,
    ) -> ModelResult<Self> {
        let store = Arc::new(MemoryIssueStore::with_issues(issues)?);
        Ok(Self::with_config(store, config))
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<MemoryIssueStore> {
        &self.store
    }

    /// Shared resolver
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &Arc<TreeResolver> {
        &self.resolver
    }

    /// Names offered as navigable roots, in load order
    #[must_use]
    pub fn root_choices(&self) -> Vec<String> {
        self.store.list_visible_issue_names()
    }

    /// New session with no root selected
    #[must_use]
    pub fn open_session(&self) -> NavigationSession {
        NavigationSession::new(Arc::clone(&self.resolver))
    }

    /// Resolve `root_name` through the shared cache
    ///
    /// # Errors
    /// Propagates [`triage_resolve::ResolveError`]
    pub fn resolve(&self, root_name: &str) -> ResolveResult<Arc<ResolvedTree>> {
        self.resolver.resolve(root_name)
    }

    /// Install `issues` as a new generation and drop cached trees
    ///
    /// On error the previous generation and its cache stay in place.
    ///
    /// # Errors
    /// Returns the first invalid record or a duplicated name
    pub fn reload(&self, issues: impl IntoIterator<Item = Issue>) -> ModelResult<u64> {
        let _guard = self.reload_lock.lock();
        let generation = self.store.replace(issues)?;
        self.resolver.clear_cache();
        tracing::info!(generation, "reloaded issue records");
        Ok(generation)
    }

    /// Reload from every record file in `dir`
    ///
    /// Files that fail to parse are reported and left out.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be read or the loaded
    /// records conflict
    pub fn reload_dir(&self, dir: impl AsRef<Path>) -> ModelResult<ReloadReport> {
        let report = loader::load_dir(dir)?;
        for failure in &report.failures {
            tracing::warn!(path = %failure.path.display(), error = %failure.error, "skipping record file");
        }

        let loaded = report.issues.len();
        let generation = self.reload(report.issues)?;
        Ok(ReloadReport {
            generation,
            loaded,
            failures: report.failures,
        })
    }
}
