//! Tree Resolution Engine
//!
//! Expands a root issue into a [`ResolvedTree`]:
//!
//! 1. Serve from the cache when the current store generation already has
//!    the root built.
//! 2. Otherwise expand the root's checklist in declaration order. Detail
//!    entries become nodes; reference entries inline the referenced issue's
//!    whole tree at that point.
//! 3. Track the issues being expanded on the current path in an ordered
//!    building set. Reaching one of them again is a cycle and aborts the
//!    whole root. The same issue may still appear on two unrelated branches.
//! 4. Cache the tree only once it is fully built.

use crate::cache::{CacheStats, TreeCache, TreeKey};
use crate::config::ResolverConfig;
use crate::error::{ResolveError, ResolveResult};
use crate::tree::{ResolvedTree, SkippedReference};
use indexmap::IndexSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use triage_model::{
    Address, ChecklistEntry, DetailEntry, Issue, IssueSet, IssueStore, Links, PresentationNode,
    ReferenceEntry,
};

/// Counters for resolver monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Trees built from scratch (cache misses that ran a build)
    pub builds: u64,
    /// Cache state
    pub cache: CacheStats,
}

/// Resolves root issues into presentation trees and caches the results
///
/// One instance per hosting service; independent instances share nothing.
pub struct TreeResolver {
    store: Arc<dyn IssueStore>,
    config: ResolverConfig,
    cache: TreeCache,
    builds: AtomicU64,
}

impl std::fmt::Debug for TreeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeResolver")
            .field("config", &self.config)
            .field("builds", &self.builds.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl TreeResolver {
    /// Create resolver with default configuration
    #[must_use]
    pub fn new(store: Arc<dyn IssueStore>) -> Self {
        Self::with_config(store, ResolverConfig::default())
    }

    /// Create resolver with custom configuration
    #[must_use]
    pub fn with_config(store: Arc<dyn IssueStore>, config: ResolverConfig) -> Self {
        Self {
            cache: TreeCache::new(config.cache_capacity),
            store,
            config,
            builds: AtomicU64::new(0),
        }
    }

    /// Issue store this resolver reads from
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn IssueStore> {
        &self.store
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `root_name` into a fully expanded tree
    ///
    /// Concurrent calls for the same root share one build.
    ///
    /// # Errors
    /// - [`ResolveError::NotFound`] if the root is not in the store
    /// - [`ResolveError::CycleDetected`] if a reference chain loops back
    /// - [`ResolveError::DuplicateSibling`] / [`ResolveError::DepthExceeded`]
    ///   for malformed structure
    pub fn resolve(&self, root_name: &str) -> ResolveResult<Arc<ResolvedTree>> {
        let snapshot = self.store.snapshot();
        let key = TreeKey::new(snapshot.generation(), root_name);

        if let Some(tree) = self.cache.get(&key) {
            tracing::debug!(root = root_name, generation = key.generation, "tree cache hit");
            return Ok(tree);
        }

        self.cache.try_get_or_insert_with(key, || {
            self.builds.fetch_add(1, Ordering::Relaxed);
            let result = TreeBuilder::new(&snapshot, &self.config).build(root_name);
            match &result {
                Ok(tree) => tracing::info!(
                    root = root_name,
                    generation = tree.generation,
                    nodes = tree.node_count(),
                    skipped = tree.skipped_references.len(),
                    "resolved issue tree"
                ),
                Err(error) => tracing::warn!(root = root_name, %error, "failed to resolve issue tree"),
            }
            result
        })
    }

    /// Drop every cached tree
    ///
    /// Call after the store reloads; the resolver does not watch the store.
    pub fn clear_cache(&self) {
        tracing::debug!("clearing tree cache");
        self.cache.invalidate_all();
    }

    /// Whether `root_name` is cached for the current store generation
    #[must_use]
    pub fn is_cached(&self, root_name: &str) -> bool {
        self.cache
            .contains(&TreeKey::new(self.store.generation(), root_name))
    }

    /// Look up a node by address
    ///
    /// `address[0]` must equal the root title; each further segment is
    /// matched against child titles one level at a time.
    #[inline]
    #[must_use]
    pub fn find_by_address<'a>(
        tree: &'a PresentationNode,
        address: &Address,
    ) -> Option<&'a PresentationNode> {
        tree.find(address)
    }

    /// Resolver counters
    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            builds: self.builds.load(Ordering::Relaxed),
            cache: self.cache.stats(),
        }
    }
}

/// Single resolution pass over one store generation
struct TreeBuilder<'a> {
    issues: &'a IssueSet,
    config: &'a ResolverConfig,
    building: IndexSet<String>,
    skipped: Vec<SkippedReference>,
}

impl<'a> TreeBuilder<'a> {
    fn new(issues: &'a IssueSet, config: &'a ResolverConfig) -> Self {
        Self {
            issues,
            config,
            building: IndexSet::new(),
            skipped: Vec::new(),
        }
    }

    fn build(mut self, root_name: &str) -> ResolveResult<ResolvedTree> {
        let issues = self.issues;
        let issue = issues
            .get(root_name)
            .ok_or_else(|| ResolveError::NotFound(root_name.to_string()))?;

        let root = self.expand_issue(issue, Address::root(&issue.name), None, 0)?;

        Ok(ResolvedTree {
            root_name: root_name.to_string(),
            generation: issues.generation(),
            root,
            skipped_references: self.skipped,
        })
    }

    /// Expand an issue as a root (`reference` is `None`) or as the target of
    /// a reference entry found in `origin`.
    fn expand_issue(
        &mut self,
        issue: &Issue,
        address: Address,
        reference: Option<(&ReferenceEntry, &str)>,
        depth: usize,
    ) -> ResolveResult<PresentationNode> {
        if let Some(start) = self.building.get_index_of(&issue.name) {
            let mut chain: Vec<String> = self.building.iter().skip(start).cloned().collect();
            chain.push(issue.name.clone());
            return Err(ResolveError::CycleDetected { chain });
        }
        self.check_depth(&address, depth)?;

        self.building.insert(issue.name.clone());
        let children = self.expand_entries(&issue.checklist, &address, issue, depth)?;
        self.building.pop();

        let (priority, version) = match reference {
            Some((entry, _)) => (
                entry.priority.unwrap_or(issue.priority),
                entry.version.clone().or_else(|| issue.version.clone()),
            ),
            None => (issue.priority, issue.version.clone()),
        };

        Ok(PresentationNode {
            title: issue.name.clone(),
            description: issue.description.clone(),
            priority,
            version,
            remedy: String::new(),
            links: Links::default(),
            source_record_id: issue.source_id.clone(),
            address,
            children,
            is_reference_expansion: reference.is_some(),
            reference_origin: reference.map(|(_, origin)| origin.to_string()),
        })
    }

    fn expand_detail(
        &mut self,
        entry: &DetailEntry,
        address: Address,
        source: &Issue,
        depth: usize,
    ) -> ResolveResult<PresentationNode> {
        self.check_depth(&address, depth)?;
        let children = self.expand_entries(&entry.children, &address, source, depth)?;

        Ok(PresentationNode {
            title: entry.title.clone(),
            description: entry.description.clone(),
            priority: entry.priority,
            version: entry.version.clone(),
            remedy: entry.remedy.clone(),
            links: entry.links.clone(),
            source_record_id: source.source_id.clone(),
            address,
            children,
            is_reference_expansion: false,
            reference_origin: None,
        })
    }

    fn expand_entries(
        &mut self,
        entries: &[ChecklistEntry],
        parent: &Address,
        source: &Issue,
        depth: usize,
    ) -> ResolveResult<Vec<PresentationNode>> {
        let mut children: Vec<PresentationNode> = Vec::with_capacity(entries.len());

        for entry in entries {
            let child = match entry {
                ChecklistEntry::Detail(detail) => Some(self.expand_detail(
                    detail,
                    parent.child(&detail.title),
                    source,
                    depth + 1,
                )?),
                ChecklistEntry::Reference(reference) => {
                    self.expand_reference(reference, parent, source, depth + 1)?
                }
            };

            let Some(child) = child else { continue };
            if self.config.unique_sibling_titles && children.iter().any(|c| c.title == child.title)
            {
                return Err(ResolveError::DuplicateSibling {
                    parent: parent.clone(),
                    title: child.title,
                });
            }
            children.push(child);
        }

        Ok(children)
    }

    fn expand_reference(
        &mut self,
        reference: &ReferenceEntry,
        parent: &Address,
        source: &Issue,
        depth: usize,
    ) -> ResolveResult<Option<PresentationNode>> {
        let issues = self.issues;
        let Some(target) = issues.get(&reference.issue) else {
            tracing::warn!(
                origin = %source.name,
                target = %reference.issue,
                "skipping reference to missing issue"
            );
            self.skipped.push(SkippedReference {
                origin: source.name.clone(),
                target: reference.issue.clone(),
                address: parent.child(&reference.issue),
            });
            return Ok(None);
        };

        let address = parent.child(&target.name);
        self.expand_issue(target, address, Some((reference, source.name.as_str())), depth)
            .map(Some)
    }

    fn check_depth(&self, address: &Address, depth: usize) -> ResolveResult<()> {
        if depth > self.config.max_depth {
            return Err(ResolveError::DepthExceeded {
                address: address.clone(),
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }
}
