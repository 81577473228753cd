//! Triage Resolve
//!
//! Turns a root issue into a fully expanded, cycle-free presentation tree
//! and caches the result per store generation.
//!
//! # Architecture
//!
//! ```text
//! IssueStore::snapshot() → TreeBuilder → ResolvedTree → Arc<ResolvedTree>
//!                              ↑________________↓
//!                         TreeCache (generation, root)
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use triage_model::{DetailEntry, Issue, MemoryIssueStore, ReferenceEntry};
//! use triage_resolve::TreeResolver;
//!
//! let store = MemoryIssueStore::with_issues([
//!     Issue::new("A").with_entry(ReferenceEntry::new("B")),
//!     Issue::new("B").with_entry(DetailEntry::new("B1").with_remedy("fix")),
//! ])
//! .unwrap();
//!
//! let resolver = TreeResolver::new(Arc::new(store));
//! let tree = resolver.resolve("A").unwrap();
//! assert_eq!(tree.root.children[0].children[0].address.to_string(), "A → B → B1");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod audit;
pub mod cache;
pub mod config;
pub mod error;

mod engine;
mod tree;

// Re-exports for convenience
pub use audit::{
    dangling_references, orphan_issues, referenced_issues, validate_tree, DanglingReference,
    TreeFinding,
};
pub use cache::{CacheStats, TreeCache, TreeKey};
pub use config::ResolverConfig;
pub use engine::{ResolverStats, TreeResolver};
pub use error::{ConfigError, ResolveError, ResolveResult};
pub use tree::{ResolvedTree, SkippedReference};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for resolving issue trees
    pub use crate::config::ResolverConfig;
    pub use crate::engine::TreeResolver;
    pub use crate::error::{ResolveError, ResolveResult};
    pub use crate::tree::ResolvedTree;
    pub use triage_model::{Address, IssueStore, MemoryIssueStore, PresentationNode};
}
