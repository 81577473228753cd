//! Triage Model
//!
//! Issue records, title addresses and resolved presentation trees.
//!
//! # Core Concepts
//!
//! - [`Issue`]: named troubleshooting topic with an ordered checklist
//! - [`ChecklistEntry`]: either a full [`DetailEntry`] or a [`ReferenceEntry`]
//! - [`PresentationNode`]: node of a fully expanded tree built from an issue
//! - [`Address`]: titles from the tree root to a node, the node's identity
//! - [`IssueStore`]: generation-snapshotted source of issues
//!
//! # Example
//!
//! ```rust
//! use triage_model::{DetailEntry, Issue, IssueStore, MemoryIssueStore, Priority};
//!
//! let issue = Issue::new("Disk full")
//!     .with_visible(true)
//!     .with_entry(
//!         DetailEntry::new("Log rotation disabled")
//!             .with_priority(Priority::new(8).unwrap())
//!             .with_remedy("Re-enable logrotate"),
//!     );
//!
//! let store = MemoryIssueStore::with_issues([issue]).unwrap();
//! assert_eq!(store.list_visible_issue_names(), vec!["Disk full"]);
//! ```

#![warn(unreachable_pub)]

mod address;
mod error;
mod issue;
mod node;
mod store;

pub mod loader;

// Re-exports
pub use address::{Address, PathError, ADDRESS_SEPARATOR};
pub use error::{ModelError, ModelResult};
pub use issue::{
    ChecklistEntry, DetailEntry, Issue, Links, Priority, ReferenceEntry, DEFAULT_PRIORITY,
    MAX_PRIORITY, MIN_PRIORITY,
};
pub use node::PresentationNode;
pub use store::{IssueSet, IssueStore, MemoryIssueStore, StoreStatistics};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
