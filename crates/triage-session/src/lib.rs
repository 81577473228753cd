//! Triage Session
//!
//! Path-addressed navigation over resolved issue trees.
//!
//! # Core Operations
//!
//! - **Select**: [`NavigationSession::set_root`] resolves a root and resets overlays
//! - **Move**: `descend`, `ascend`, `navigate_to_path`, `navigate_to_root`
//! - **Judge**: `exclude` rules an item out, `confirm` picks it as the cause
//! - **Read**: checklist items, current / confirmed node, remedy, breadcrumbs
//!
//! # Example
//!
//! ```rust
//! use triage_model::{Address, DetailEntry, Issue, Priority};
//! use triage_resolve::ResolverConfig;
//! use triage_session::TriageService;
//!
//! let service = TriageService::from_issues(
//!     [Issue::new("A").with_visible(true).with_entry(
//!         DetailEntry::new("X")
//!             .with_priority(Priority::new(8).unwrap())
//!             .with_remedy("do Y"),
//!     )],
//!     ResolverConfig::default(),
//! )
//! .unwrap();
//!
//! let mut session = service.open_session();
//! session.set_root("A").unwrap();
//! assert_eq!(session.current_checklist_items()[0].title, "X");
//!
//! let outcome = session.confirm(&Address::from(["A", "X"])).unwrap();
//! assert_eq!(outcome.solution.as_deref(), Some("do Y"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod service;
pub mod session;
pub mod state;
pub mod view;

// Re-exports for convenience
pub use error::{NavigationError, NavigationResult};
pub use service::{ReloadReport, TriageService};
pub use session::NavigationSession;
pub use state::{allowed_transitions, validate_transition, NavState, Transition};
pub use view::{Breadcrumb, NavigationOutcome, SessionSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving navigation sessions
    pub use crate::error::{NavigationError, NavigationResult};
    pub use crate::service::TriageService;
    pub use crate::session::NavigationSession;
    pub use crate::state::NavState;
    pub use triage_model::{Address, PresentationNode};
}
