//! Testing utilities for the triage workspace
//!
//! Shared fixtures for issue graphs and stores.

#![allow(missing_docs)]

use std::sync::{Arc, Once};
use triage_model::{DetailEntry, Issue, MemoryIssueStore, Priority, ReferenceEntry};

static TRACING: Once = Once::new();

/// Route `tracing` output to the test writer, filtered by `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn priority(value: i64) -> Priority {
    Priority::new(value).unwrap()
}

/// Leaf entry with a remedy
pub fn leaf(title: &str, prio: i64, remedy: &str) -> DetailEntry {
    DetailEntry::new(title)
        .with_description(format!("check {title}"))
        .with_priority(priority(prio))
        .with_remedy(remedy)
}

/// Branch entry without a remedy of its own
pub fn branch(title: &str, prio: i64, children: Vec<DetailEntry>) -> DetailEntry {
    children
        .into_iter()
        .fold(DetailEntry::new(title).with_priority(priority(prio)), DetailEntry::with_child)
}

pub fn refer(issue: &str) -> ReferenceEntry {
    ReferenceEntry::new(issue)
}

pub fn visible_issue(name: &str) -> Issue {
    Issue::new(name).with_visible(true)
}

pub fn store_with(issues: impl IntoIterator<Item = Issue>) -> Arc<MemoryIssueStore> {
    Arc::new(MemoryIssueStore::with_issues(issues).unwrap())
}

/// `A` with a single leaf `X` (priority 8, remedy "do Y")
pub fn single_leaf_issue() -> Vec<Issue> {
    vec![visible_issue("A").with_entry(leaf("X", 8, "do Y"))]
}

/// `A` references `B`, `B` references `A`
pub fn two_issue_cycle() -> Vec<Issue> {
    vec![
        visible_issue("A").with_entry(refer("B")),
        Issue::new("B").with_entry(leaf("B1", 5, "fix B1")).with_entry(refer("A")),
    ]
}

/// `A` references `C` directly and again under branch `P`
pub fn diamond_issues() -> Vec<Issue> {
    vec![
        visible_issue("A")
            .with_entry(refer("C"))
            .with_entry(DetailEntry::new("P").with_priority(priority(6)).with_child(refer("C"))),
        Issue::new("C")
            .with_entry(leaf("C1", 7, "fix C1"))
            .with_entry(branch("C2", 4, vec![leaf("C2a", 3, "fix C2a")])),
    ]
}

/// Network troubleshooting graph with nested branches and a shared reference
pub fn network_issues() -> Vec<Issue> {
    vec![
        visible_issue("Service unreachable")
            .with_description("Clients cannot reach the service")
            .with_priority(priority(9))
            .with_entry(leaf("Process not running", 9, "Restart the service"))
            .with_entry(branch(
                "Firewall",
                7,
                vec![
                    leaf("Port blocked", 8, "Open the port"),
                    leaf("Wrong zone", 8, "Move interface to the public zone"),
                ],
            ))
            .with_entry(refer("DNS failure"))
            .with_entry(leaf("Unknown", 1, "")),
        visible_issue("DNS failure")
            .with_priority(priority(6))
            .with_entry(leaf("Resolver down", 8, "Restart resolver"))
            .with_entry(leaf("Stale record", 5, "Flush cache")),
    ]
}
