use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use triage_model::loader::load_dir;
use triage_model::*;

fn record(name: &str, visible: bool) -> Issue {
    Issue::new(name)
        .with_visible(visible)
        .with_entry(DetailEntry::new("first"))
        .with_entry(ReferenceEntry::new("other"))
}

#[test]
fn test_snapshot_survives_replace() {
    let store = MemoryIssueStore::with_issues([record("A", true)]).unwrap();
    let old = store.snapshot();

    let generation = store.replace([record("B", true), record("C", false)]).unwrap();
    assert_eq!(generation, 2);
    assert_eq!(old.generation(), 1);
    assert!(old.contains("A"));
    assert!(!store.snapshot().contains("A"));
    assert_eq!(store.issue_names(), vec!["B", "C"]);
    assert_eq!(store.list_visible_issue_names(), vec!["B"]);
}

#[test]
fn test_rejected_replace_keeps_generation() {
    let store = MemoryIssueStore::with_issues([record("A", true)]).unwrap();
    let err = store.replace([record("B", true), record("B", false)]).unwrap_err();
    assert!(matches!(err, ModelError::DuplicateIssue(ref name) if name == "B"));
    assert_eq!(store.generation(), 1);
    assert_eq!(store.issue_count(), 1);
}

#[test]
fn test_statistics() {
    let store = MemoryIssueStore::with_issues([record("A", true), Issue::new("B")]).unwrap();
    let stats = store.statistics();
    assert_eq!(stats.total_issues, 2);
    assert_eq!(stats.total_entries, 2);
    assert!((stats.avg_entries_per_issue - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_loaded_directory_feeds_store() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("service.yml"),
        "status: Service down\ndisplay: true\nchecklist:\n  - refer: Disk full\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("disk.yml"),
        "status: Disk full\npriority: 7\nchecklist:\n  - status: Logs\n    todo: Rotate\n",
    )
    .unwrap();

    let report = load_dir(dir.path()).unwrap();
    assert!(report.is_clean());

    let store = Arc::new(MemoryIssueStore::with_issues(report.issues).unwrap());
    let disk = store.get_issue_by_name("Disk full").unwrap();
    assert_eq!(disk.source_id, "disk");
    assert_eq!(disk.priority.get(), 7);
    assert_eq!(store.list_visible_issue_names(), vec!["Service down"]);
}

proptest! {
    #[test]
    fn prop_address_display_parses_back(segments in prop::collection::vec("[a-zA-Z0-9 ]{0,8}[a-z]", 1..6)) {
        let address = Address::new(segments.iter().map(|s| s.trim().to_string()).collect());
        let parsed: Address = address.to_string().parse().unwrap();
        prop_assert_eq!(parsed, address);
    }

    #[test]
    fn prop_priority_range(value in -5i64..20) {
        let accepted = Priority::new(value).is_ok();
        prop_assert_eq!(accepted, (1..=10).contains(&value));
    }
}
