use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use triage_model::{Address, Issue};
use triage_resolve::{ResolveError, ResolverConfig};
use triage_session::{NavState, NavigationError, NavigationSession, TriageService};
use triage_test_utils::*;

const ROOT: &str = "Service unreachable";

fn service(issues: Vec<Issue>) -> TriageService {
    init_tracing();
    TriageService::from_issues(issues, ResolverConfig::default()).unwrap()
}

fn at(segments: &[&str]) -> Address {
    Address::from(segments)
}

fn titles(session: &NavigationSession) -> Vec<String> {
    session
        .current_checklist_items()
        .iter()
        .map(|n| n.title.clone())
        .collect()
}

#[test]
fn test_single_leaf_confirm_yields_remedy() {
    let svc = service(single_leaf_issue());
    let mut session = svc.open_session();

    session.set_root("A").unwrap();
    assert_eq!(titles(&session), vec!["X"]);

    let outcome = session.confirm(&at(&["A", "X"])).unwrap();
    assert_eq!(outcome.solution.as_deref(), Some("do Y"));
    assert_eq!(session.current_path(), &at(&["A", "X"]));
    assert_eq!(session.active_remedy(), Some("do Y"));
    assert_eq!(session.confirmed_node().unwrap().title, "X");
}

#[test]
fn test_cycle_root_cannot_be_selected() {
    let svc = service(two_issue_cycle());
    let mut session = svc.open_session();

    let err = session.set_root("A").unwrap_err();
    assert_eq!(
        err,
        NavigationError::Resolve(ResolveError::CycleDetected {
            chain: vec!["A".into(), "B".into(), "A".into()]
        })
    );
    assert!(!err.is_recoverable());
    assert_eq!(session.state(), NavState::NoRoot);
}

#[test]
fn test_diamond_copies_are_independent() {
    let svc = service(diamond_issues());
    let mut session = svc.open_session();
    session.set_root("A").unwrap();

    session.exclude(&at(&["A", "C", "C1"])).unwrap();
    assert!(session.is_excluded(&at(&["A", "C", "C1"])));
    assert!(!session.is_excluded(&at(&["A", "P", "C", "C1"])));

    session.navigate_to_path(&at(&["A", "P", "C"])).unwrap();
    assert_eq!(titles(&session), vec!["C1", "C2"]);
}

#[test]
fn test_exclude_then_confirm() {
    let svc = service(network_issues());
    let mut session = svc.open_session();
    session.set_root(ROOT).unwrap();

    let item = at(&[ROOT, "Process not running"]);
    session.exclude(&item).unwrap();
    let outcome = session.confirm(&item).unwrap();

    assert_eq!(outcome.solution.as_deref(), Some("Restart the service"));
    assert!(session.is_excluded(&item));
    assert_eq!(session.confirmed_address(), Some(&item));
}

#[test]
fn test_checklist_sorted_by_priority() {
    let svc = service(network_issues());
    let mut session = svc.open_session();
    session.set_root(ROOT).unwrap();

    assert_eq!(
        titles(&session),
        vec!["Process not running", "Firewall", "DNS failure", "Unknown"]
    );

    session.descend("Firewall").unwrap();
    // Equal priorities keep declaration order.
    assert_eq!(titles(&session), vec!["Port blocked", "Wrong zone"]);
}

#[test]
fn test_reference_expansion_navigates_like_any_node() {
    let svc = service(network_issues());
    let mut session = svc.open_session();
    session.set_root(ROOT).unwrap();

    let outcome = session.confirm(&at(&[ROOT, "DNS failure"])).unwrap();
    assert!(outcome.descended);
    assert_eq!(outcome.solution, None);
    assert_eq!(titles(&session), vec!["Resolver down", "Stale record"]);

    let outcome = session.descend("Stale record").unwrap();
    assert_eq!(outcome.solution.as_deref(), Some("Flush cache"));
    assert_eq!(session.confirmed_address(), None);
}

#[test]
fn test_leaf_without_remedy_has_no_solution() {
    let svc = service(network_issues());
    let mut session = svc.open_session();
    session.set_root(ROOT).unwrap();

    let outcome = session.confirm(&at(&[ROOT, "Unknown"])).unwrap();
    assert_eq!(outcome.solution, None);
    assert!(!outcome.descended);
    assert_eq!(session.active_remedy(), None);
    assert_eq!(session.state(), NavState::AtNode { confirmed: true });
}

#[test]
fn test_ascend_after_descend_restores_path() {
    let svc = service(network_issues());
    let mut session = svc.open_session();
    session.set_root(ROOT).unwrap();
    session.descend("Firewall").unwrap();
    let before = session.current_path().clone();

    session.descend("Port blocked").unwrap();
    assert_eq!(session.ascend().unwrap(), before);
    assert_eq!(session.current_path(), &before);

    session.confirm(&before.child("Wrong zone")).unwrap();
    session.ascend().unwrap();
    assert_eq!(session.current_path(), &before);
    assert_eq!(session.confirmed_address(), None);
    assert_eq!(session.active_remedy(), None);
}

#[test]
fn test_navigate_to_path_clears_confirmation() {
    let svc = service(network_issues());
    let mut session = svc.open_session();
    session.set_root(ROOT).unwrap();
    session.confirm(&at(&[ROOT, "Firewall", "Port blocked"])).unwrap();

    session.navigate_to_path(&at(&[ROOT, "DNS failure"])).unwrap();
    assert_eq!(session.confirmed_address(), None);

    let err = session.navigate_to_path(&at(&[ROOT, "Nowhere"])).unwrap_err();
    assert_eq!(err.to_string(), "cannot navigate there: Service unreachable → Nowhere");
    assert_eq!(session.current_path(), &at(&[ROOT, "DNS failure"]));
}

#[test]
fn test_reload_leaves_held_tree_usable() {
    let svc = service(network_issues());
    let mut session = svc.open_session();
    session.set_root(ROOT).unwrap();
    session.descend("Firewall").unwrap();

    svc.reload([visible_issue(ROOT).with_entry(leaf("Cable unplugged", 9, "Plug it in"))])
        .unwrap();
    assert!(session.is_outdated());

    // The held tree still answers; the new records need a fresh set_root.
    session.descend("Wrong zone").unwrap();
    session.set_root(ROOT).unwrap();
    assert!(!session.is_outdated());
    assert_eq!(titles(&session), vec!["Cable unplugged"]);
    assert!(session
        .navigate_to_path(&at(&[ROOT, "Firewall"]))
        .is_err());
}

#[test]
fn test_sessions_share_cached_tree() {
    let svc = service(network_issues());
    let mut first = svc.open_session();
    let mut second = svc.open_session();
    first.set_root(ROOT).unwrap();
    second.set_root(ROOT).unwrap();

    assert!(Arc::ptr_eq(first.tree().unwrap(), second.tree().unwrap()));
    assert_eq!(svc.resolver().stats().builds, 1);

    first.exclude(&at(&[ROOT, "Unknown"])).unwrap();
    assert!(!second.is_excluded(&at(&[ROOT, "Unknown"])));
}

#[test]
fn test_summary_serializes() {
    let svc = service(network_issues());
    let mut session = svc.open_session();
    session.set_root(ROOT).unwrap();
    session.exclude(&at(&[ROOT, "Unknown"])).unwrap();
    session.descend("Firewall").unwrap();

    let summary = session.summary();
    assert_eq!(summary.path_display, "Service unreachable → Firewall");
    assert_eq!(summary.item_count, 2);
    assert_eq!(summary.excluded_count, 1);
    assert!(!summary.at_root);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["state"]["state"], "at_node");
    assert_eq!(json["state"]["confirmed"], false);
    assert_eq!(json["path"], serde_json::json!([ROOT, "Firewall"]));
    assert_eq!(json["current_title"], "Firewall");
}

#[test]
fn test_reload_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("disk.yml"),
        "status: Disk full\ndisplay: true\nchecklist:\n  - status: Logs\n    todo: Rotate logs\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("broken.yaml"), "status: [unclosed").unwrap();

    let svc = service(single_leaf_issue());
    let report = svc.reload_dir(dir.path()).unwrap();
    assert_eq!(report.generation, 2);
    assert_eq!(report.loaded, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(svc.root_choices(), vec!["Disk full"]);

    let mut session = svc.open_session();
    session.set_root("Disk full").unwrap();
    let outcome = session.descend("Logs").unwrap();
    assert_eq!(outcome.solution.as_deref(), Some("Rotate logs"));
}

// Random operation sequences over the network tree.

#[derive(Debug, Clone)]
enum Op {
    Descend(usize),
    Ascend,
    Navigate(usize),
    Exclude(usize),
    Confirm(usize),
    ClearConfirmation,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..16).prop_map(Op::Descend),
        Just(Op::Ascend),
        (0usize..16).prop_map(Op::Navigate),
        (0usize..16).prop_map(Op::Exclude),
        (0usize..16).prop_map(Op::Confirm),
        Just(Op::ClearConfirmation),
    ]
}

fn apply(session: &mut NavigationSession, addresses: &[Address], op: &Op) -> bool {
    let pick = |i: usize| &addresses[i % addresses.len()];
    match op {
        Op::Descend(i) => session.descend(pick(*i).last().unwrap_or_default()).is_ok(),
        Op::Ascend => session.ascend().is_ok(),
        Op::Navigate(i) => session.navigate_to_path(pick(*i)).is_ok(),
        Op::Exclude(i) => session.exclude(pick(*i)).is_ok(),
        Op::Confirm(i) => session.confirm(pick(*i)).is_ok(),
        Op::ClearConfirmation => session.clear_confirmation().is_ok(),
    }
}

fn setup() -> (TriageService, Vec<Address>) {
    let svc = TriageService::from_issues(network_issues(), ResolverConfig::default()).unwrap();
    let mut addresses: Vec<Address> = svc
        .resolve(ROOT)
        .unwrap()
        .nodes()
        .map(|n| n.address.clone())
        .collect();
    addresses.push(at(&[ROOT, "Missing"]));
    (svc, addresses)
}

proptest! {
    #[test]
    fn prop_set_root_resets_overlays(ops in prop::collection::vec(op(), 0..24)) {
        let (svc, addresses) = setup();
        let mut session = svc.open_session();
        session.set_root(ROOT).unwrap();
        for op in &ops {
            apply(&mut session, &addresses, op);
        }

        session.set_root(ROOT).unwrap();
        prop_assert_eq!(session.excluded().count(), 0);
        prop_assert_eq!(session.confirmed_address(), None);
        prop_assert_eq!(session.active_remedy(), None);
        prop_assert_eq!(session.state(), NavState::AtRoot);
    }

    #[test]
    fn prop_failed_transitions_change_nothing(ops in prop::collection::vec(op(), 1..24)) {
        let (svc, addresses) = setup();
        let mut session = svc.open_session();
        session.set_root(ROOT).unwrap();

        for op in &ops {
            let before = session.summary();
            let excluded_before: Vec<_> = session.excluded().cloned().collect();
            let remedy_before = session.active_remedy().map(str::to_string);

            if !apply(&mut session, &addresses, op) {
                prop_assert_eq!(session.summary(), before);
                prop_assert_eq!(session.excluded().cloned().collect::<Vec<_>>(), excluded_before);
                prop_assert_eq!(session.active_remedy().map(str::to_string), remedy_before);
            }

            // The current path and any confirmation always name live nodes.
            prop_assert!(session.current_node().is_some());
            if let Some(confirmed) = session.confirmed_address() {
                prop_assert!(session.tree().unwrap().contains(confirmed));
            }
        }
    }
}
