use follow_audit::error::AuditError;
use follow_audit::harvest::harvester::{first_unseen, harvest};
use follow_audit::harvest::set::AccumulatedSet;
use follow_audit::trace::logger::TraceLogger;

mod common;
use common::{user, ScriptedSource};

// =========================================================================
// Partition-point search
// =========================================================================

#[test]
fn partition_returns_boundary_for_every_prefix_length() {
    let names = ["u1", "u2", "u3", "u4", "u5", "u6"];
    for k in 0..=names.len() {
        let window: Vec<_> = names.iter().map(|n| user(n)).collect();
        let mut source = ScriptedSource::new(vec![window.clone()]);

        let mut seen = AccumulatedSet::new();
        for item in window.iter().take(k) {
            seen.insert(item.clone()).unwrap();
        }

        let start = first_unseen(&mut source, window.len(), &seen).unwrap();
        assert_eq!(start, k, "k={} leading seen items", k);
    }
}

#[test]
fn partition_on_empty_window_is_zero() {
    let mut source = ScriptedSource::new(vec![vec![]]);
    let seen = AccumulatedSet::new();
    assert_eq!(first_unseen(&mut source, 0, &seen).unwrap(), 0);
}

// =========================================================================
// Harvest loop
// =========================================================================

#[test]
fn scenario_harvests_five_users_in_three_rounds() {
    let mut source = ScriptedSource::new(vec![
        vec![user("u1"), user("u2"), user("u3")],
        vec![user("u2"), user("u3"), user("u4"), user("u5")],
        vec![user("u4"), user("u5")],
    ]);

    let result = harvest(&mut source, &TraceLogger::disabled()).unwrap();

    let handles: Vec<_> = result.iter().map(|i| i.handle.as_str()).collect();
    assert_eq!(
        handles,
        ["@u1", "@u2", "@u3", "@u4", "@u5"],
        "all distinct users, in first-seen order"
    );
    assert_eq!(source.window_reads, 3, "one window read per round");
    assert_eq!(source.advances, 2, "no advance after the no-new round");
}

#[test]
fn empty_source_yields_empty_result() {
    let mut source = ScriptedSource::new(vec![]);
    let result = harvest(&mut source, &TraceLogger::disabled()).unwrap();
    assert!(result.is_empty());
    assert_eq!(source.window_reads, 0, "empty source is not scanned");

    let mut source = ScriptedSource::new(vec![vec![]]);
    let result = harvest(&mut source, &TraceLogger::disabled()).unwrap();
    assert!(result.is_empty());
}

#[test]
fn terminates_when_source_reserves_its_last_window() {
    // A single window re-served forever: round 2 sees nothing new and stops.
    let mut source = ScriptedSource::new(vec![vec![user("u1"), user("u2")]]);
    let result = harvest(&mut source, &TraceLogger::disabled()).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(source.window_reads, 2);
    assert_eq!(source.advances, 1);
}

#[test]
fn reharvesting_the_same_windows_is_idempotent() {
    let windows = || {
        vec![
            vec![user("a"), user("b")],
            vec![user("b"), user("c"), user("d")],
            vec![user("c"), user("d")],
        ]
    };

    let first = harvest(&mut ScriptedSource::new(windows()), &TraceLogger::disabled()).unwrap();
    let second = harvest(&mut ScriptedSource::new(windows()), &TraceLogger::disabled()).unwrap();

    let mut first_handles: Vec<_> = first.iter().map(|i| i.handle.clone()).collect();
    let mut second_handles: Vec<_> = second.iter().map(|i| i.handle.clone()).collect();
    first_handles.sort();
    second_handles.sort();
    assert_eq!(first_handles, second_handles);
}

#[test]
fn metadata_is_preserved_through_the_harvest() {
    let mut source = ScriptedSource::new(vec![vec![
        user("u1").with_follows_back(true),
        user("u2"),
    ]]);

    let result = harvest(&mut source, &TraceLogger::disabled()).unwrap();

    let u1 = result.get("@u1").expect("u1 harvested");
    assert!(u1.follows_back);
    assert_eq!(u1.profile_url.as_deref(), Some("https://twitter.com/u1"));
    assert!(!result.get("@u2").unwrap().follows_back);
}

#[test]
fn identity_reads_stay_logarithmic_in_window_width() {
    // One wide window, harvested in two rounds (all-new, then all-seen).
    // A linear re-scan would read 64 identities in the second round alone.
    let window: Vec<_> = (0..64).map(|i| user(&format!("u{:02}", i))).collect();
    let mut source = ScriptedSource::new(vec![window]);

    let result = harvest(&mut source, &TraceLogger::disabled()).unwrap();

    assert_eq!(result.len(), 64);
    assert!(
        source.identity_reads <= 16,
        "expected O(log w) probes per round, got {}",
        source.identity_reads
    );
}

// =========================================================================
// Integrity violation — non-contiguous windows
// =========================================================================

#[test]
fn seen_item_after_new_item_fails_the_harvest() {
    // Second window puts an already-recorded user (u1) after a new one (u3),
    // breaking the seen-prefix assumption where the append phase can see it.
    let mut source = ScriptedSource::new(vec![
        vec![user("u1"), user("u2")],
        vec![user("u2"), user("u3"), user("u1")],
    ]);

    let err = harvest(&mut source, &TraceLogger::disabled()).unwrap_err();
    match err {
        AuditError::DuplicateIdentity { handle } => assert_eq!(handle, "@u1"),
        other => panic!("Expected DuplicateIdentity, got {:?}", other),
    }
}

#[test]
fn accumulated_set_rejects_duplicate_inserts() {
    let mut set = AccumulatedSet::new();
    set.insert(user("u1")).unwrap();

    let err = set.insert(user("u1")).unwrap_err();
    assert!(matches!(err, AuditError::DuplicateIdentity { .. }));
    assert_eq!(set.len(), 1, "failed insert must not grow the set");
}
