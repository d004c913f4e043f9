use follow_audit::diff::engine::{audit_relations, compute_diff, RelationSets};
use follow_audit::harvest::set::AccumulatedSet;
use follow_audit::trace::logger::TraceLogger;

mod common;
use common::{user, ScriptedSource};

fn set_of(names: &[&str]) -> AccumulatedSet {
    let mut set = AccumulatedSet::new();
    for name in names {
        set.insert(user(name)).unwrap();
    }
    set
}

// =========================================================================
// compute_diff
// =========================================================================

#[test]
fn diff_keeps_following_side_metadata() {
    let mut following = AccumulatedSet::new();
    following.insert(user("a").with_follows_back(false)).unwrap();
    following.insert(user("b").with_follows_back(true)).unwrap();
    following.insert(user("c")).unwrap();
    let followers = set_of(&["b"]);

    let diff = compute_diff(&following, &followers);

    let handles: Vec<_> = diff.iter().map(|i| i.handle.as_str()).collect();
    assert_eq!(handles, ["@a", "@c"]);
    assert_eq!(
        diff[0].profile_url.as_deref(),
        Some("https://twitter.com/a"),
        "metadata comes from the following side"
    );
}

#[test]
fn diff_preserves_following_insertion_order() {
    let following = set_of(&["c", "a", "b"]);
    let followers = set_of(&["a"]);

    let diff = compute_diff(&following, &followers);
    let handles: Vec<_> = diff.iter().map(|i| i.handle.as_str()).collect();
    assert_eq!(handles, ["@c", "@b"]);
}

#[test]
fn diff_empty_combinations() {
    let empty = AccumulatedSet::new();

    assert!(compute_diff(&empty, &AccumulatedSet::new()).is_empty(), "both empty");
    assert!(
        compute_diff(&empty, &set_of(&["a", "b"])).is_empty(),
        "following empty"
    );

    let diff = compute_diff(&set_of(&["a", "b"]), &empty);
    let handles: Vec<_> = diff.iter().map(|i| i.handle.as_str()).collect();
    assert_eq!(handles, ["@a", "@b"], "followers empty keeps all of following");
}

// =========================================================================
// audit_relations — two sequential harvests + diff
// =========================================================================

#[test]
fn audit_relations_harvests_both_and_diffs() {
    let following = ScriptedSource::new(vec![
        vec![user("a"), user("b")],
        vec![user("b"), user("c")],
        vec![user("c")],
    ]);
    let followers = ScriptedSource::new(vec![vec![user("b")]]);

    let sets = audit_relations(following, followers, &TraceLogger::disabled()).unwrap();

    assert_eq!(sets.following.len(), 3);
    assert_eq!(sets.followers.len(), 1);

    let handles: Vec<_> = sets.unfollowers().iter().map(|i| i.handle.clone()).collect();
    assert_eq!(handles, ["@a", "@c"]);
}

#[test]
fn audit_relations_with_two_empty_sources() {
    let sets = audit_relations(
        ScriptedSource::new(vec![]),
        ScriptedSource::new(vec![]),
        &TraceLogger::disabled(),
    )
    .unwrap();

    assert!(sets.following.is_empty());
    assert!(sets.followers.is_empty());
    assert!(sets.unfollowers().is_empty());
}

#[test]
fn relation_sets_unfollowers_matches_compute_diff() {
    let sets = RelationSets {
        following: set_of(&["a", "b", "c"]),
        followers: set_of(&["b"]),
    };
    assert_eq!(sets.unfollowers(), compute_diff(&sets.following, &sets.followers));
}
