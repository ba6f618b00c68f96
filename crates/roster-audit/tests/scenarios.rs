//! End-to-end reconciliation scenarios over literal snapshots.

use pretty_assertions::assert_eq;
use roster_audit::{
    audit, find_missing_in_children, find_missing_in_parent, format_report, hierarchy_lines,
    Violation,
};
use roster_model::{ChatId, ChatTree};
use roster_test_utils::{chat, directory, flagged, ids, org_tree, snapshot, user};

fn two_children(flag: bool) -> ChatTree {
    ChatTree::new(vec![chat(1234, "Parent")
        .requiring_member_in_any_child(flag)
        .with_children(vec![chat(4321, "First"), chat(2222, "Second")])])
    .unwrap()
}

#[test]
fn flagged_parent_member_outside_children() {
    let tree = two_children(true);
    let snap = snapshot(&[(1234, &[11111, 2424]), (4321, &[]), (2222, &[2424])]);

    assert_eq!(
        find_missing_in_children(&tree, &snap).unwrap(),
        vec![Violation::child_coverage_missing(user(11111), ChatId::new(1234))]
    );
}

#[test]
fn unflagged_parent_skips_child_check() {
    let tree = two_children(false);
    let snap = snapshot(&[(1234, &[11111, 2222]), (4321, &[]), (2222, &[])]);

    assert!(find_missing_in_children(&tree, &snap).unwrap().is_empty());
}

#[test]
fn single_chat_tree() {
    let root = chat(77, "Only");
    let tree = ChatTree::new(vec![root.clone()]).unwrap();
    let snap = snapshot(&[(77, &[1, 2, 3])]);

    assert_eq!(hierarchy_lines(&root), vec![ids(&[77])]);
    assert!(find_missing_in_parent(&tree, &snap).unwrap().is_empty());
}

#[test]
fn two_line_tree_reports_only_uncovered_branch() {
    let tree = ChatTree::new(vec![
        chat(123, "First").with_children(vec![chat(234, "Second"), chat(345, "Third")]),
    ])
    .unwrap();
    let snap = snapshot(&[(123, &[1, 2]), (234, &[1, 5, 6]), (345, &[2])]);

    assert_eq!(
        find_missing_in_parent(&tree, &snap).unwrap(),
        vec![
            Violation::ancestor_missing(user(5), ChatId::new(234), ChatId::new(123)),
            Violation::ancestor_missing(user(6), ChatId::new(234), ChatId::new(123)),
        ]
    );
}

#[test]
fn shared_ancestor_pair_repeats_per_line_but_reports_once() {
    let tree = org_tree();
    // 42 sits in Engineering but not Company; Engineering lies on two lines
    let snap = snapshot(&[
        (100, &[1, 2, 3]),
        (200, &[1, 42]),
        (210, &[1]),
        (220, &[1]),
        (300, &[2]),
    ]);

    let outcome = audit(&tree, &snap).unwrap();
    let engineering_pairs = outcome
        .violations()
        .iter()
        .filter(|v| **v == Violation::ancestor_missing(user(42), ChatId::new(200), ChatId::new(100)))
        .count();
    assert_eq!(engineering_pairs, 2);
    assert_eq!(outcome.child_coverage_count(), 1);

    let text = format_report(&directory(&[3, 42]), &tree.index(), outcome.violations())
        .unwrap()
        .unwrap();
    assert_eq!(
        text,
        "\nUser \"User42 Test @user42\" is missing in:\n\
         \t \"Company\" even though they are in \"Engineering\"\n\
         \nUser \"User3 Test @user3\" is missing in:\n\
         \t any child chat of \"Company\"\n"
    );
}

#[test]
fn clean_org_produces_no_report() {
    let tree = ChatTree::new(vec![flagged(1, "Root").with_children(vec![
        chat(2, "A").with_children(vec![chat(3, "A1")]),
        chat(4, "B"),
    ])])
    .unwrap();
    let snap = snapshot(&[(1, &[1, 2]), (2, &[1]), (3, &[1]), (4, &[2])]);

    let outcome = audit(&tree, &snap).unwrap();
    assert!(outcome.is_clean());
    assert_eq!(
        format_report(&directory(&[]), &tree.index(), outcome.violations()).unwrap(),
        None
    );
}
