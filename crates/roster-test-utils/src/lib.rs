//! Testing utilities for the roster audit workspace
//!
//! Shared fixtures, literal snapshot builders and proptest strategies.

#![allow(missing_docs)]

use roster_model::{ChatId, ChatNode, ChatTree, MembershipSnapshot, UserDirectory, UserId, UserProfile};

pub mod strategies;

pub fn chat(id: i64, alias: &str) -> ChatNode {
    ChatNode::new(ChatId::new(id), [alias])
}

pub fn flagged(id: i64, alias: &str) -> ChatNode {
    chat(id, alias).requiring_member_in_any_child(true)
}

pub fn ids(raw: &[i64]) -> Vec<ChatId> {
    raw.iter().copied().map(ChatId::new).collect()
}

pub fn user(raw: i64) -> UserId {
    UserId::new(raw)
}

pub fn users(raw: &[i64]) -> Vec<UserId> {
    raw.iter().copied().map(UserId::new).collect()
}

/// Snapshot from `(chat, members)` literals
pub fn snapshot(rosters: &[(i64, &[i64])]) -> MembershipSnapshot {
    rosters
        .iter()
        .map(|(chat, members)| (ChatId::new(*chat), users(members)))
        .collect()
}

/// Profile with deterministic synthetic fields
pub fn profile(raw: i64) -> UserProfile {
    UserProfile::new(UserId::new(raw))
        .with_name(format!("User{raw}"), "Test")
        .with_username(format!("user{raw}"))
}

pub fn directory(raw: &[i64]) -> UserDirectory {
    raw.iter().copied().map(profile).collect()
}

/// Company (flagged) > [Engineering > [Backend, Frontend], Sales]
pub fn org_tree() -> ChatTree {
    ChatTree::new(vec![ChatNode::new(ChatId::new(100), ["Company", "all"])
        .requiring_member_in_any_child(true)
        .with_children(vec![
            chat(200, "Engineering").with_children(vec![chat(210, "Backend"), chat(220, "Frontend")]),
            chat(300, "Sales"),
        ])])
    .expect("org tree fixture is valid")
}

/// Configuration document describing [`org_tree`] with one notification target
pub const ORG_CONFIG_JSON: &str = r#"{
    "chats": [
        {
            "id": 100,
            "aliases": ["Company", "all"],
            "members_must_be_in_any_child_chat": true,
            "child_chats": [
                {
                    "id": 200,
                    "aliases": ["Engineering"],
                    "child_chats": [
                        {"id": 210, "aliases": ["Backend"]},
                        {"id": 220, "aliases": ["Frontend"]}
                    ]
                },
                {"id": 300, "aliases": ["Sales"]}
            ]
        }
    ],
    "help_contacts": ["@admin"],
    "membership_validation": {
        "notification": {"tg_chats": [{"id": -500, "name": "Admins"}]}
    }
}"#;
