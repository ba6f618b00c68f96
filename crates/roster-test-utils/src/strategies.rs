//! Proptest strategies for random hierarchies and snapshots
//!
//! Trees are generated as parent arrays: chat `i` has a parent `< i` or is a
//! root. Chat `i` gets id `i + 1`. The parent array is kept alongside the tree
//! so properties can be checked against an independent model.

use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use roster_model::{ChatId, ChatNode, ChatTree, MembershipSnapshot, UserId};
use std::collections::BTreeSet;

/// Chat id assigned to generated chat `index`
pub fn chat_id(index: usize) -> ChatId {
    ChatId::new(i64::try_from(index).expect("generated index fits i64") + 1)
}

/// Build a tree from a parent array; `parents[i] < i` for every non-root
pub fn tree_from_parents(parents: &[Option<usize>], flags: &[bool]) -> ChatTree {
    let n = parents.len();
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (index, parent) in parents.iter().enumerate() {
        if let Some(parent) = parent {
            children_of[*parent].push(index);
        }
    }

    // children have larger indices, so they are complete before their parent
    let mut built: Vec<Option<ChatNode>> = vec![None; n];
    for index in (0..n).rev() {
        let children = children_of[index]
            .iter()
            .map(|&child| built[child].take().expect("child built before parent"))
            .collect();
        built[index] = Some(
            ChatNode::new(chat_id(index), [format!("chat-{index}")])
                .requiring_member_in_any_child(flags.get(index).copied().unwrap_or(false))
                .with_children(children),
        );
    }

    let roots = parents
        .iter()
        .enumerate()
        .filter(|(_, parent)| parent.is_none())
        .map(|(index, _)| built[index].take().expect("root built"))
        .collect();

    ChatTree::new(roots).expect("generated ids are unique")
}

/// A generated hierarchy with its snapshot
#[derive(Debug, Clone)]
pub struct TreeCase {
    pub parents: Vec<Option<usize>>,
    pub tree: ChatTree,
    pub snapshot: MembershipSnapshot,
}

impl TreeCase {
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn members(&self, index: usize) -> &BTreeSet<UserId> {
        self.snapshot
            .members(chat_id(index))
            .expect("every generated chat has a roster")
    }

    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = index;
        while let Some(parent) = self.parents[current] {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Whether `ancestor` is `index` itself or lies above it
    pub fn is_ancestor_or_self(&self, ancestor: usize, index: usize) -> bool {
        let mut current = Some(index);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parents[node];
        }
        false
    }

    /// Chats strictly below `index`
    pub fn descendants(&self, index: usize) -> Vec<usize> {
        (0..self.len())
            .filter(|&other| other != index && self.is_ancestor_or_self(index, other))
            .collect()
    }

    pub fn is_root(&self, index: usize) -> bool {
        self.parents[index].is_none()
    }

    pub fn is_leaf(&self, index: usize) -> bool {
        !self.parents.contains(&Some(index))
    }

    pub fn flagged(&self, index: usize) -> bool {
        self.tree
            .index()
            .get(chat_id(index))
            .is_some_and(ChatNode::requires_member_in_any_child)
    }

    /// Index of a generated chat id
    pub fn index_of(&self, id: ChatId) -> usize {
        usize::try_from(id.get() - 1).expect("generated ids are positive")
    }
}

/// Random hierarchy of up to `max_chats` chats with rosters drawn from a
/// small user pool, so overlaps and gaps are both common
pub fn arb_tree_case(max_chats: usize) -> impl Strategy<Value = TreeCase> {
    (1..=max_chats)
        .prop_flat_map(|n| {
            let parents: Vec<BoxedStrategy<Option<usize>>> = (0..n)
                .map(|index| {
                    if index == 0 {
                        Just(None).boxed()
                    } else {
                        proptest::option::weighted(0.8, 0..index).boxed()
                    }
                })
                .collect();

            (parents, vec(any::<bool>(), n), vec(btree_set(0i64..8, 0..6), n))
        })
        .prop_map(|(parents, flags, rosters)| {
            let tree = tree_from_parents(&parents, &flags);
            let snapshot = rosters
                .into_iter()
                .enumerate()
                .map(|(index, roster)| (chat_id(index), roster.into_iter().map(UserId::new)))
                .collect();

            TreeCase {
                parents,
                tree,
                snapshot,
            }
        })
}
