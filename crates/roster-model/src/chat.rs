//! Chat tree model
//!
//! A [`ChatTree`] is an ordered list of root [`ChatNode`]s. Nodes are values:
//! once a tree is built it is only read. All traversals are iterative so deep
//! hierarchies never grow the call stack.

use crate::error::ModelError;
use crate::ids::ChatId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// A single chat in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatNode {
    id: ChatId,
    aliases: Vec<String>,
    #[serde(rename = "members_must_be_in_any_child_chat", default)]
    requires_member_in_any_child: bool,
    #[serde(rename = "child_chats", default)]
    children: Vec<ChatNode>,
}

impl ChatNode {
    /// Create a leaf chat with the given aliases
    #[must_use]
    pub fn new<I, S>(id: ChatId, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            aliases: aliases.into_iter().map(Into::into).collect(),
            requires_member_in_any_child: false,
            children: Vec::new(),
        }
    }

    /// With child chats
    #[inline]
    #[must_use]
    pub fn with_children(mut self, children: Vec<ChatNode>) -> Self {
        self.children = children;
        self
    }

    /// Require every member to also be in some chat of the child subtree
    #[inline]
    #[must_use]
    pub fn requiring_member_in_any_child(mut self, required: bool) -> Self {
        self.requires_member_in_any_child = required;
        self
    }

    /// Chat id
    #[inline]
    #[must_use]
    pub fn id(&self) -> ChatId {
        self.id
    }

    /// All aliases, canonical name first
    #[inline]
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Canonical display name (first alias)
    ///
    /// Empty for a node that has not gone through [`ChatTree::new`].
    #[inline]
    #[must_use]
    pub fn canonical_name(&self) -> &str {
        self.aliases.first().map_or("", String::as_str)
    }

    /// Whether members must appear in at least one descendant chat
    #[inline]
    #[must_use]
    pub fn requires_member_in_any_child(&self) -> bool {
        self.requires_member_in_any_child
    }

    /// Direct child chats
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[ChatNode] {
        &self.children
    }

    /// Whether this chat has no children
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Every node strictly below this one, breadth-first
    #[must_use]
    pub fn descendants(&self) -> Vec<&ChatNode> {
        breadth_first(self.children.iter())
    }

    /// This node followed by all of its descendants
    #[must_use]
    pub fn subtree(&self) -> Vec<&ChatNode> {
        breadth_first(std::iter::once(self))
    }
}

fn breadth_first<'a>(start: impl Iterator<Item = &'a ChatNode>) -> Vec<&'a ChatNode> {
    let mut out = Vec::new();
    let mut queue: VecDeque<&ChatNode> = start.collect();

    while let Some(node) = queue.pop_front() {
        queue.extend(node.children.iter());
        out.push(node);
    }

    out
}

/// Validated chat hierarchy
///
/// Construction guarantees every chat has a display name and that chat ids
/// are unique across all branches, so id-keyed lookups never alias two nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChatTree {
    roots: Vec<ChatNode>,
}

impl ChatTree {
    /// Build a tree from its roots
    ///
    /// # Errors
    /// - `ModelError::EmptyAliases` if any chat has no alias
    /// - `ModelError::DuplicateChatId` if an id appears more than once
    pub fn new(roots: Vec<ChatNode>) -> Result<Self, ModelError> {
        let mut seen = HashSet::new();

        for node in breadth_first(roots.iter()) {
            if node.aliases.is_empty() {
                return Err(ModelError::EmptyAliases(node.id));
            }
            if !seen.insert(node.id) {
                return Err(ModelError::DuplicateChatId(node.id));
            }
        }

        tracing::debug!("Built chat tree with {} chats", seen.len());
        Ok(Self { roots })
    }

    /// Root chats in declaration order
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[ChatNode] {
        &self.roots
    }

    /// Whether the tree has no chats
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Every chat, roots first, then level by level
    #[must_use]
    pub fn all_chats(&self) -> Vec<&ChatNode> {
        breadth_first(self.roots.iter())
    }

    /// Ids of every chat in the tree
    #[must_use]
    pub fn chat_ids(&self) -> HashSet<ChatId> {
        self.all_chats().into_iter().map(ChatNode::id).collect()
    }

    /// Every distinct alias, sorted case-insensitively
    #[must_use]
    pub fn all_aliases(&self) -> Vec<String> {
        let unique: HashSet<&str> = self
            .all_chats()
            .into_iter()
            .flat_map(|chat| chat.aliases.iter().map(String::as_str))
            .collect();

        let mut aliases: Vec<String> = unique.into_iter().map(str::to_owned).collect();
        aliases.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        aliases
    }

    /// Id-keyed view of the tree for display lookups
    #[must_use]
    pub fn index(&self) -> ChatIndex<'_> {
        ChatIndex {
            chats: self
                .all_chats()
                .into_iter()
                .map(|chat| (chat.id, chat))
                .collect(),
        }
    }
}

/// Borrowed lookup from chat id to node
#[derive(Debug, Clone, Default)]
pub struct ChatIndex<'a> {
    chats: HashMap<ChatId, &'a ChatNode>,
}

impl<'a> ChatIndex<'a> {
    /// Node for an id
    #[inline]
    #[must_use]
    pub fn get(&self, id: ChatId) -> Option<&'a ChatNode> {
        self.chats.get(&id).copied()
    }

    /// Canonical display name for an id
    #[inline]
    #[must_use]
    pub fn canonical_name(&self, id: ChatId) -> Option<&'a str> {
        self.get(id).map(ChatNode::canonical_name)
    }

    /// Number of indexed chats
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    /// Whether the index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}
