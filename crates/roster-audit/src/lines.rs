//! Hierarchy line enumeration
//!
//! A hierarchy line is one root-to-leaf path. Lines are the unit of
//! ancestor/descendant pairing for the ancestor-coverage check.

use roster_model::{ChatId, ChatNode, ChatTree};

/// Chat ids from an outermost ancestor down to one leaf
pub type HierarchyLine = Vec<ChatId>;

/// All root-to-leaf paths below `root`
///
/// A leaf yields the single line `[root]`. Lines come out depth-first with
/// children visited left to right. Uses an explicit stack, so depth is bounded
/// only by memory.
#[must_use]
pub fn hierarchy_lines(root: &ChatNode) -> Vec<HierarchyLine> {
    let mut lines = Vec::new();
    let mut stack: Vec<(&ChatNode, HierarchyLine)> = vec![(root, Vec::new())];

    while let Some((node, mut path)) = stack.pop() {
        path.push(node.id());

        if node.is_leaf() {
            lines.push(path);
            continue;
        }

        // reversed so the leftmost child is popped first
        for child in node.children().iter().rev() {
            stack.push((child, path.clone()));
        }
    }

    lines
}

/// Lines of every root, in root order
#[must_use]
pub fn tree_lines(tree: &ChatTree) -> Vec<HierarchyLine> {
    tree.roots().iter().flat_map(hierarchy_lines).collect()
}
