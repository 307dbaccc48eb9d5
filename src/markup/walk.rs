//! Depth-first traversal over the markup tree.
//!
//! Both walkers use an explicit stack and stop descending at
//! [`crate::MAX_DEPTH`], so pathological nesting cannot exhaust the call stack.

use super::arena::{MarkupNode, MarkupNodeId, MarkupTree};
use crate::MAX_DEPTH;

/// Visit every node below `start` (inclusive) in document order.
///
/// The visitor receives the node, its id and its depth relative to `start`.
pub fn walk<F>(tree: &MarkupTree, start: MarkupNodeId, mut visitor: F)
where
    F: FnMut(&MarkupNode, MarkupNodeId, usize),
{
    let mut stack = vec![(start, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        visitor(node, id, depth);
        if depth >= MAX_DEPTH {
            tracing::warn!(depth, "markup nesting exceeds depth ceiling, skipping subtree");
            continue;
        }
        push_children(tree, id, depth + 1, &mut stack);
    }
}

/// Find the first node below `start` (inclusive) matching `predicate`.
pub fn find<F>(tree: &MarkupTree, start: MarkupNodeId, mut predicate: F) -> Option<MarkupNodeId>
where
    F: FnMut(&MarkupNode) -> bool,
{
    let mut stack = vec![(start, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        if predicate(node) {
            return Some(id);
        }
        if depth < MAX_DEPTH {
            push_children(tree, id, depth + 1, &mut stack);
        }
    }
    None
}

/// Find the first element with the given tag name.
pub fn find_by_tag(tree: &MarkupTree, start: MarkupNodeId, tag: &str) -> Option<MarkupNodeId> {
    find(tree, start, |node| node.name() == Some(tag))
}

fn push_children(
    tree: &MarkupTree,
    id: MarkupNodeId,
    depth: usize,
    stack: &mut Vec<(MarkupNodeId, usize)>,
) {
    // Reverse so the leftmost child is popped first.
    let start = stack.len();
    stack.extend(tree.children(id).map(|child| (child, depth)));
    stack[start..].reverse();
}
