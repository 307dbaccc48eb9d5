//! Adjacent text coalescing.
//!
//! Two neighbouring text leaves merge when their mark bags are equal
//! (both absent counts as equal). When one side came from a line-break tag,
//! all whitespace on the other, literal side is trimmed where it touches the
//! break. Newlines produced by breaks are never trimmed, so consecutive
//! breaks survive. Once a run is merged it no longer counts as a break. The
//! pass is a fixed point: running it twice gives the same tree as running it
//! once.

use super::{SemanticNode, TextNode, TextOrigin};
use crate::MAX_DEPTH;

/// Append `right` onto `left`.
///
/// Callers are responsible for the mark-equality gate. The result keeps the
/// line-break origin only while it still ends with a break, so a following
/// merge trims against it too.
pub fn merge_text_pair(left: &mut TextNode, right: TextNode) {
    let left_break = left.is_line_break();
    let right_break = right.is_line_break();
    let mut right_content = right.content;

    if right_break && !left_break {
        let trimmed = left.content.trim_end().len();
        left.content.truncate(trimmed);
    }
    if left_break && !right_break {
        right_content = right_content.trim_start().to_string();
    }

    let ends_with_break = right_break || (left_break && right_content.is_empty());
    left.content.push_str(&right_content);
    left.origin = if ends_with_break {
        TextOrigin::LineBreak
    } else {
        TextOrigin::Literal
    };
}

/// Merge runs of compatible text siblings in a single child list.
pub fn merge_text_runs(nodes: Vec<SemanticNode>) -> Vec<SemanticNode> {
    let mut out: Vec<SemanticNode> = Vec::with_capacity(nodes.len());
    // Whether `out.last()` is the product of a merge
    let mut merged = false;

    for node in nodes {
        let right = match node {
            SemanticNode::Text(t) => t,
            other => {
                settle(&mut out, merged);
                merged = false;
                out.push(other);
                continue;
            }
        };
        if let Some(SemanticNode::Text(left)) = out.last_mut()
            && left.marks == right.marks
        {
            merge_text_pair(left, right);
            merged = true;
        } else {
            settle(&mut out, merged);
            merged = false;
            out.push(right.into());
        }
    }
    settle(&mut out, merged);
    out
}

/// Drop the break origin from a finished merged run.
fn settle(out: &mut [SemanticNode], merged: bool) {
    if merged && let Some(SemanticNode::Text(last)) = out.last_mut() {
        last.origin = TextOrigin::Literal;
    }
}

/// Merge adjacent text throughout a tree, bottom-up.
pub fn merge_adjacent_text(node: &mut SemanticNode) {
    merge_at_depth(node, 0);
}

fn merge_at_depth(node: &mut SemanticNode, depth: usize) {
    let SemanticNode::Element(element) = node else {
        return;
    };
    if depth >= MAX_DEPTH {
        tracing::warn!(depth, "semantic tree exceeds depth ceiling, not merging below");
        return;
    }
    for child in &mut element.children {
        merge_at_depth(child, depth + 1);
    }
    let children = std::mem::take(&mut element.children);
    element.children = merge_text_runs(children);
}
