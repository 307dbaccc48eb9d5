//! Structure phase: list markers.
//!
//! Every item of an `ol`/`ul` gets a marker in front of its content:
//! `"1. "`, `"2. "`, ... for ordered lists (counting from the `start`
//! attribute when it is a valid integer) and `"• "` for unordered ones.
//! The marker is prepended to the item's leading text, or inserted as a new
//! first child when the item starts with an element.

use crate::MAX_DEPTH;
use crate::error::BoxError;
use crate::node::{ElementNode, SemanticNode, TextNode};
use crate::plugin::{Phase, Plugin, TransformContext};

pub const BULLET: &str = "• ";

#[derive(Debug, Clone, Copy, Default)]
pub struct ListPlugin;

impl Plugin for ListPlugin {
    fn name(&self) -> &str {
        "list"
    }

    fn phase(&self) -> Phase {
        Phase::Structure
    }

    fn order(&self) -> i32 {
        10
    }

    fn apply(&self, ctx: &mut TransformContext<'_>) -> Result<(), BoxError> {
        add_markers(&mut ctx.root, 0);
        Ok(())
    }
}

fn add_markers(node: &mut SemanticNode, depth: usize) {
    let Some(el) = node.as_element_mut() else {
        return;
    };
    if depth >= MAX_DEPTH {
        tracing::warn!(depth, "semantic tree exceeds depth ceiling, skipping list markers");
        return;
    }

    match el.meta.source_tag.as_deref() {
        Some("ol") => {
            let start = el
                .source_attr("start")
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(1);
            mark_items(el, |n| format!("{}. ", ordinal(start, n)));
        }
        Some("ul") => mark_items(el, |_| BULLET.to_string()),
        _ => {}
    }

    for child in &mut el.children {
        add_markers(child, depth + 1);
    }
}

/// Number of the `n`th item, saturating at the ends of the range.
fn ordinal(start: i64, n: usize) -> i64 {
    start.saturating_add(i64::try_from(n).unwrap_or(i64::MAX))
}

fn mark_items<F>(list: &mut ElementNode, marker: F)
where
    F: Fn(usize) -> String,
{
    let items = list
        .children
        .iter_mut()
        .filter_map(SemanticNode::as_element_mut)
        .filter(|child| child.meta.source_tag.as_deref() == Some("li"));

    for (n, item) in items.enumerate() {
        prepend_marker(item, marker(n));
    }
}

fn prepend_marker(item: &mut ElementNode, marker: String) {
    match item.children.first_mut() {
        Some(SemanticNode::Text(text)) => text.content.insert_str(0, &marker),
        _ => item.children.insert(0, TextNode::marker(marker).into()),
    }
}
