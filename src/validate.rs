//! Structural validation of semantic trees.
//!
//! Checks the invariants the renderer relies on:
//! - every element has a non-empty tag
//! - void elements have no children
//! - a table's direct children are rows, sections or captions
//! - nesting stays under [`MAX_DEPTH`]
//!
//! Errors name the offending node by its ancestor path, for example
//! `view[0] > view[1] > image[0]`.

use crate::MAX_DEPTH;
use crate::error::ValidationError;
use crate::node::{ElementNode, Role, SemanticNode};
use crate::tags;

/// Validate a list of top-level nodes.
pub fn validate_nodes(nodes: &[SemanticNode]) -> Result<(), ValidationError> {
    let mut path = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        check_node(node, index, &mut path)?;
    }
    Ok(())
}

/// Validate a single tree.
pub fn validate(node: &SemanticNode) -> Result<(), ValidationError> {
    validate_nodes(std::slice::from_ref(node))
}

fn check_node(
    node: &SemanticNode,
    index: usize,
    path: &mut Vec<String>,
) -> Result<(), ValidationError> {
    let SemanticNode::Element(el) = node else {
        return Ok(());
    };

    let label = if el.tag.is_empty() { "?" } else { el.tag.as_str() };
    path.push(format!("{label}[{index}]"));

    if path.len() > MAX_DEPTH {
        return Err(error(path, format!("nesting deeper than {MAX_DEPTH} levels")));
    }
    if el.tag.trim().is_empty() {
        return Err(error(path, "element has an empty tag".into()));
    }
    if el.is_void() && !el.children.is_empty() {
        return Err(error(
            path,
            format!("void element has {} children", el.children.len()),
        ));
    }
    if el.role == Some(Role::Table)
        && let Some(position) = el.children.iter().position(|c| !is_table_child(c))
    {
        path.push(child_label(&el.children[position], position));
        return Err(error(path, "table child is not a row".into()));
    }

    for (index, child) in el.children.iter().enumerate() {
        check_node(child, index, path)?;
    }
    path.pop();
    Ok(())
}

fn is_table_child(node: &SemanticNode) -> bool {
    let Some(el) = node.as_element() else {
        return false;
    };
    el.role == Some(Role::Row) || is_section(el)
}

fn is_section(el: &ElementNode) -> bool {
    el.meta
        .source_tag
        .as_deref()
        .is_some_and(|tag| tags::is_table_section(tag) || tag == "caption")
}

fn child_label(node: &SemanticNode, index: usize) -> String {
    match node {
        SemanticNode::Element(el) => format!("{}[{index}]", el.tag),
        SemanticNode::Text(_) => format!("#text[{index}]"),
    }
}

fn error(path: &[String], message: String) -> ValidationError {
    ValidationError {
        path: path.join(" > "),
        message,
    }
}
