//! Structure phase: table flattening.
//!
//! `thead`/`tbody`/`tfoot` sections with exactly one child are replaced by
//! that child, so a table's direct children are its rows:
//!
//! ```text
//! table                table
//!   thead                tr
//!     tr        →        tr
//!   tbody
//!     tr
//! ```
//!
//! Sections holding several rows are kept intact rather than spilling their
//! rows into the table.

use crate::MAX_DEPTH;
use crate::error::BoxError;
use crate::node::{ElementNode, SemanticNode};
use crate::plugin::{Phase, Plugin, TransformContext};
use crate::tags;

#[derive(Debug, Clone, Copy, Default)]
pub struct TablePlugin;

impl Plugin for TablePlugin {
    fn name(&self) -> &str {
        "table"
    }

    fn phase(&self) -> Phase {
        Phase::Structure
    }

    fn order(&self) -> i32 {
        20
    }

    fn apply(&self, ctx: &mut TransformContext<'_>) -> Result<(), BoxError> {
        flatten_tables(&mut ctx.root, 0);
        Ok(())
    }
}

fn flatten_tables(node: &mut SemanticNode, depth: usize) {
    let Some(el) = node.as_element_mut() else {
        return;
    };
    if depth >= MAX_DEPTH {
        tracing::warn!(depth, "semantic tree exceeds depth ceiling, skipping tables");
        return;
    }

    if el.meta.source_tag.as_deref() == Some("table") {
        flatten_sections(el);
    }
    for child in &mut el.children {
        flatten_tables(child, depth + 1);
    }
}

fn flatten_sections(table: &mut ElementNode) {
    for slot in &mut table.children {
        let SemanticNode::Element(section) = slot else {
            continue;
        };
        let is_section = section
            .meta
            .source_tag
            .as_deref()
            .is_some_and(tags::is_table_section);
        if is_section
            && section.children.len() == 1
            && let Some(only) = section.children.pop()
        {
            *slot = only;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TransformOptions;
    use crate::markup::parse_markup;
    use crate::plugins::{BlockPlugin, META_TABLES};

    fn build(markup: &str) -> Vec<SemanticNode> {
        let ast = parse_markup(markup);
        let options = TransformOptions::default();
        let mut ctx = TransformContext::new(&ast, &options);
        BlockPlugin.apply(&mut ctx).unwrap();
        TablePlugin.apply(&mut ctx).unwrap();
        ctx.into_nodes()
    }

    fn child_sources(node: &SemanticNode) -> Vec<&str> {
        node.children()
            .iter()
            .map(|c| c.source_tag().unwrap_or("#text"))
            .collect()
    }

    #[test]
    fn test_single_row_sections_are_flattened() {
        let nodes = build(
            "<table><thead><tr><th>h</th></tr></thead>\
             <tbody><tr><td>d</td></tr></tbody></table>",
        );
        assert_eq!(child_sources(&nodes[0]), vec!["tr", "tr"]);
    }

    #[test]
    fn test_implicit_tbody_is_flattened() {
        // The tree builder inserts a tbody around bare rows.
        let nodes = build("<table><tr><td>x</td></tr></table>");
        assert_eq!(child_sources(&nodes[0]), vec!["tr"]);
    }

    #[test]
    fn test_multi_row_section_is_kept() {
        let nodes = build(
            "<table><tbody><tr><td>a</td></tr><tr><td>b</td></tr></tbody>\
             <tfoot><tr><td>f</td></tr></tfoot></table>",
        );
        assert_eq!(child_sources(&nodes[0]), vec!["tbody", "tr"]);
        assert_eq!(nodes[0].children()[0].children().len(), 2);
    }

    #[test]
    fn test_flattening_ignores_zero_table_count() {
        let ast = parse_markup("<table><tr><td>x</td></tr></table>");
        let options = TransformOptions::default();
        let mut ctx = TransformContext::new(&ast, &options);
        BlockPlugin.apply(&mut ctx).unwrap();
        ctx.metadata.insert(META_TABLES.into(), "0".into());
        TablePlugin.apply(&mut ctx).unwrap();
        assert_eq!(child_sources(&ctx.into_nodes()[0]), vec!["tr"]);
    }

    #[test]
    fn test_nested_tables() {
        let nodes = build(
            "<div><table><tbody><tr><td>\
             <table><thead><tr><th>inner</th></tr></thead></table>\
             </td></tr></tbody></table></div>",
        );
        let outer = &nodes[0].children()[0];
        assert_eq!(child_sources(outer), vec!["tr"]);
        let cell = &outer.children()[0].children()[0];
        let inner = &cell.children()[0];
        assert_eq!(inner.source_tag(), Some("table"));
        assert_eq!(child_sources(inner), vec!["tr"]);
    }
}
