//! Structure phase: build the semantic tree from the markup tree.
//!
//! Each markup node becomes zero, one or more semantic nodes:
//! - whitespace-only text is dropped, other text becomes a leaf carrying the
//!   marks inherited from formatting ancestors
//! - unmapped tags are dropped with their whole subtree
//! - `br` becomes a newline leaf tagged as a line break
//! - formatting tags (`b`, `em`, `code`, ...) contribute marks instead of an
//!   element; their output is unwrapped unless it needs a wrapper (see
//!   [`BlockPlugin`])
//! - every other mapped tag becomes one element with the mapping's target
//!   tag, role, capability and default style, plus its raw attributes
//!
//! Adjacent compatible text is merged once the whole tree is built.

use crate::MAX_DEPTH;
use crate::engine::{StyleMode, TransformOptions};
use crate::error::BoxError;
use crate::markup::{MarkupKind, MarkupNode, MarkupNodeId, MarkupTree};
use crate::node::{
    ElementNode, Marks, SemanticNode, TextNode, merge_adjacent_text, merge_text_runs,
};
use crate::plugin::{Phase, Plugin, TransformContext};
use crate::stylesheet;
use crate::tags::{self, TagMapping};

/// Builds the initial semantic tree.
///
/// Formatting tags produce a `text` wrapper only when their content needs
/// one: more than one resulting node after merging compatible text, or any
/// block-level node. A block element inside a formatting tag is kept wrapped
/// even when it is the only child so the formatting boundary is not lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockPlugin;

impl Plugin for BlockPlugin {
    fn name(&self) -> &str {
        "block"
    }

    fn phase(&self) -> Phase {
        Phase::Structure
    }

    fn apply(&self, ctx: &mut TransformContext<'_>) -> Result<(), BoxError> {
        let builder = TreeBuilder {
            ast: ctx.ast,
            options: ctx.options,
        };
        let children = builder.build_children(ctx.ast.content_root(), Marks::NONE, 0);

        let root = ctx
            .root
            .as_element_mut()
            .ok_or("context root is not an element")?;
        root.children.extend(children);
        merge_adjacent_text(&mut ctx.root);
        Ok(())
    }
}

struct TreeBuilder<'a> {
    ast: &'a MarkupTree,
    options: &'a TransformOptions,
}

impl TreeBuilder<'_> {
    fn build_children(&self, parent: MarkupNodeId, marks: Marks, depth: usize) -> Vec<SemanticNode> {
        let mut out = Vec::new();
        if depth >= MAX_DEPTH {
            tracing::warn!(depth, "markup nesting exceeds depth ceiling, skipping subtree");
            return out;
        }
        for child in self.ast.children(parent) {
            self.build_node(child, marks, depth, &mut out);
        }
        out
    }

    fn build_node(&self, id: MarkupNodeId, marks: Marks, depth: usize, out: &mut Vec<SemanticNode>) {
        let Some(node) = self.ast.get(id) else {
            return;
        };
        match node.kind() {
            MarkupKind::Text => {
                let text = node.text().unwrap_or_default();
                if !text.trim().is_empty() {
                    out.push(TextNode::new(text).with_marks(marks).into());
                }
            }
            MarkupKind::Tag => self.build_element(node, id, marks, depth, out),
            MarkupKind::Script | MarkupKind::Style => {
                tracing::debug!(tag = node.name(), "dropping unmapped tag");
            }
            MarkupKind::Root | MarkupKind::Comment | MarkupKind::Doctype => {}
        }
    }

    fn build_element(
        &self,
        node: &MarkupNode,
        id: MarkupNodeId,
        marks: Marks,
        depth: usize,
        out: &mut Vec<SemanticNode>,
    ) {
        let Some(tag) = node.name() else {
            return;
        };
        let Some(mapping) = tags::lookup(tag) else {
            tracing::debug!(tag, "dropping unmapped tag");
            return;
        };

        if tags::is_line_break(tag) {
            out.push(TextNode::line_break(marks).into());
            return;
        }

        if let Some(mark) = tags::formatting_mark(tag) {
            // Unwrapped output stays unmerged so break origins reach the final pass
            let children = self.build_children(id, marks.union(mark), depth + 1);
            if needs_wrapper(&children) {
                let children = merge_text_runs(children);
                out.push(self.element(tag, node, &mapping, children));
            } else {
                out.extend(children);
            }
            return;
        }

        let children = if mapping.capability.void {
            Vec::new()
        } else {
            self.build_children(id, marks, depth + 1)
        };
        out.push(self.element(tag, node, &mapping, children));
    }

    fn element(
        &self,
        tag: &str,
        node: &MarkupNode,
        mapping: &TagMapping,
        children: Vec<SemanticNode>,
    ) -> SemanticNode {
        let mut element = ElementNode::new(mapping.target)
            .with_role(mapping.role)
            .with_capability(mapping.capability)
            .with_source(tag, node.attr_map())
            .with_children(children);

        if !mapping.default_style.is_empty() {
            match self.options.style_mode {
                StyleMode::Inline => element.props.style = mapping.style(),
                StyleMode::CssClass => element
                    .props
                    .add_class(&stylesheet::class_name(&self.options.root_class_name, tag)),
            }
        }
        element.into()
    }
}

/// Number of nodes `children` would leave after text merging.
fn merged_len(children: &[SemanticNode]) -> usize {
    let mut len = 0;
    let mut run_marks = None;
    for child in children {
        match child.as_text() {
            Some(text) if run_marks == Some(&text.marks) => {}
            Some(text) => {
                len += 1;
                run_marks = Some(&text.marks);
            }
            None => {
                len += 1;
                run_marks = None;
            }
        }
    }
    len
}

fn needs_wrapper(children: &[SemanticNode]) -> bool {
    merged_len(children) > 1
        || children.iter().any(|child| {
            child
                .as_element()
                .and_then(|el| el.role)
                .is_some_and(|role| role.is_block_level())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;
    use crate::node::{Role, TextOrigin};

    fn build_with(markup: &str, options: &TransformOptions) -> Vec<SemanticNode> {
        let ast = parse_markup(markup);
        let mut ctx = TransformContext::new(&ast, options);
        BlockPlugin.apply(&mut ctx).unwrap();
        ctx.into_nodes()
    }

    fn build(markup: &str) -> Vec<SemanticNode> {
        build_with(markup, &TransformOptions::default())
    }

    #[test]
    fn test_paragraph_becomes_text_container() {
        let nodes = build("<p>Hello</p>");
        assert_eq!(nodes.len(), 1);
        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.tag, "text");
        assert_eq!(p.role, Some(Role::TextContainer));
        assert_eq!(p.meta.source_tag.as_deref(), Some("p"));
        assert_eq!(p.props.style["marginTop"], "8px");
        assert_eq!(nodes[0].text_content(), "Hello");
    }

    #[test]
    fn test_whitespace_only_text_is_dropped() {
        let nodes = build("<div>\n   <p>a</p>\n   <p>b</p>\n</div>");
        assert_eq!(nodes[0].children().len(), 2);
    }

    #[test]
    fn test_unmapped_subtree_is_dropped() {
        let nodes = build("<div>keep<iframe>gone</iframe><form><p>also gone</p></form></div>");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text_content(), "keep");
    }

    #[test]
    fn test_attributes_are_recorded_uninterpreted() {
        let nodes = build(r#"<div style="color: red" data-x="1">x</div>"#);
        let div = nodes[0].as_element().unwrap();
        assert_eq!(div.source_attr("style"), Some("color: red"));
        assert_eq!(div.source_attr("data-x"), Some("1"));
        assert!(!div.props.style.contains_key("color"));
    }

    #[test]
    fn test_formatting_tag_is_unwrapped_into_marks() {
        let nodes = build("<p>plain <b>bold</b> <i>italic</i></p>");
        let children = nodes[0].children();
        assert_eq!(children.len(), 3);
        assert!(children[0].as_text().unwrap().marks.is_none());
        assert_eq!(children[1].as_text().unwrap().marks, Some(Marks::BOLD));
        assert_eq!(children[2].as_text().unwrap().content, "italic");
        assert_eq!(children[2].as_text().unwrap().marks, Some(Marks::ITALIC));
    }

    #[test]
    fn test_nested_formatting_unions_marks() {
        let nodes = build("<p><b>bold <i>both</i></b></p>");
        let wrapper = nodes[0].children()[0].as_element().unwrap();
        assert_eq!(wrapper.meta.source_tag.as_deref(), Some("b"));

        let bold = wrapper.children[0].as_text().unwrap();
        assert_eq!(bold.content, "bold ");
        assert_eq!(bold.marks, Some(Marks::BOLD));
        let both = wrapper.children[1].as_text().unwrap();
        assert_eq!(both.marks, Some(Marks::BOLD.union(Marks::ITALIC)));
    }

    #[test]
    fn test_formatting_tag_with_mixed_children_is_wrapped() {
        let nodes = build("<p><b>a<span>b</span></b></p>");
        let wrapper = nodes[0].children()[0].as_element().unwrap();
        assert_eq!(wrapper.tag, "text");
        assert_eq!(wrapper.meta.source_tag.as_deref(), Some("b"));
        assert_eq!(wrapper.children.len(), 2);
    }

    #[test]
    fn test_formatting_tag_around_block_is_wrapped() {
        let nodes = build("<div><b><p>x</p></b></div>");
        let wrapper = nodes[0].children()[0].as_element().unwrap();
        assert_eq!(wrapper.meta.source_tag.as_deref(), Some("b"));
        assert_eq!(wrapper.children[0].source_tag(), Some("p"));
    }

    #[test]
    fn test_empty_formatting_tag_produces_nothing() {
        let nodes = build("<p>a<b></b></p>");
        assert_eq!(nodes[0].children().len(), 1);
    }

    #[test]
    fn test_line_break_is_merged() {
        let nodes = build("<p>one  <br>  two</p>");
        let children = nodes[0].children();
        assert_eq!(children.len(), 1);
        let text = children[0].as_text().unwrap();
        assert_eq!(text.content, "one\ntwo");
        assert_eq!(text.origin, TextOrigin::Literal);
    }

    #[test]
    fn test_line_break_keeps_marks() {
        let nodes = build("<p><b>a<br>b</b></p>");
        let children = nodes[0].children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].as_text().unwrap().content, "a\nb");
        assert_eq!(children[0].as_text().unwrap().marks, Some(Marks::BOLD));
    }

    #[test]
    fn test_break_closing_formatting_run_survives() {
        let nodes = build("<p><b>x<br></b><b><br>y</b></p>");
        let children = nodes[0].children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].as_text().unwrap().content, "x\n\ny");

        let nodes = build("<p><b>x<br></b><b><br></b></p>");
        assert_eq!(nodes[0].children()[0].as_text().unwrap().content, "x\n\n");
    }

    #[test]
    fn test_void_image_has_no_children() {
        let nodes = build(r#"<img src="a.png">"#);
        let img = nodes[0].as_element().unwrap();
        assert_eq!(img.tag, "image");
        assert!(img.is_void());
        assert!(img.children.is_empty());
    }

    #[test]
    fn test_css_class_mode_uses_class_names() {
        let options = TransformOptions::default()
            .with_style_mode(StyleMode::CssClass)
            .with_root_class_name("app");
        let nodes = build_with("<div><span>x</span></div>", &options);
        let div = nodes[0].as_element().unwrap();
        assert!(div.props.style.is_empty());
        assert_eq!(div.props.class_name.as_deref(), Some("app-div"));

        // No default style, no class.
        let span = div.children[0].as_element().unwrap();
        assert_eq!(span.props.class_name, None);
    }
}
