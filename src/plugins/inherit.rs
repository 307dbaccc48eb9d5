//! Capability phase: inheritable style snapshots on text leaves.
//!
//! Renderers usually cannot cascade styles, so each text node receives the
//! inheritable properties of its element ancestors (nearest ancestor wins)
//! and their class names (outermost first, without duplicates).
//!
//! This plugin needs its ancestors while visiting a node, so it walks the
//! tree itself instead of registering batched handlers.

use crate::MAX_DEPTH;
use crate::error::BoxError;
use crate::node::{SemanticNode, StyleMap};
use crate::plugin::{Phase, Plugin, TransformContext};

/// Style keys copied onto text nodes.
pub const INHERITED_KEYS: &[&str] = &[
    "fontFamily",
    "fontSize",
    "fontWeight",
    "fontStyle",
    "lineHeight",
    "color",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct InheritPlugin;

impl Plugin for InheritPlugin {
    fn name(&self) -> &str {
        "inherit"
    }

    fn phase(&self) -> Phase {
        Phase::Capability
    }

    fn order(&self) -> i32 {
        30
    }

    fn apply(&self, ctx: &mut TransformContext<'_>) -> Result<(), BoxError> {
        inherit(&mut ctx.root, &StyleMap::new(), &[], 0);
        Ok(())
    }
}

fn inherit(node: &mut SemanticNode, style: &StyleMap, classes: &[String], depth: usize) {
    match node {
        SemanticNode::Text(text) => {
            text.inherited_style = (!style.is_empty()).then(|| style.clone());
            text.inherited_classes = (!classes.is_empty()).then(|| classes.to_vec());
        }
        SemanticNode::Element(el) => {
            if depth >= MAX_DEPTH {
                tracing::warn!(depth, "semantic tree exceeds depth ceiling, not inheriting below");
                return;
            }

            let mut style = style.clone();
            for key in INHERITED_KEYS {
                if let Some(value) = el.props.style.get(*key) {
                    style.insert((*key).to_string(), value.clone());
                }
            }

            let mut classes = classes.to_vec();
            if let Some(class_name) = &el.props.class_name {
                for class in class_name.split_whitespace() {
                    if !classes.iter().any(|c| c == class) {
                        classes.push(class.to_string());
                    }
                }
            }

            for child in &mut el.children {
                inherit(child, &style, &classes, depth + 1);
            }
        }
    }
}
