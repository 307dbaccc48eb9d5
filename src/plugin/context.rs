//! Shared state for one pipeline run.

use std::collections::BTreeMap;

use crate::engine::TransformOptions;
use crate::markup::MarkupTree;
use crate::node::SemanticNode;

/// Free-form notes plugins leave for each other.
pub type Metadata = BTreeMap<String, String>;

/// State shared by every plugin of one transform.
///
/// The markup tree is read-only. `root` is the synthetic container whose
/// children become the result; plugins may edit it in place or replace it
/// wholesale.
pub struct TransformContext<'a> {
    pub ast: &'a MarkupTree,
    pub root: SemanticNode,
    pub options: &'a TransformOptions,
    pub metadata: Metadata,
}

impl<'a> TransformContext<'a> {
    pub fn new(ast: &'a MarkupTree, options: &'a TransformOptions) -> Self {
        Self {
            ast,
            root: SemanticNode::root(),
            options,
            metadata: Metadata::new(),
        }
    }

    /// Read a numeric note, if present and well-formed.
    pub fn count(&self, key: &str) -> Option<usize> {
        self.metadata.get(key).and_then(|v| v.parse().ok())
    }

    /// Consume the context, returning the top-level result nodes.
    pub fn into_nodes(self) -> Vec<SemanticNode> {
        match self.root {
            SemanticNode::Element(root) => root.children,
            text @ SemanticNode::Text(_) => vec![text],
        }
    }
}
