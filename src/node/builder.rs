//! Node construction.
//!
//! Constructors set only what they are given; everything else stays at its
//! empty default so serialized nodes carry no noise.

use std::collections::BTreeMap;

use super::{
    Capability, ElementMeta, ElementNode, Marks, Props, Role, SemanticNode, StyleMap, TextNode,
    TextOrigin,
};

impl ElementNode {
    /// Create an element with the given target tag and nothing else.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capability = Some(capability);
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_style(mut self, style: StyleMap) -> Self {
        self.props.style = style;
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.props.add_class(class);
        self
    }

    /// Record the originating markup tag and its raw attributes.
    pub fn with_source(mut self, tag: impl Into<String>, attributes: BTreeMap<String, String>) -> Self {
        self.meta = ElementMeta {
            source_tag: Some(tag.into()),
            attributes,
        };
        self
    }

    pub fn with_child(mut self, child: SemanticNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<SemanticNode>) -> Self {
        self.children = children;
        self
    }

    /// Raw markup attribute recorded at construction.
    pub fn source_attr(&self, name: &str) -> Option<&str> {
        self.meta.attributes.get(name).map(String::as_str)
    }

    pub fn is_void(&self) -> bool {
        self.capability.is_some_and(|c| c.void)
    }
}

impl TextNode {
    /// Create literal text without marks.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Text produced by a line-break tag.
    pub fn line_break(marks: Marks) -> Self {
        Self {
            origin: TextOrigin::LineBreak,
            ..Self::new("\n").with_marks(marks)
        }
    }

    /// Generated list marker.
    pub fn marker(marker: impl Into<String>) -> Self {
        Self {
            origin: TextOrigin::Marker,
            ..Self::new(marker)
        }
    }

    /// Attach marks. An empty mark set leaves the bag absent so that
    /// "no marks" has exactly one representation.
    pub fn with_marks(mut self, marks: Marks) -> Self {
        self.marks = (!marks.is_empty()).then_some(marks);
        self
    }

    pub fn marks(&self) -> Marks {
        self.marks.unwrap_or_default()
    }

    pub fn is_line_break(&self) -> bool {
        self.origin == TextOrigin::LineBreak
    }
}

impl SemanticNode {
    /// Synthetic container used as the pipeline root. Never returned to callers.
    pub fn root() -> Self {
        ElementNode::new("root").into()
    }

    pub fn text(content: impl Into<String>) -> Self {
        TextNode::new(content).into()
    }
}
