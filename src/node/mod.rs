//! Semantic node tree.
//!
//! The output vocabulary is host-agnostic: an element names a target tag
//! (conventionally `view`, `text` or `image`, but any string is allowed) and
//! carries props, a structural role and a capability descriptor. Text leaves
//! carry formatting marks instead of wrapper elements.
//!
//! ```
//! use semtree::node::{ElementNode, Marks, SemanticNode, TextNode};
//!
//! let node: SemanticNode = ElementNode::new("text")
//!     .with_child(TextNode::new("Hello ").into())
//!     .with_child(TextNode::new("world").with_marks(Marks::BOLD).into())
//!     .into();
//!
//! assert_eq!(node.text_content(), "Hello world");
//! ```

mod builder;
mod merge;

pub use merge::{merge_adjacent_text, merge_text_pair, merge_text_runs};

use std::collections::BTreeMap;

/// Style mapping with canonical (camelCase) keys.
pub type StyleMap = BTreeMap<String, String>;

/// A node in the semantic tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", rename_all = "camelCase")
)]
pub enum SemanticNode {
    Element(ElementNode),
    Text(TextNode),
}

/// Element variant.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct ElementNode {
    /// Target tag name, e.g. `view`.
    pub tag: String,
    pub props: Props,
    pub children: Vec<SemanticNode>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub role: Option<Role>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub capability: Option<Capability>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "ElementMeta::is_empty"))]
    pub meta: ElementMeta,
}

/// Element property bag.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct Props {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "StyleMap::is_empty"))]
    pub style: StyleMap,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub class_name: Option<String>,
    /// Arbitrary host props (`src`, `alt`, ...).
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub values: BTreeMap<String, String>,
}

impl Props {
    pub fn is_empty(&self) -> bool {
        self.style.is_empty() && self.class_name.is_none() && self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Append class names, keeping existing ones first.
    pub fn add_class(&mut self, class: &str) {
        let class = class.trim();
        if class.is_empty() {
            return;
        }
        self.class_name = Some(match self.class_name.take() {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        });
    }

    /// Shallow-merge `style` over the current style. Incoming keys win.
    pub fn merge_style(&mut self, style: StyleMap) {
        self.style.extend(style);
    }
}

/// Where an element came from in the markup.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct ElementMeta {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub source_tag: Option<String>,
    /// Raw, uninterpreted markup attributes.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "BTreeMap::is_empty"))]
    pub attributes: BTreeMap<String, String>,
}

impl ElementMeta {
    pub fn is_empty(&self) -> bool {
        self.source_tag.is_none() && self.attributes.is_empty()
    }
}

/// Structural role of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub enum Role {
    Block,
    Inline,
    TextContainer,
    Image,
    Table,
    Row,
    Cell,
}

impl Role {
    /// Block-level roles may not be flattened into running text.
    pub fn is_block_level(self) -> bool {
        matches!(
            self,
            Role::Block | Role::Table | Role::Row | Role::Cell | Role::TextContainer
        )
    }
}

/// Layout model requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub enum LayoutKind {
    #[default]
    Flex,
    Block,
    Inline,
    Table,
    TableRow,
    TableCell,
}

/// Structural constraints of an element, independent of visual style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct Capability {
    pub layout: LayoutKind,
    /// Void elements never have children.
    pub void: bool,
    /// The host renders children as running text.
    pub text_container: bool,
}

impl Capability {
    pub const fn new(layout: LayoutKind) -> Self {
        Self {
            layout,
            void: false,
            text_container: false,
        }
    }

    pub const fn void(layout: LayoutKind) -> Self {
        Self {
            layout,
            void: true,
            text_container: false,
        }
    }

    pub const fn text(layout: LayoutKind) -> Self {
        Self {
            layout,
            void: false,
            text_container: true,
        }
    }
}

/// Text variant.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct TextNode {
    pub content: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub marks: Option<Marks>,
    /// Inheritable style snapshot from ancestor elements.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub inherited_style: Option<StyleMap>,
    /// Class names of ancestor elements, outermost first.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub inherited_classes: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "TextOrigin::is_literal"))]
    pub origin: TextOrigin,
}

/// What produced a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub enum TextOrigin {
    /// Literal markup text.
    #[default]
    Literal,
    /// A line-break tag, not yet merged into its neighbours.
    LineBreak,
    /// A generated list marker.
    Marker,
}

impl TextOrigin {
    pub fn is_literal(&self) -> bool {
        *self == TextOrigin::Literal
    }
}

/// Inline formatting marks carried by text leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct Marks {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "is_false"))]
    pub bold: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "is_false"))]
    pub italic: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "is_false"))]
    pub underline: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "is_false"))]
    pub code: bool,
}

#[cfg(feature = "serde")]
fn is_false(b: &bool) -> bool {
    !*b
}

impl Marks {
    pub const NONE: Marks = Marks {
        bold: false,
        italic: false,
        underline: false,
        code: false,
    };
    pub const BOLD: Marks = Marks {
        bold: true,
        ..Marks::NONE
    };
    pub const ITALIC: Marks = Marks {
        italic: true,
        ..Marks::NONE
    };
    pub const UNDERLINE: Marks = Marks {
        underline: true,
        ..Marks::NONE
    };
    pub const CODE: Marks = Marks {
        code: true,
        ..Marks::NONE
    };

    pub fn is_empty(&self) -> bool {
        *self == Marks::NONE
    }

    /// Union of two mark sets.
    pub fn union(self, other: Marks) -> Marks {
        Marks {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            code: self.code || other.code,
        }
    }
}

impl SemanticNode {
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            SemanticNode::Element(e) => Some(e),
            SemanticNode::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            SemanticNode::Element(e) => Some(e),
            SemanticNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            SemanticNode::Text(t) => Some(t),
            SemanticNode::Element(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextNode> {
        match self {
            SemanticNode::Text(t) => Some(t),
            SemanticNode::Element(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, SemanticNode::Text(_))
    }

    /// Target tag for elements.
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|e| e.tag.as_str())
    }

    /// Markup tag an element was built from.
    pub fn source_tag(&self) -> Option<&str> {
        self.as_element().and_then(|e| e.meta.source_tag.as_deref())
    }

    /// Children of an element; empty for text.
    pub fn children(&self) -> &[SemanticNode] {
        match self {
            SemanticNode::Element(e) => &e.children,
            SemanticNode::Text(_) => &[],
        }
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            SemanticNode::Text(t) => out.push_str(&t.content),
            SemanticNode::Element(e) => {
                for child in &e.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(SemanticNode::count).sum::<usize>()
    }
}

impl From<ElementNode> for SemanticNode {
    fn from(e: ElementNode) -> Self {
        SemanticNode::Element(e)
    }
}

impl From<TextNode> for SemanticNode {
    fn from(t: TextNode) -> Self {
        SemanticNode::Text(t)
    }
}
