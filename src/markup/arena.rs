//! Arena-allocated markup tree.
//!
//! html5ever parses into this arena through [`super::tree_sink::MarkupSink`].
//! Nodes live in one contiguous vector and link to each other by index, so
//! the tree is cheap to build and walk, and no node is shared across parses.

use std::collections::BTreeMap;

use html5ever::QualName;

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkupNodeId(pub u32);

impl MarkupNodeId {
    /// Sentinel value for no node.
    pub const NONE: MarkupNodeId = MarkupNodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Coarse node type, as seen by plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupKind {
    Root,
    Text,
    Tag,
    Script,
    Style,
    Comment,
    Doctype,
}

/// Raw markup attribute. Only the local name is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum MarkupData {
    /// Document root.
    Root,
    /// Text content.
    Text(String),
    /// Regular element.
    Tag { name: QualName, attrs: Vec<Attribute> },
    /// `<script>` element; its text children are never interpreted.
    Script { name: QualName, attrs: Vec<Attribute> },
    /// `<style>` element.
    Style { name: QualName, attrs: Vec<Attribute> },
    /// Comment (kept so the tree builder can place it, ignored afterwards).
    Comment(String),
    /// Document type declaration.
    Doctype,
}

/// A node in the arena.
#[derive(Debug)]
pub struct MarkupNode {
    pub data: MarkupData,
    pub parent: MarkupNodeId,
    pub first_child: MarkupNodeId,
    pub last_child: MarkupNodeId,
    pub prev_sibling: MarkupNodeId,
    pub next_sibling: MarkupNodeId,
}

impl MarkupNode {
    fn new(data: MarkupData) -> Self {
        Self {
            data,
            parent: MarkupNodeId::NONE,
            first_child: MarkupNodeId::NONE,
            last_child: MarkupNodeId::NONE,
            prev_sibling: MarkupNodeId::NONE,
            next_sibling: MarkupNodeId::NONE,
        }
    }

    pub fn kind(&self) -> MarkupKind {
        match self.data {
            MarkupData::Root => MarkupKind::Root,
            MarkupData::Text(_) => MarkupKind::Text,
            MarkupData::Tag { .. } => MarkupKind::Tag,
            MarkupData::Script { .. } => MarkupKind::Script,
            MarkupData::Style { .. } => MarkupKind::Style,
            MarkupData::Comment(_) => MarkupKind::Comment,
            MarkupData::Doctype => MarkupKind::Doctype,
        }
    }

    /// Qualified name for any element-like node.
    pub fn qual_name(&self) -> Option<&QualName> {
        match &self.data {
            MarkupData::Tag { name, .. }
            | MarkupData::Script { name, .. }
            | MarkupData::Style { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Lowercase local tag name for element-like nodes.
    pub fn name(&self) -> Option<&str> {
        self.qual_name().map(|n| n.local.as_ref())
    }

    pub fn attrs(&self) -> &[Attribute] {
        match &self.data {
            MarkupData::Tag { attrs, .. }
            | MarkupData::Script { attrs, .. }
            | MarkupData::Style { attrs, .. } => attrs,
            _ => &[],
        }
    }

    pub fn attrs_mut(&mut self) -> Option<&mut Vec<Attribute>> {
        match &mut self.data {
            MarkupData::Tag { attrs, .. }
            | MarkupData::Script { attrs, .. }
            | MarkupData::Style { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs()
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Attributes as an ordered map. Later duplicates never occur: the tree
    /// builder keeps the first occurrence.
    pub fn attr_map(&self) -> BTreeMap<String, String> {
        self.attrs()
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect()
    }

    pub fn text(&self) -> Option<&str> {
        match &self.data {
            MarkupData::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Arena-based markup tree.
pub struct MarkupTree {
    nodes: Vec<MarkupNode>,
    root: MarkupNodeId,
}

impl MarkupTree {
    /// Create a tree holding only the root node.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: MarkupNodeId::NONE,
        };
        tree.root = tree.alloc(MarkupNode::new(MarkupData::Root));
        tree
    }

    fn alloc(&mut self, node: MarkupNode) -> MarkupNodeId {
        let id = MarkupNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn root(&self) -> MarkupNodeId {
        self.root
    }

    /// The node whose children are the author's content.
    ///
    /// The HTML tree builder wraps fragments in `html > body`; this returns
    /// the `body` element when present and the root otherwise.
    pub fn content_root(&self) -> MarkupNodeId {
        let html = self
            .children(self.root)
            .find(|&id| self.get(id).and_then(|n| n.name()) == Some("html"));
        html.and_then(|html| {
            self.children(html)
                .find(|&id| self.get(id).and_then(|n| n.name()) == Some("body"))
        })
        .unwrap_or(self.root)
    }

    pub fn get(&self, id: MarkupNodeId) -> Option<&MarkupNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: MarkupNodeId) -> Option<&mut MarkupNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create an element node, classifying script and style elements.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> MarkupNodeId {
        let data = match name.local.as_ref() {
            "script" => MarkupData::Script { name, attrs },
            "style" => MarkupData::Style { name, attrs },
            _ => MarkupData::Tag { name, attrs },
        };
        self.alloc(MarkupNode::new(data))
    }

    pub fn create_text(&mut self, text: String) -> MarkupNodeId {
        self.alloc(MarkupNode::new(MarkupData::Text(text)))
    }

    pub fn create_comment(&mut self, text: String) -> MarkupNodeId {
        self.alloc(MarkupNode::new(MarkupData::Comment(text)))
    }

    pub fn create_doctype(&mut self) -> MarkupNodeId {
        self.alloc(MarkupNode::new(MarkupData::Doctype))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: MarkupNodeId, child: MarkupNodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(MarkupNodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = MarkupNodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: MarkupNodeId, new_node: MarkupNodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, id: MarkupNodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = MarkupNodeId::NONE;
            node.prev_sibling = MarkupNodeId::NONE;
            node.next_sibling = MarkupNodeId::NONE;
        }
    }

    /// Append text to the last child if it is a text node, or create one.
    pub fn append_text(&mut self, parent: MarkupNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(MarkupNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let MarkupData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds only its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: MarkupNodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(MarkupNodeId::NONE);
        ChildrenIter {
            tree: self,
            current: first,
        }
    }
}

impl Default for MarkupTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    tree: &'a MarkupTree,
    current: MarkupNodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = MarkupNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .tree
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(MarkupNodeId::NONE);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use html5ever::{LocalName, ns};

    use super::*;

    fn qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    #[test]
    fn test_append_children() {
        let mut tree = MarkupTree::new();

        let parent = tree.create_element(qname("div"), vec![]);
        let child1 = tree.create_element(qname("p"), vec![]);
        let child2 = tree.create_element(qname("p"), vec![]);

        tree.append(tree.root(), parent);
        tree.append(parent, child1);
        tree.append(parent, child2);

        let children: Vec<_> = tree.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
    }

    #[test]
    fn test_script_and_style_are_classified() {
        let mut tree = MarkupTree::new();
        let script = tree.create_element(qname("script"), vec![]);
        let style = tree.create_element(qname("style"), vec![]);
        let div = tree.create_element(qname("div"), vec![]);

        assert_eq!(tree.get(script).unwrap().kind(), MarkupKind::Script);
        assert_eq!(tree.get(style).unwrap().kind(), MarkupKind::Style);
        assert_eq!(tree.get(div).unwrap().kind(), MarkupKind::Tag);
    }

    #[test]
    fn test_text_coalescing() {
        let mut tree = MarkupTree::new();
        let p = tree.create_element(qname("p"), vec![]);
        tree.append(tree.root(), p);

        tree.append_text(p, "Hello, ");
        tree.append_text(p, "World!");

        let children: Vec<_> = tree.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(tree.get(children[0]).unwrap().text(), Some("Hello, World!"));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut tree = MarkupTree::new();
        let a = tree.create_text("a".into());
        let b = tree.create_element(qname("br"), vec![]);
        let c = tree.create_text("c".into());
        let root = tree.root();
        tree.append(root, a);
        tree.append(root, b);
        tree.append(root, c);

        tree.detach(b);

        let children: Vec<_> = tree.children(root).collect();
        assert_eq!(children, vec![a, c]);
        assert_eq!(tree.get(c).unwrap().prev_sibling, a);
    }

    #[test]
    fn test_attr_lookup() {
        let mut tree = MarkupTree::new();
        let img = tree.create_element(
            qname("img"),
            vec![Attribute {
                name: "src".into(),
                value: "a.jpg".into(),
            }],
        );
        let node = tree.get(img).unwrap();
        assert_eq!(node.attr("src"), Some("a.jpg"));
        assert_eq!(node.attr("alt"), None);
        assert_eq!(node.attr_map().len(), 1);
    }
}
