//! Markup parsing.
//!
//! Input markup is parsed by html5ever into an arena-allocated
//! [`MarkupTree`]. Parsing never fails: unclosed and mismatched tags are
//! recovered the way browsers recover them.

mod arena;
mod tree_sink;
mod walk;

pub use arena::{Attribute, ChildrenIter, MarkupData, MarkupKind, MarkupNode, MarkupNodeId, MarkupTree};
pub use walk::{find, find_by_tag, walk};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::MarkupSink;

/// Parse markup text into a [`MarkupTree`].
///
/// Fragments are accepted; the tree builder wraps them in `html > body`
/// (see [`MarkupTree::content_root`]). Scripts and styles in fragment
/// position are hoisted into `head` by the tree builder.
pub fn parse_markup(markup: &str) -> MarkupTree {
    let sink = MarkupSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(markup.as_bytes())
        .into_tree()
}
