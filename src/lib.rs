//! # semtree
//!
//! Turns HTML markup into a host-agnostic tree of semantic nodes that any
//! native renderer can consume without understanding markup, CSS strings or
//! formatting tags.
//!
//! ## Pipeline
//!
//! Markup is parsed with html5ever, then a list of [plugins](plugin::Plugin)
//! runs in four fixed phases:
//!
//! 1. **normalize** surveys the markup tree
//! 2. **structure** builds the semantic tree (`block`) and reshapes it (`list`, `table`)
//! 3. **capability** enriches nodes from their recorded attributes (`style`,
//!    `media`, `layout`, `inherit`), batched into a single tree walk
//! 4. **finalize** runs checks such as the optional `validate` plugin
//!
//! ## Quick Start
//!
//! ```
//! use semtree::{transform, TransformOptions};
//! use semtree::node::SemanticNode;
//!
//! let nodes = transform(
//!     r#"<div style="color: red; font-size: 16px;">Styled Text</div>"#,
//!     &TransformOptions::default(),
//! )
//! .unwrap();
//!
//! let SemanticNode::Element(div) = &nodes[0] else { unreachable!() };
//! assert_eq!(div.tag, "view");
//! assert_eq!(div.props.style["display"], "flex");
//! assert_eq!(div.props.style["color"], "red");
//! assert_eq!(div.props.style["fontSize"], "16px");
//! assert_eq!(nodes[0].text_content(), "Styled Text");
//! ```
//!
//! ## Custom plugins
//!
//! Plugins can be disabled, replaced in place, or added:
//!
//! ```
//! use std::sync::Arc;
//! use semtree::{transform, TransformOptions};
//! use semtree::executor::{DispatchKey, Visit};
//! use semtree::plugin::FnPlugin;
//!
//! let shout = FnPlugin::handlers("shout", "capability", |_, registry| {
//!     registry.on(DispatchKey::Text, |node| {
//!         if let Some(text) = node.as_text_mut() {
//!             text.content = text.content.to_uppercase();
//!         }
//!         Ok(Visit::Unchanged)
//!     });
//!     Ok(())
//! })
//! .unwrap();
//!
//! let options = TransformOptions::default()
//!     .with_disabled("list")
//!     .with_extra(Arc::new(shout));
//! let nodes = transform("<ul><li>quiet</li></ul>", &options).unwrap();
//! assert_eq!(nodes[0].text_content(), "QUIET");
//! ```

pub mod engine;
pub mod error;
pub mod executor;
pub mod markup;
pub mod node;
pub mod plugin;
pub mod plugins;
pub mod style;
pub mod stylesheet;
pub mod tags;
pub mod validate;
pub(crate) mod util;

pub use engine::{StyleMode, TransformOptions, Transformer};
pub use error::{ConfigError, Error, PluginError, Result, TransformError, ValidationError};
pub use node::{Capability, ElementNode, LayoutKind, Marks, Role, SemanticNode, TextNode};
pub use plugin::{FnPlugin, Phase, Plugin, PluginConfig};

/// Recursion ceiling for every depth-first walk over markup or semantic trees.
pub const MAX_DEPTH: usize = 512;

/// Transform markup with the built-in plugins.
pub fn transform(markup: &str, options: &TransformOptions) -> Result<Vec<SemanticNode>> {
    Transformer::new().transform(markup, options)
}

/// Transform markup bytes, detecting their encoding (BOM, `<meta charset>`,
/// UTF-8, then Windows-1252).
pub fn transform_bytes(bytes: &[u8], options: &TransformOptions) -> Result<Vec<SemanticNode>> {
    Transformer::new().transform_bytes(bytes, options)
}
