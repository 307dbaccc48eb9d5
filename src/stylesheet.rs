//! Stylesheet generation for `css-class` mode.
//!
//! In `css-class` mode elements carry a `<prefix>-<tag>` class instead of
//! their default inline style. This module emits the matching rules from the
//! tag table. It is meant to run at build time, not per transform.
//!
//! ```
//! let css = semtree::stylesheet::generate("app");
//! assert!(css.contains(".app-div {"));
//! assert!(css.contains("flex-direction: column;"));
//! ```

use crate::style::to_kebab_case;
use crate::tags::{self, MAPPED_TAGS};

/// Class name for a markup tag under `prefix`.
pub fn class_name(prefix: &str, tag: &str) -> String {
    if prefix.is_empty() {
        tag.to_string()
    } else {
        format!("{prefix}-{tag}")
    }
}

/// Generate rules for every mapped tag that has a default style.
///
/// Output is deterministic: rules follow the tag table order and
/// declarations are sorted by key.
pub fn generate(prefix: &str) -> String {
    let mut css = String::new();

    for tag in MAPPED_TAGS {
        let Some(mapping) = tags::lookup(tag) else {
            continue;
        };
        let style = mapping.style();
        if style.is_empty() {
            continue;
        }

        if !css.is_empty() {
            css.push('\n');
        }
        css.push_str(&format!(".{} {{\n", class_name(prefix, tag)));
        for (key, value) in &style {
            css.push_str(&format!("  {}: {};\n", to_kebab_case(key), value));
        }
        css.push_str("}\n");
    }

    css
}
