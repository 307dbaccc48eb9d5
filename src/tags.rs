//! Maps markup tags to semantic nodes.
//!
//! Every tag the pipeline understands appears here with its target tag,
//! structural role, capability and default style. Tags that are not listed
//! (scripts, embeds, form controls, document metadata) are dropped together
//! with their content.

use crate::node::{Capability, LayoutKind, Marks, Role, StyleMap};

/// How a markup tag becomes a semantic element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMapping {
    /// Target tag name in the output tree.
    pub target: &'static str,
    pub role: Role,
    pub capability: Capability,
    /// Default style as canonical key/value pairs.
    pub default_style: &'static [(&'static str, &'static str)],
}

impl TagMapping {
    const fn new(
        target: &'static str,
        role: Role,
        capability: Capability,
        default_style: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            target,
            role,
            capability,
            default_style,
        }
    }

    /// Default style as an owned map.
    pub fn style(&self) -> StyleMap {
        self.default_style
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

pub const VIEW: &str = "view";
pub const TEXT: &str = "text";
pub const IMAGE: &str = "image";

const BLOCK: Capability = Capability::new(LayoutKind::Flex);
const TEXT_BLOCK: Capability = Capability::text(LayoutKind::Block);
const TEXT_INLINE: Capability = Capability::text(LayoutKind::Inline);

const CONTAINER_STYLE: &[(&str, &str)] = &[("display", "flex"), ("flexDirection", "column")];
const PARAGRAPH_STYLE: &[(&str, &str)] = &[("marginBottom", "8px"), ("marginTop", "8px")];
const BLOCKQUOTE_STYLE: &[(&str, &str)] = &[
    ("borderLeftColor", "#d0d0d0"),
    ("borderLeftStyle", "solid"),
    ("borderLeftWidth", "4px"),
    ("display", "flex"),
    ("flexDirection", "column"),
    ("marginBottom", "8px"),
    ("marginTop", "8px"),
    ("paddingLeft", "12px"),
];
const PRE_STYLE: &[(&str, &str)] = &[
    ("backgroundColor", "#f5f5f5"),
    ("fontFamily", "monospace"),
    ("padding", "8px"),
    ("whiteSpace", "pre"),
];
const H1_STYLE: &[(&str, &str)] = &[
    ("fontSize", "32px"),
    ("fontWeight", "bold"),
    ("marginBottom", "12px"),
    ("marginTop", "12px"),
];
const H2_STYLE: &[(&str, &str)] = &[
    ("fontSize", "24px"),
    ("fontWeight", "bold"),
    ("marginBottom", "10px"),
    ("marginTop", "10px"),
];
const H3_STYLE: &[(&str, &str)] = &[
    ("fontSize", "20px"),
    ("fontWeight", "bold"),
    ("marginBottom", "8px"),
    ("marginTop", "8px"),
];
const H4_STYLE: &[(&str, &str)] = &[
    ("fontSize", "18px"),
    ("fontWeight", "bold"),
    ("marginBottom", "8px"),
    ("marginTop", "8px"),
];
const H5_STYLE: &[(&str, &str)] = &[
    ("fontSize", "16px"),
    ("fontWeight", "bold"),
    ("marginBottom", "6px"),
    ("marginTop", "6px"),
];
const H6_STYLE: &[(&str, &str)] = &[
    ("fontSize", "14px"),
    ("fontWeight", "bold"),
    ("marginBottom", "6px"),
    ("marginTop", "6px"),
];
const LIST_STYLE: &[(&str, &str)] = &[
    ("display", "flex"),
    ("flexDirection", "column"),
    ("marginBottom", "8px"),
    ("marginTop", "8px"),
    ("paddingLeft", "20px"),
];
const LIST_ITEM_STYLE: &[(&str, &str)] = &[("marginBottom", "4px")];
const LINK_STYLE: &[(&str, &str)] = &[("color", "#0066cc"), ("textDecorationLine", "underline")];
const SMALL_STYLE: &[(&str, &str)] = &[("fontSize", "12px")];
const SCRIPT_STYLE: &[(&str, &str)] = &[("fontSize", "10px")];
const MARK_STYLE: &[(&str, &str)] = &[("backgroundColor", "#fff3a0")];
const STRIKE_STYLE: &[(&str, &str)] = &[("textDecorationLine", "line-through")];
const CITE_STYLE: &[(&str, &str)] = &[("fontStyle", "italic")];
const RULE_STYLE: &[(&str, &str)] = &[
    ("backgroundColor", "#e0e0e0"),
    ("height", "1px"),
    ("marginBottom", "8px"),
    ("marginTop", "8px"),
];
const TABLE_STYLE: &[(&str, &str)] = &[
    ("borderColor", "#d0d0d0"),
    ("borderWidth", "1px"),
    ("display", "flex"),
    ("flexDirection", "column"),
];
const ROW_STYLE: &[(&str, &str)] = &[("display", "flex"), ("flexDirection", "row")];
const CELL_STYLE: &[(&str, &str)] = &[("flex", "1"), ("padding", "4px")];
const HEADER_CELL_STYLE: &[(&str, &str)] = &[("flex", "1"), ("fontWeight", "bold"), ("padding", "4px")];
const TERM_STYLE: &[(&str, &str)] = &[("fontWeight", "bold")];
const DESCRIPTION_STYLE: &[(&str, &str)] = &[("marginLeft", "16px")];
const CAPTION_STYLE: &[(&str, &str)] = &[("fontSize", "12px"), ("textAlign", "center")];

/// Every tag with a mapping, in stylesheet order.
pub const MAPPED_TAGS: &[&str] = &[
    // Containers
    "div", "section", "article", "header", "footer", "main", "nav", "aside", "address",
    "figure", "details", "summary", "blockquote", "hr",
    // Text blocks
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "figcaption", "caption",
    // Lists
    "ul", "ol", "li", "dl", "dt", "dd",
    // Inline
    "span", "a", "small", "sub", "sup", "mark", "s", "strike", "del", "abbr", "cite", "q",
    "time", "label", "br",
    // Formatting (unwrapped into marks)
    "b", "strong", "i", "em", "u", "ins", "code", "kbd", "samp", "tt",
    // Media
    "img",
    // Tables
    "table", "thead", "tbody", "tfoot", "tr", "td", "th",
];

/// Look up the mapping for a lowercase tag name.
pub fn lookup(tag: &str) -> Option<TagMapping> {
    let mapping = match tag {
        // Block containers
        "div" | "section" | "article" | "header" | "footer" | "main" | "nav" | "aside"
        | "address" | "figure" | "details" | "summary" => {
            TagMapping::new(VIEW, Role::Block, BLOCK, CONTAINER_STYLE)
        }
        "blockquote" => TagMapping::new(VIEW, Role::Block, BLOCK, BLOCKQUOTE_STYLE),
        "hr" => TagMapping::new(
            VIEW,
            Role::Block,
            Capability::void(LayoutKind::Block),
            RULE_STYLE,
        ),

        // Block-level text containers
        "p" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, PARAGRAPH_STYLE),
        "h1" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, H1_STYLE),
        "h2" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, H2_STYLE),
        "h3" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, H3_STYLE),
        "h4" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, H4_STYLE),
        "h5" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, H5_STYLE),
        "h6" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, H6_STYLE),
        "pre" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, PRE_STYLE),
        "figcaption" | "caption" => {
            TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, CAPTION_STYLE)
        }

        // Lists
        "ul" | "ol" | "dl" => TagMapping::new(VIEW, Role::Block, BLOCK, LIST_STYLE),
        "li" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, LIST_ITEM_STYLE),
        "dt" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, TERM_STYLE),
        "dd" => TagMapping::new(TEXT, Role::TextContainer, TEXT_BLOCK, DESCRIPTION_STYLE),

        // Inline text
        "span" | "abbr" | "q" | "time" | "label" => {
            TagMapping::new(TEXT, Role::Inline, TEXT_INLINE, &[])
        }
        "a" => TagMapping::new(TEXT, Role::Inline, TEXT_INLINE, LINK_STYLE),
        "small" => TagMapping::new(TEXT, Role::Inline, TEXT_INLINE, SMALL_STYLE),
        "sub" | "sup" => TagMapping::new(TEXT, Role::Inline, TEXT_INLINE, SCRIPT_STYLE),
        "mark" => TagMapping::new(TEXT, Role::Inline, TEXT_INLINE, MARK_STYLE),
        "s" | "strike" | "del" => TagMapping::new(TEXT, Role::Inline, TEXT_INLINE, STRIKE_STYLE),
        "cite" => TagMapping::new(TEXT, Role::Inline, TEXT_INLINE, CITE_STYLE),
        "br" => TagMapping::new(
            TEXT,
            Role::Inline,
            Capability::void(LayoutKind::Inline),
            &[],
        ),

        // Formatting tags; their styling travels as marks
        "b" | "strong" | "i" | "em" | "u" | "ins" | "code" | "kbd" | "samp" | "tt" => {
            TagMapping::new(TEXT, Role::Inline, TEXT_INLINE, &[])
        }

        // Media
        "img" => TagMapping::new(
            IMAGE,
            Role::Image,
            Capability::void(LayoutKind::Inline),
            &[],
        ),

        // Tables
        "table" => TagMapping::new(
            VIEW,
            Role::Table,
            Capability::new(LayoutKind::Table),
            TABLE_STYLE,
        ),
        "thead" | "tbody" | "tfoot" => TagMapping::new(
            VIEW,
            Role::Block,
            Capability::new(LayoutKind::Block),
            &[],
        ),
        "tr" => TagMapping::new(
            VIEW,
            Role::Row,
            Capability::new(LayoutKind::TableRow),
            ROW_STYLE,
        ),
        "td" => TagMapping::new(
            VIEW,
            Role::Cell,
            Capability::new(LayoutKind::TableCell),
            CELL_STYLE,
        ),
        "th" => TagMapping::new(
            VIEW,
            Role::Cell,
            Capability::new(LayoutKind::TableCell),
            HEADER_CELL_STYLE,
        ),

        _ => return None,
    };
    Some(mapping)
}

/// Marks contributed by an inline-formatting tag.
pub fn formatting_mark(tag: &str) -> Option<Marks> {
    match tag {
        "b" | "strong" => Some(Marks::BOLD),
        "i" | "em" => Some(Marks::ITALIC),
        "u" | "ins" => Some(Marks::UNDERLINE),
        "code" | "kbd" | "samp" | "tt" => Some(Marks::CODE),
        _ => None,
    }
}

pub fn is_line_break(tag: &str) -> bool {
    tag == "br"
}

pub fn is_list(tag: &str) -> bool {
    matches!(tag, "ul" | "ol")
}

pub fn is_table_section(tag: &str) -> bool {
    matches!(tag, "thead" | "tbody" | "tfoot")
}

/// Distinct target tags produced by the table.
pub fn target_tags() -> &'static [&'static str] {
    &[VIEW, TEXT, IMAGE]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_tag_is_mapped() {
        for tag in MAPPED_TAGS {
            assert!(lookup(tag).is_some(), "{tag} should be mapped");
        }
    }

    #[test]
    fn test_unsafe_tags_are_unmapped() {
        for tag in [
            "script", "style", "iframe", "object", "embed", "form", "input", "template",
            "noscript", "svg", "video", "audio", "head", "title", "meta", "link",
        ] {
            assert!(lookup(tag).is_none(), "{tag} should not be mapped");
        }
    }

    #[test]
    fn test_targets_are_known() {
        for tag in MAPPED_TAGS {
            let mapping = lookup(tag).unwrap();
            assert!(target_tags().contains(&mapping.target));
        }
    }

    #[test]
    fn test_container_mapping() {
        let div = lookup("div").unwrap();
        assert_eq!(div.target, VIEW);
        assert_eq!(div.role, Role::Block);
        assert!(!div.capability.void);
        assert_eq!(div.style()["display"], "flex");
    }

    #[test]
    fn test_void_elements() {
        assert!(lookup("img").unwrap().capability.void);
        assert!(lookup("hr").unwrap().capability.void);
        assert!(lookup("br").unwrap().capability.void);
        assert!(!lookup("p").unwrap().capability.void);
    }

    #[test]
    fn test_formatting_marks() {
        assert_eq!(formatting_mark("strong"), Some(Marks::BOLD));
        assert_eq!(formatting_mark("em"), Some(Marks::ITALIC));
        assert_eq!(formatting_mark("u"), Some(Marks::UNDERLINE));
        assert_eq!(formatting_mark("code"), Some(Marks::CODE));
        assert_eq!(formatting_mark("span"), None);
    }
}
