//! Capability phase: image sources and sizing.
//!
//! For `image` elements built from `img`, copies `src` and `alt` into props
//! and resolves `width`/`height` in priority order:
//! 1. the `width`/`height` attribute (bare numbers gain `px`)
//! 2. the value from the `style` attribute, read even when inline styles are
//!    being removed
//! 3. `100%` wide, `auto` high
//!
//! so an image always has usable dimensions.

use crate::error::BoxError;
use crate::executor::{DispatchKey, HandlerRegistry, Visit};
use crate::node::ElementNode;
use crate::plugin::{Phase, Plugin, TransformContext};
use crate::style::parse_style;
use crate::tags;

pub const FALLBACK_WIDTH: &str = "100%";
pub const FALLBACK_HEIGHT: &str = "auto";

#[derive(Debug, Clone, Copy, Default)]
pub struct MediaPlugin;

impl Plugin for MediaPlugin {
    fn name(&self) -> &str {
        "media"
    }

    fn phase(&self) -> Phase {
        Phase::Capability
    }

    fn order(&self) -> i32 {
        10
    }

    fn batched(&self) -> bool {
        true
    }

    fn register(
        &self,
        _ctx: &TransformContext<'_>,
        registry: &mut HandlerRegistry,
    ) -> Result<(), BoxError> {
        registry.on(DispatchKey::tag(tags::IMAGE), |node| {
            if let Some(el) = node.as_element_mut()
                && el.meta.source_tag.as_deref() == Some("img")
            {
                resolve_image(el);
            }
            Ok(Visit::Unchanged)
        });
        Ok(())
    }
}

fn resolve_image(el: &mut ElementNode) {
    for key in ["src", "alt"] {
        if let Some(value) = el.source_attr(key).map(str::to_owned) {
            el.props.set(key, value);
        }
    }

    let inline = el.source_attr("style").map(parse_style).unwrap_or_default();
    let width = dimension(el.source_attr("width"), inline.get("width"), FALLBACK_WIDTH);
    let height = dimension(el.source_attr("height"), inline.get("height"), FALLBACK_HEIGHT);
    el.props.style.insert("width".into(), width);
    el.props.style.insert("height".into(), height);
}

fn dimension(attr: Option<&str>, style: Option<&String>, fallback: &str) -> String {
    if let Some(value) = attr.map(str::trim).filter(|v| !v.is_empty()) {
        return with_unit(value);
    }
    if let Some(value) = style.map(|v| v.trim()).filter(|v| !v.is_empty()) {
        return value.to_string();
    }
    fallback.to_string()
}

/// `"300"` → `"300px"`; anything else is kept as written.
fn with_unit(value: &str) -> String {
    let numeric = value.bytes().any(|b| b.is_ascii_digit())
        && value.bytes().all(|b| b.is_ascii_digit() || b == b'.');
    if numeric {
        format!("{value}px")
    } else {
        value.to_string()
    }
}
