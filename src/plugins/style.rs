//! Capability phase: inline style and class attributes.
//!
//! The raw `style` attribute is parsed and merged over the element's default
//! style (attribute wins). The raw `class` attribute is appended to any class
//! name already present. Either step is skipped when the matching removal
//! option is set.

use crate::error::BoxError;
use crate::executor::{DispatchKey, HandlerRegistry, Visit};
use crate::plugin::{Phase, Plugin, TransformContext};
use crate::style::parse_style;

#[derive(Debug, Clone, Copy, Default)]
pub struct StylePlugin;

impl Plugin for StylePlugin {
    fn name(&self) -> &str {
        "style"
    }

    fn phase(&self) -> Phase {
        Phase::Capability
    }

    fn batched(&self) -> bool {
        true
    }

    fn register(
        &self,
        ctx: &TransformContext<'_>,
        registry: &mut HandlerRegistry,
    ) -> Result<(), BoxError> {
        let keep_style = !ctx.options.remove_all_style;
        let keep_class = !ctx.options.remove_all_class;
        if !keep_style && !keep_class {
            return Ok(());
        }

        registry.on(DispatchKey::AnyElement, move |node| {
            let Some(el) = node.as_element_mut() else {
                return Ok(Visit::Unchanged);
            };
            if keep_style && let Some(style) = el.source_attr("style").map(parse_style) {
                el.props.merge_style(style);
            }
            if keep_class && let Some(class) = el.source_attr("class").map(str::to_owned) {
                el.props.add_class(&class);
            }
            Ok(Visit::Unchanged)
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{StyleMode, TransformOptions};
    use crate::markup::parse_markup;
    use crate::node::{ElementNode, SemanticNode};
    use crate::plugins::BlockPlugin;

    fn run(markup: &str, options: &TransformOptions) -> ElementNode {
        let ast = parse_markup(markup);
        let mut ctx = TransformContext::new(&ast, options);
        BlockPlugin.apply(&mut ctx).unwrap();
        StylePlugin.apply(&mut ctx).unwrap();
        match ctx.into_nodes().into_iter().next() {
            Some(SemanticNode::Element(el)) => el,
            other => panic!("expected an element, got {other:?}"),
        }
    }

    #[test]
    fn test_style_attribute_wins_over_default() {
        let div = run(
            r#"<div style="flex-direction: row; color: red">x</div>"#,
            &TransformOptions::default(),
        );
        assert_eq!(div.props.style["display"], "flex");
        assert_eq!(div.props.style["flexDirection"], "row");
        assert_eq!(div.props.style["color"], "red");
    }

    #[test]
    fn test_class_removed_by_default() {
        let div = run(r#"<div class="card">x</div>"#, &TransformOptions::default());
        assert_eq!(div.props.class_name, None);
    }

    #[test]
    fn test_class_kept_after_generated_class() {
        let options = TransformOptions::default()
            .with_remove_all_class(false)
            .with_style_mode(StyleMode::CssClass);
        let div = run(r#"<div class="card wide">x</div>"#, &options);
        assert_eq!(div.props.class_name.as_deref(), Some("semtree-div card wide"));
    }

    #[test]
    fn test_remove_all_style_keeps_defaults() {
        let options = TransformOptions::default().with_remove_all_style(true);
        let div = run(r#"<div style="color: red">x</div>"#, &options);
        assert!(!div.props.style.contains_key("color"));
        assert_eq!(div.props.style["display"], "flex");
    }
}
