//! Normalize phase: survey the markup before anything is built.
//!
//! Records element counts in the context metadata for later plugins. The
//! counts describe the source markup only; structure plugins may still add
//! lists or tables, so nothing should skip work on a zero count.

use crate::error::BoxError;
use crate::markup::{MarkupKind, walk};
use crate::plugin::{Phase, Plugin, TransformContext};
use crate::tags;

use super::{META_DROPPED, META_LISTS, META_TABLES};

#[derive(Debug, Clone, Copy, Default)]
pub struct InspectPlugin;

impl Plugin for InspectPlugin {
    fn name(&self) -> &str {
        "inspect"
    }

    fn phase(&self) -> Phase {
        Phase::Normalize
    }

    fn apply(&self, ctx: &mut TransformContext<'_>) -> Result<(), BoxError> {
        let mut lists = 0usize;
        let mut tables = 0usize;
        let mut dropped = 0usize;

        let start = ctx.ast.content_root();
        walk(ctx.ast, start, |node, id, _| {
            if id == start {
                return;
            }
            let Some(name) = node.name() else {
                return;
            };
            match node.kind() {
                MarkupKind::Script | MarkupKind::Style => dropped += 1,
                _ if tags::is_list(name) => lists += 1,
                _ if name == "table" => tables += 1,
                _ if tags::lookup(name).is_none() => dropped += 1,
                _ => {}
            }
        });

        tracing::debug!(lists, tables, dropped, "markup surveyed");
        ctx.metadata.insert(META_LISTS.into(), lists.to_string());
        ctx.metadata.insert(META_TABLES.into(), tables.to_string());
        ctx.metadata.insert(META_DROPPED.into(), dropped.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TransformOptions;
    use crate::markup::parse_markup;

    fn survey(markup: &str) -> (Option<usize>, Option<usize>, Option<usize>) {
        let ast = parse_markup(markup);
        let options = TransformOptions::default();
        let mut ctx = TransformContext::new(&ast, &options);
        InspectPlugin.apply(&mut ctx).unwrap();
        (
            ctx.count(META_LISTS),
            ctx.count(META_TABLES),
            ctx.count(META_DROPPED),
        )
    }

    #[test]
    fn test_counts() {
        let counts = survey(
            "<ul><li>a<ol><li>b</li></ol></li></ul>\
             <table><tr><td>x</td></tr></table>\
             <div><iframe></iframe><form><input></form></div>",
        );
        assert_eq!(counts, (Some(2), Some(1), Some(3)));
    }

    #[test]
    fn test_plain_document() {
        assert_eq!(survey("<p>hello</p>"), (Some(0), Some(0), Some(0)));
    }
}
