//! Capability phase: capability defaults.
//!
//! Every element leaves this plugin with a capability descriptor; elements
//! without one get a flexible, non-void default. Void elements that somehow
//! gained children (a replaced plugin, a hand-built tree) are emptied.

use crate::error::BoxError;
use crate::executor::{DispatchKey, HandlerRegistry, Visit};
use crate::node::Capability;
use crate::plugin::{Phase, Plugin, TransformContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutPlugin;

impl Plugin for LayoutPlugin {
    fn name(&self) -> &str {
        "layout"
    }

    fn phase(&self) -> Phase {
        Phase::Capability
    }

    fn order(&self) -> i32 {
        20
    }

    fn batched(&self) -> bool {
        true
    }

    fn register(
        &self,
        _ctx: &TransformContext<'_>,
        registry: &mut HandlerRegistry,
    ) -> Result<(), BoxError> {
        registry.on(DispatchKey::AnyElement, |node| {
            let Some(el) = node.as_element_mut() else {
                return Ok(Visit::Unchanged);
            };
            let capability = *el.capability.get_or_insert_with(Capability::default);
            if capability.void && !el.children.is_empty() {
                tracing::warn!(
                    tag = %el.tag,
                    children = el.children.len(),
                    "removing children of void element"
                );
                el.children.clear();
            }
            Ok(Visit::Unchanged)
        });
        Ok(())
    }
}
