//! Finalize phase: structural validation.
//!
//! Off by default. Enable it with
//! [`TransformOptions::with_validation`](crate::TransformOptions::with_validation)
//! or by adding [`ValidatePlugin`] to the extra plugins.

use crate::error::BoxError;
use crate::plugin::{Phase, Plugin, TransformContext};
use crate::validate::validate_nodes;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatePlugin;

impl ValidatePlugin {
    pub const NAME: &'static str = "validate";
}

impl Plugin for ValidatePlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn phase(&self) -> Phase {
        Phase::Finalize
    }

    fn enabled_by_default(&self) -> bool {
        false
    }

    fn apply(&self, ctx: &mut TransformContext<'_>) -> Result<(), BoxError> {
        validate_nodes(ctx.root.children())?;
        Ok(())
    }
}
