//! Pipeline plugins.
//!
//! A plugin belongs to one [`Phase`] and runs against a shared
//! [`TransformContext`]. Phases always run in the order
//! `normalize < structure < capability < finalize`; inside a phase plugins
//! run by ascending [`Plugin::order`], ties keeping registration order.
//!
//! Capability-phase plugins can opt into batching by returning `true` from
//! [`Plugin::batched`] and registering per-node handlers in
//! [`Plugin::register`]; the engine then visits the tree once for all of them.

mod context;
mod resolver;

pub use context::{Metadata, TransformContext};
pub use resolver::{PluginConfig, PluginResolver, ResolvedPlugin};

use std::fmt;
use std::str::FromStr;

use crate::error::{BoxError, ConfigError};
use crate::executor::HandlerRegistry;

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Reads the markup tree before anything is built.
    Normalize,
    /// Builds and reshapes the semantic tree.
    Structure,
    /// Enriches nodes in place from their recorded attributes.
    Capability,
    /// Reserved for post-processing and checks.
    Finalize,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 4] = [
        Phase::Normalize,
        Phase::Structure,
        Phase::Capability,
        Phase::Finalize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Normalize => "normalize",
            Phase::Structure => "structure",
            Phase::Capability => "capability",
            Phase::Finalize => "finalize",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normalize" => Ok(Phase::Normalize),
            "structure" => Ok(Phase::Structure),
            "capability" => Ok(Phase::Capability),
            "finalize" => Ok(Phase::Finalize),
            _ => Err(ConfigError::UnknownPhase(s.to_string())),
        }
    }
}

/// A unit of pipeline logic.
///
/// Plugins should hold no per-call state so a resolved plugin list can be
/// shared between concurrent transforms.
pub trait Plugin: Send + Sync {
    /// Unique name, used by `disable` and `replace`.
    fn name(&self) -> &str;

    fn phase(&self) -> Phase;

    /// Position inside the phase; lower runs first.
    fn order(&self) -> i32 {
        0
    }

    /// Built-ins returning `false` only run when added explicitly.
    fn enabled_by_default(&self) -> bool {
        true
    }

    /// Whether this plugin registers per-node handlers instead of walking.
    fn batched(&self) -> bool {
        false
    }

    /// Register per-node handlers. Only called when [`Plugin::batched`] is true.
    fn register(
        &self,
        _ctx: &TransformContext<'_>,
        _registry: &mut HandlerRegistry,
    ) -> Result<(), BoxError> {
        Ok(())
    }

    /// Whole-tree entry point.
    ///
    /// The default runs this plugin's own handlers over the tree, so batched
    /// plugins also work outside the capability phase.
    fn apply(&self, ctx: &mut TransformContext<'_>) -> Result<(), BoxError> {
        let mut registry = HandlerRegistry::new();
        registry.begin_plugin(self.name());
        self.register(ctx, &mut registry)?;
        registry
            .run(&mut ctx.root, self.phase())
            .map_err(|e| e.source)?;
        Ok(())
    }
}

type ApplyFn = dyn Fn(&mut TransformContext<'_>) -> Result<(), BoxError> + Send + Sync;
type RegisterFn =
    dyn Fn(&TransformContext<'_>, &mut HandlerRegistry) -> Result<(), BoxError> + Send + Sync;

enum FnBody {
    Apply(Box<ApplyFn>),
    Register(Box<RegisterFn>),
}

/// Plugin built from a closure.
///
/// ```
/// use semtree::plugin::{FnPlugin, Plugin};
///
/// let plugin = FnPlugin::new("count", "finalize", |ctx| {
///     let count = ctx.root.count();
///     ctx.metadata.insert("node.count".into(), count.to_string());
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(plugin.name(), "count");
///
/// assert!(FnPlugin::new("bad", "render", |_| Ok(())).is_err());
/// ```
pub struct FnPlugin {
    name: String,
    phase: Phase,
    order: i32,
    body: FnBody,
}

impl FnPlugin {
    /// Create a whole-tree plugin. Fails on an empty name or unknown phase.
    pub fn new<F>(name: &str, phase: &str, apply: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut TransformContext<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self::with_body(name, phase.parse()?, FnBody::Apply(Box::new(apply)))
    }

    /// Create a batched plugin whose closure registers per-node handlers.
    pub fn handlers<F>(name: &str, phase: &str, register: F) -> Result<Self, ConfigError>
    where
        F: Fn(&TransformContext<'_>, &mut HandlerRegistry) -> Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self::with_body(name, phase.parse()?, FnBody::Register(Box::new(register)))
    }

    fn with_body(name: &str, phase: Phase, body: FnBody) -> Result<Self, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyPluginName);
        }
        Ok(Self {
            name: name.to_string(),
            phase,
            order: 0,
            body,
        })
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl Plugin for FnPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn batched(&self) -> bool {
        matches!(self.body, FnBody::Register(_))
    }

    fn register(
        &self,
        ctx: &TransformContext<'_>,
        registry: &mut HandlerRegistry,
    ) -> Result<(), BoxError> {
        match &self.body {
            FnBody::Register(register) => register(ctx, registry),
            FnBody::Apply(_) => Ok(()),
        }
    }

    fn apply(&self, ctx: &mut TransformContext<'_>) -> Result<(), BoxError> {
        match &self.body {
            FnBody::Apply(apply) => apply(ctx),
            FnBody::Register(register) => {
                let mut registry = HandlerRegistry::new();
                registry.begin_plugin(&self.name);
                register(ctx, &mut registry)?;
                registry
                    .run(&mut ctx.root, self.phase)
                    .map_err(|e| e.source)?;
                Ok(())
            }
        }
    }
}

impl fmt::Debug for FnPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPlugin")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("order", &self.order)
            .field("batched", &self.batched())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordering() {
        assert!(Phase::Normalize < Phase::Structure);
        assert!(Phase::Structure < Phase::Capability);
        assert!(Phase::Capability < Phase::Finalize);
    }

    #[test]
    fn test_phase_from_str() {
        assert_eq!("capability".parse::<Phase>(), Ok(Phase::Capability));
        assert_eq!(" Finalize ".parse::<Phase>(), Ok(Phase::Finalize));
        assert_eq!(
            "render".parse::<Phase>(),
            Err(ConfigError::UnknownPhase("render".into()))
        );
    }

    #[test]
    fn test_fn_plugin_rejects_unknown_phase() {
        let err = FnPlugin::new("x", "layout", |_| Ok(())).unwrap_err();
        assert_eq!(err, ConfigError::UnknownPhase("layout".into()));
    }

    #[test]
    fn test_fn_plugin_rejects_empty_name() {
        let err = FnPlugin::new("  ", "finalize", |_| Ok(())).unwrap_err();
        assert_eq!(err, ConfigError::EmptyPluginName);
    }

    #[test]
    fn test_fn_plugin_batched_flag() {
        let apply = FnPlugin::new("a", "capability", |_| Ok(())).unwrap();
        let batched = FnPlugin::handlers("b", "capability", |_, _| Ok(())).unwrap();
        assert!(!apply.batched());
        assert!(batched.batched());
        assert_eq!(batched.with_order(5).order(), 5);
    }
}
