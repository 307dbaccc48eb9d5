//! Plugin list resolution.
//!
//! Resolution order:
//! 1. Built-ins that are enabled by default
//! 2. Minus everything named in `disable`
//! 3. With `replace` entries swapped in, keeping the original's phase and order
//! 4. Plus `extra` plugins
//! 5. Stable-sorted by phase, then by order
//!
//! No dependency checking happens here: disabling a plugin that another one
//! relies on is the caller's decision.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::{Phase, Plugin};
use crate::error::ConfigError;

/// Caller-supplied plugin configuration.
#[derive(Clone, Default)]
pub struct PluginConfig {
    /// Names of built-ins to leave out.
    pub disable: Vec<String>,
    /// Built-in name → replacement with the same name.
    pub replace: HashMap<String, Arc<dyn Plugin>>,
    /// Additional plugins, slotted by their own phase and order.
    pub extra: Vec<Arc<dyn Plugin>>,
}

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disabled(mut self, name: impl Into<String>) -> Self {
        self.disable.push(name.into());
        self
    }

    pub fn with_replacement(mut self, name: impl Into<String>, plugin: Arc<dyn Plugin>) -> Self {
        self.replace.insert(name.into(), plugin);
        self
    }

    pub fn with_extra(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.extra.push(plugin);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.disable.is_empty() && self.replace.is_empty() && self.extra.is_empty()
    }
}

impl fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut replace: Vec<_> = self.replace.keys().collect();
        replace.sort();
        let extra: Vec<_> = self.extra.iter().map(|p| p.name()).collect();
        f.debug_struct("PluginConfig")
            .field("disable", &self.disable)
            .field("replace", &replace)
            .field("extra", &extra)
            .finish()
    }
}

/// A plugin placed in its final slot.
#[derive(Clone)]
pub struct ResolvedPlugin {
    pub plugin: Arc<dyn Plugin>,
    pub phase: Phase,
    pub order: i32,
}

impl ResolvedPlugin {
    fn new(plugin: Arc<dyn Plugin>) -> Self {
        Self {
            phase: plugin.phase(),
            order: plugin.order(),
            plugin,
        }
    }

    pub fn name(&self) -> &str {
        self.plugin.name()
    }
}

impl fmt::Debug for ResolvedPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedPlugin")
            .field("name", &self.name())
            .field("phase", &self.phase)
            .field("order", &self.order)
            .finish()
    }
}

/// Produces the ordered plugin list for one configuration.
///
/// Built per engine rather than held in a global registry, so transforms
/// with different configurations never see each other's plugins.
#[derive(Clone)]
pub struct PluginResolver {
    builtins: Vec<Arc<dyn Plugin>>,
}

impl PluginResolver {
    pub fn new(builtins: Vec<Arc<dyn Plugin>>) -> Self {
        Self { builtins }
    }

    /// Resolver over the crate's built-in plugins.
    pub fn with_builtins() -> Self {
        Self::new(crate::plugins::builtins())
    }

    pub fn builtins(&self) -> &[Arc<dyn Plugin>] {
        &self.builtins
    }

    pub fn resolve(&self, config: &PluginConfig) -> Result<Vec<ResolvedPlugin>, ConfigError> {
        let disabled: HashSet<&str> = config.disable.iter().map(String::as_str).collect();

        let mut resolved: Vec<ResolvedPlugin> = Vec::with_capacity(self.builtins.len());
        for plugin in &self.builtins {
            if !plugin.enabled_by_default() {
                continue;
            }
            if disabled.contains(plugin.name()) {
                tracing::debug!(plugin = plugin.name(), "plugin disabled");
                continue;
            }
            resolved.push(ResolvedPlugin::new(Arc::clone(plugin)));
        }

        for name in &disabled {
            if !self.builtins.iter().any(|p| p.name() == *name) {
                tracing::debug!(plugin = *name, "ignoring disable for unknown plugin");
            }
        }

        for (name, replacement) in &config.replace {
            if replacement.name() != name {
                return Err(ConfigError::ReplacementNameMismatch {
                    expected: name.clone(),
                    found: replacement.name().to_string(),
                });
            }
            match resolved.iter_mut().find(|slot| slot.name() == name) {
                Some(slot) => {
                    tracing::debug!(plugin = %name, phase = %slot.phase, "plugin replaced");
                    slot.plugin = Arc::clone(replacement);
                }
                None => {
                    tracing::debug!(plugin = %name, "ignoring replacement for inactive plugin");
                }
            }
        }

        for plugin in &config.extra {
            if plugin.name().trim().is_empty() {
                return Err(ConfigError::EmptyPluginName);
            }
            if resolved.iter().any(|slot| slot.name() == plugin.name()) {
                return Err(ConfigError::DuplicatePlugin(plugin.name().to_string()));
            }
            resolved.push(ResolvedPlugin::new(Arc::clone(plugin)));
        }

        // Vec::sort_by_key is stable, so equal slots keep registration order.
        resolved.sort_by_key(|slot| (slot.phase, slot.order));
        Ok(resolved)
    }
}

impl Default for PluginResolver {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for PluginResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.builtins.iter().map(|p| p.name()).collect();
        f.debug_struct("PluginResolver")
            .field("builtins", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::FnPlugin;

    fn plugin(name: &str, phase: &str, order: i32) -> Arc<dyn Plugin> {
        Arc::new(FnPlugin::new(name, phase, |_| Ok(())).unwrap().with_order(order))
    }

    fn names(list: &[ResolvedPlugin]) -> Vec<&str> {
        list.iter().map(ResolvedPlugin::name).collect()
    }

    fn resolver() -> PluginResolver {
        PluginResolver::new(vec![
            plugin("late", "finalize", 0),
            plugin("style", "capability", 0),
            plugin("block", "structure", 0),
            plugin("list", "structure", 10),
            plugin("table", "structure", 10),
        ])
    }

    #[test]
    fn test_sorts_by_phase_then_order() {
        let list = resolver().resolve(&PluginConfig::new()).unwrap();
        assert_eq!(names(&list), vec!["block", "list", "table", "style", "late"]);
    }

    #[test]
    fn test_disable_removes_plugin() {
        let config = PluginConfig::new().with_disabled("list").with_disabled("nope");
        let list = resolver().resolve(&config).unwrap();
        assert_eq!(names(&list), vec!["block", "table", "style", "late"]);
    }

    #[test]
    fn test_replacement_inherits_slot() {
        // Replacement declares a different phase and order; the slot wins.
        let config = PluginConfig::new().with_replacement("list", plugin("list", "finalize", 99));
        let list = resolver().resolve(&config).unwrap();
        assert_eq!(names(&list), vec!["block", "list", "table", "style", "late"]);
        let slot = &list[1];
        assert_eq!(slot.phase, Phase::Structure);
        assert_eq!(slot.order, 10);
        assert_eq!(slot.plugin.phase(), Phase::Finalize);
    }

    #[test]
    fn test_replacement_name_must_match() {
        let config = PluginConfig::new().with_replacement("list", plugin("other", "structure", 0));
        let err = resolver().resolve(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ReplacementNameMismatch {
                expected: "list".into(),
                found: "other".into()
            }
        );
    }

    #[test]
    fn test_extra_plugins_are_slotted() {
        let config = PluginConfig::new()
            .with_extra(plugin("first", "normalize", 0))
            .with_extra(plugin("between", "structure", 5));
        let list = resolver().resolve(&config).unwrap();
        assert_eq!(
            names(&list),
            vec!["first", "block", "between", "list", "table", "style", "late"]
        );
    }

    #[test]
    fn test_extra_with_equal_order_runs_after_builtin() {
        let config = PluginConfig::new().with_extra(plugin("mine", "structure", 10));
        let list = resolver().resolve(&config).unwrap();
        assert_eq!(names(&list), vec!["block", "list", "table", "mine", "style", "late"]);
    }

    #[test]
    fn test_duplicate_extra_is_rejected() {
        let config = PluginConfig::new().with_extra(plugin("block", "structure", 0));
        let err = resolver().resolve(&config).unwrap_err();
        assert_eq!(err, ConfigError::DuplicatePlugin("block".into()));
    }

    #[test]
    fn test_disabled_by_default_plugins_are_skipped() {
        struct Optional;
        impl Plugin for Optional {
            fn name(&self) -> &str {
                "optional"
            }
            fn phase(&self) -> Phase {
                Phase::Finalize
            }
            fn enabled_by_default(&self) -> bool {
                false
            }
        }

        let resolver = PluginResolver::new(vec![Arc::new(Optional), plugin("a", "finalize", 0)]);
        let list = resolver.resolve(&PluginConfig::new()).unwrap();
        assert_eq!(names(&list), vec!["a"]);

        // Adding it explicitly is not a duplicate: it never entered the list.
        let config = PluginConfig::new().with_extra(Arc::new(Optional));
        let list = resolver.resolve(&config).unwrap();
        assert_eq!(names(&list), vec!["optional", "a"]);
    }
}
