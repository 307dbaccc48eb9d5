//! Transform engine.
//!
//! Parses markup, resolves the plugin list and runs it phase by phase
//! against a fresh [`TransformContext`]. The capability phase goes through
//! the batching executor; the others call each plugin's entry point in
//! resolved order.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ConfigError, PluginError, Result, TransformError};
use crate::executor::run_batched_phase;
use crate::markup::{MarkupTree, parse_markup};
use crate::node::SemanticNode;
use crate::plugin::{Phase, Plugin, PluginConfig, PluginResolver, ResolvedPlugin, TransformContext};
use crate::plugins::validate::ValidatePlugin;
use crate::util;

/// Longest input excerpt carried by a [`TransformError`].
pub const EXCERPT_LEN: usize = 80;

/// Class-name prefix used when none is configured.
pub const DEFAULT_ROOT_CLASS: &str = "semtree";

/// How default tag styles are attached to elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "kebab-case")
)]
pub enum StyleMode {
    /// Default styles become inline style props.
    #[default]
    Inline,
    /// Default styles are replaced by a `<prefix>-<tag>` class name.
    CssClass,
}

impl StyleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleMode::Inline => "inline",
            StyleMode::CssClass => "css-class",
        }
    }
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(StyleMode::Inline),
            "css-class" | "class" => Ok(StyleMode::CssClass),
            _ => Err(ConfigError::UnknownStyleMode(s.to_string())),
        }
    }
}

/// Options for one transform.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Ignore markup `class` attributes.
    pub remove_all_class: bool,
    /// Ignore markup `style` attributes. Default tag styles still apply.
    pub remove_all_style: bool,
    pub style_mode: StyleMode,
    /// Prefix for generated class names.
    pub root_class_name: String,
    pub plugins: PluginConfig,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            remove_all_class: true,
            remove_all_style: false,
            style_mode: StyleMode::Inline,
            root_class_name: DEFAULT_ROOT_CLASS.to_string(),
            plugins: PluginConfig::default(),
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remove_all_class(mut self, remove: bool) -> Self {
        self.remove_all_class = remove;
        self
    }

    pub fn with_remove_all_style(mut self, remove: bool) -> Self {
        self.remove_all_style = remove;
        self
    }

    pub fn with_style_mode(mut self, mode: StyleMode) -> Self {
        self.style_mode = mode;
        self
    }

    pub fn with_root_class_name(mut self, prefix: impl Into<String>) -> Self {
        self.root_class_name = prefix.into();
        self
    }

    pub fn with_plugins(mut self, plugins: PluginConfig) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_disabled(mut self, name: impl Into<String>) -> Self {
        self.plugins.disable.push(name.into());
        self
    }

    pub fn with_replacement(mut self, name: impl Into<String>, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.replace.insert(name.into(), plugin);
        self
    }

    pub fn with_extra(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.extra.push(plugin);
        self
    }

    /// Check the finished tree with the structural validator.
    pub fn with_validation(mut self) -> Self {
        if !self
            .plugins
            .extra
            .iter()
            .any(|p| p.name() == ValidatePlugin::NAME)
        {
            self.plugins.extra.push(Arc::new(ValidatePlugin));
        }
        self
    }
}

/// Reusable engine holding the built-in plugin set.
///
/// ```
/// use semtree::{Transformer, TransformOptions};
///
/// let engine = Transformer::new();
/// let nodes = engine.transform("<p>Hi <b>there</b></p>", &TransformOptions::default()).unwrap();
/// assert_eq!(nodes.len(), 1);
/// assert_eq!(nodes[0].text_content(), "Hi there");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    resolver: PluginResolver,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom built-in plugin set.
    pub fn with_resolver(resolver: PluginResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &PluginResolver {
        &self.resolver
    }

    /// Transform markup text into top-level semantic nodes.
    pub fn transform(&self, markup: &str, options: &TransformOptions) -> Result<Vec<SemanticNode>> {
        let plugins = self.resolver.resolve(&options.plugins)?;
        let ast = parse_markup(markup);
        run_plugins(&plugins, &ast, options).map_err(|(phase, source)| {
            TransformError {
                phase,
                excerpt: util::excerpt(markup, EXCERPT_LEN),
                source,
            }
            .into()
        })
    }

    /// Transform markup bytes, sniffing their encoding first.
    pub fn transform_bytes(
        &self,
        bytes: &[u8],
        options: &TransformOptions,
    ) -> Result<Vec<SemanticNode>> {
        let markup = util::decode_html(bytes);
        self.transform(&markup, options)
    }
}

fn run_plugins(
    plugins: &[ResolvedPlugin],
    ast: &MarkupTree,
    options: &TransformOptions,
) -> std::result::Result<Vec<SemanticNode>, (Phase, PluginError)> {
    let mut ctx = TransformContext::new(ast, options);

    for phase in Phase::ALL {
        // Resolved plugins are sorted by phase
        let start = plugins.partition_point(|p| p.phase < phase);
        let end = plugins.partition_point(|p| p.phase <= phase);
        let slice = &plugins[start..end];
        if slice.is_empty() {
            continue;
        }

        let result = match phase {
            Phase::Capability => run_batched_phase(phase, slice, &mut ctx).map(|_| ()),
            _ => run_sequential_phase(phase, slice, &mut ctx),
        };
        result.map_err(|e| (phase, e))?;
    }

    Ok(ctx.into_nodes())
}

fn run_sequential_phase(
    phase: Phase,
    plugins: &[ResolvedPlugin],
    ctx: &mut TransformContext<'_>,
) -> std::result::Result<(), PluginError> {
    for slot in plugins {
        let name = slot.name();
        tracing::debug!(plugin = name, %phase, order = slot.order, "running plugin");
        slot.plugin
            .apply(ctx)
            .map_err(|e| PluginError::new(name, phase, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::plugin::FnPlugin;

    #[test]
    fn test_default_options() {
        let options = TransformOptions::default();
        assert!(options.remove_all_class);
        assert!(!options.remove_all_style);
        assert_eq!(options.style_mode, StyleMode::Inline);
        assert_eq!(options.root_class_name, "semtree");
        assert!(options.plugins.is_empty());
    }

    #[test]
    fn test_style_mode_from_str() {
        assert_eq!("inline".parse::<StyleMode>(), Ok(StyleMode::Inline));
        assert_eq!("CSS-Class".parse::<StyleMode>(), Ok(StyleMode::CssClass));
        assert_eq!(
            "stylesheet".parse::<StyleMode>(),
            Err(ConfigError::UnknownStyleMode("stylesheet".into()))
        );
        assert_eq!(StyleMode::CssClass.to_string(), "css-class");
    }

    #[test]
    fn test_with_validation_is_idempotent() {
        let options = TransformOptions::default().with_validation().with_validation();
        assert_eq!(options.plugins.extra.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_no_nodes() {
        let nodes = Transformer::new()
            .transform("", &TransformOptions::default())
            .unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_phases_run_in_order() {
        let recorder = |name: &'static str, phase: &str| {
            FnPlugin::new(name, phase, move |ctx| {
                let log = ctx.metadata.entry("order".into()).or_default();
                if !log.is_empty() {
                    log.push(',');
                }
                log.push_str(name);
                Ok(())
            })
            .unwrap()
        };

        let engine = Transformer::with_resolver(PluginResolver::new(vec![
            Arc::new(recorder("d", "finalize")),
            Arc::new(recorder("c", "capability")),
            Arc::new(recorder("b", "structure")),
            Arc::new(recorder("a", "normalize")),
            Arc::new(FnPlugin::new("check", "finalize", |ctx| {
                match ctx.metadata.get("order").map(String::as_str) {
                    Some("a,b,c,d") => Ok(()),
                    other => Err(format!("unexpected order {other:?}").into()),
                }
            })
            .unwrap()
            .with_order(1)),
        ]));

        engine.transform("<p>x</p>", &TransformOptions::default()).unwrap();
    }

    #[test]
    fn test_plugin_error_aborts_with_excerpt() {
        let engine = Transformer::with_resolver(PluginResolver::new(vec![
            Arc::new(FnPlugin::new("fails", "structure", |_| Err("nope".into())).unwrap()),
            Arc::new(FnPlugin::new("never", "finalize", |_| Err("should not run".into())).unwrap()),
        ]));

        let markup = format!("<p>{}</p>", "x".repeat(200));
        let err = engine
            .transform(&markup, &TransformOptions::default())
            .unwrap_err();
        let Error::Transform(err) = err else {
            panic!("expected a transform error");
        };
        assert_eq!(err.phase, Phase::Structure);
        assert_eq!(err.source.plugin, "fails");
        assert_eq!(err.excerpt.chars().count(), EXCERPT_LEN + 1);
        assert!(err.excerpt.starts_with("<p>xxx"));
        assert!(err.excerpt.ends_with('…'));
    }

    #[test]
    fn test_config_error_surfaces_before_parsing() {
        let options = TransformOptions::default().with_extra(Arc::new(
            FnPlugin::new("block", "structure", |_| Ok(())).unwrap(),
        ));
        let err = Transformer::new().transform("<p>x</p>", &options).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::DuplicatePlugin(ref name)) if name == "block"
        ));
    }

    #[test]
    fn test_transform_bytes_decodes_first() {
        let nodes = Transformer::new()
            .transform_bytes(b"<p>caf\xE9</p>", &TransformOptions::default())
            .unwrap();
        assert_eq!(nodes[0].text_content(), "café");
    }
}
