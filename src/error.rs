//! Error types for semtree operations.

use thiserror::Error;

use crate::plugin::Phase;

/// Boxed error returned by plugin entry points and capability handlers.
///
/// The engine attaches the plugin name and phase before surfacing it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while configuring or running a transform.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid plugin configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Plugin registration and resolution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown phase `{0}` (expected normalize, structure, capability or finalize)")]
    UnknownPhase(String),

    #[error("plugin name must not be empty")]
    EmptyPluginName,

    #[error("duplicate plugin `{0}`")]
    DuplicatePlugin(String),

    #[error("replacement for `{expected}` is named `{found}`")]
    ReplacementNameMismatch { expected: String, found: String },

    #[error("unknown style mode `{0}` (expected inline or css-class)")]
    UnknownStyleMode(String),
}

/// A plugin's setup, entry point or handler failed.
#[derive(Error, Debug)]
#[error("plugin `{plugin}` failed during {phase} phase: {source}")]
pub struct PluginError {
    pub plugin: String,
    pub phase: Phase,
    #[source]
    pub source: BoxError,
}

impl PluginError {
    pub fn new(plugin: impl Into<String>, phase: Phase, source: impl Into<BoxError>) -> Self {
        Self {
            plugin: plugin.into(),
            phase,
            source: source.into(),
        }
    }
}

/// A pipeline run aborted.
///
/// Carries a bounded excerpt of the input markup for diagnostics.
#[derive(Error, Debug)]
#[error("transform aborted in {phase} phase (input: {excerpt:?})")]
pub struct TransformError {
    pub phase: Phase,
    pub excerpt: String,
    #[source]
    pub source: PluginError,
}

/// A semantic tree violates a structural invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid node at {path}: {message}")]
pub struct ValidationError {
    /// Ancestor chain of the offending node, e.g. `view[0] > text[2]`.
    pub path: String,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, Error>;
