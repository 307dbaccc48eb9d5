//! Capability batching executor.
//!
//! Instead of every capability plugin walking the semantic tree on its own,
//! batched plugins register handlers keyed by [`DispatchKey`] and the tree is
//! walked once for all of them. At each node the matching handlers run in
//! registration order.
//!
//! Replacement works on the slot being visited: a handler returning
//! [`Visit::Replace`] overwrites the node in its parent's child list (or the
//! root itself), and later handlers for that node see the replacement. The
//! walk then descends into the replacement's children.

use std::collections::HashMap;
use std::fmt;

use crate::MAX_DEPTH;
use crate::error::{BoxError, PluginError};
use crate::node::SemanticNode;
use crate::plugin::{Phase, ResolvedPlugin, TransformContext};

/// Which nodes a handler wants to see.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DispatchKey {
    /// Elements with this target tag.
    Tag(String),
    /// Text nodes.
    Text,
    /// Every element, whatever its tag.
    AnyElement,
}

impl DispatchKey {
    pub fn tag(tag: impl Into<String>) -> Self {
        DispatchKey::Tag(tag.into())
    }

    /// The specific key a node dispatches under.
    pub fn of(node: &SemanticNode) -> Self {
        match node {
            SemanticNode::Element(el) => DispatchKey::Tag(el.tag.clone()),
            SemanticNode::Text(_) => DispatchKey::Text,
        }
    }
}

/// Handler outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Visit {
    /// The node was left in place (possibly mutated).
    Unchanged,
    /// Overwrite the visited slot with this node.
    Replace(SemanticNode),
}

/// Per-node handler.
pub type Handler = Box<dyn FnMut(&mut SemanticNode) -> Result<Visit, BoxError>>;

struct Registration {
    plugin: usize,
    handler: Handler,
}

/// Handlers collected for one walk.
///
/// Registries live for a single phase of a single transform; nothing here is
/// process-wide.
#[derive(Default)]
pub struct HandlerRegistry {
    plugins: Vec<String>,
    handlers: Vec<Registration>,
    by_tag: HashMap<String, Vec<usize>>,
    text: Vec<usize>,
    any_element: Vec<usize>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute subsequent registrations to `plugin`.
    pub fn begin_plugin(&mut self, plugin: &str) {
        self.plugins.push(plugin.to_string());
    }

    /// Register a handler under `key`.
    pub fn on<F>(&mut self, key: DispatchKey, handler: F)
    where
        F: FnMut(&mut SemanticNode) -> Result<Visit, BoxError> + 'static,
    {
        if self.plugins.is_empty() {
            self.begin_plugin("anonymous");
        }
        let index = self.handlers.len();
        self.handlers.push(Registration {
            plugin: self.plugins.len() - 1,
            handler: Box::new(handler),
        });
        match key {
            DispatchKey::Tag(tag) => self.by_tag.entry(tag).or_default().push(index),
            DispatchKey::Text => self.text.push(index),
            DispatchKey::AnyElement => self.any_element.push(index),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn clear(&mut self) {
        self.plugins.clear();
        self.handlers.clear();
        self.by_tag.clear();
        self.text.clear();
        self.any_element.clear();
    }

    /// Walk `root` once, dispatching every node to its handlers.
    ///
    /// Returns the number of nodes visited. The first handler error aborts the
    /// walk and is attributed to the plugin that registered the handler.
    pub fn run(&mut self, root: &mut SemanticNode, phase: Phase) -> Result<usize, PluginError> {
        let mut scratch = Vec::new();
        let mut visited = 0;
        self.visit(root, 0, phase, &mut scratch, &mut visited)?;
        Ok(visited)
    }

    fn visit(
        &mut self,
        node: &mut SemanticNode,
        depth: usize,
        phase: Phase,
        scratch: &mut Vec<usize>,
        visited: &mut usize,
    ) -> Result<(), PluginError> {
        if depth > MAX_DEPTH {
            tracing::warn!(depth, "semantic tree exceeds depth limit, skipping subtree");
            return Ok(());
        }

        self.dispatch(node, phase, scratch)?;
        *visited += 1;

        if let SemanticNode::Element(el) = node {
            for child in &mut el.children {
                self.visit(child, depth + 1, phase, scratch, visited)?;
            }
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        node: &mut SemanticNode,
        phase: Phase,
        scratch: &mut Vec<usize>,
    ) -> Result<(), PluginError> {
        scratch.clear();
        match node {
            SemanticNode::Text(_) => scratch.extend_from_slice(&self.text),
            SemanticNode::Element(el) => {
                if let Some(list) = self.by_tag.get(&el.tag) {
                    scratch.extend_from_slice(list);
                }
                if !self.any_element.is_empty() {
                    scratch.extend_from_slice(&self.any_element);
                    // Interleave so handlers still fire in registration order
                    scratch.sort_unstable();
                }
            }
        }

        if scratch.is_empty() {
            return Ok(());
        }
        tracing::trace!(key = ?DispatchKey::of(node), handlers = scratch.len(), "dispatch");

        for &index in scratch.iter() {
            let registration = &mut self.handlers[index];
            match (registration.handler)(node) {
                Ok(Visit::Unchanged) => {}
                Ok(Visit::Replace(replacement)) => *node = replacement,
                Err(source) => {
                    let plugin = self.plugins[registration.plugin].clone();
                    return Err(PluginError::new(plugin, phase, source));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("plugins", &self.plugins)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Run one phase's plugins, batching the ones that opt in.
///
/// Consecutive batched plugins share one walk. A non-batched plugin flushes
/// the pending handlers first, so relative plugin order is kept even when the
/// two styles are mixed. With only batched plugins the tree is walked once.
///
/// Returns the number of tree walks performed.
pub fn run_batched_phase(
    phase: Phase,
    plugins: &[ResolvedPlugin],
    ctx: &mut TransformContext<'_>,
) -> Result<usize, PluginError> {
    let mut registry = HandlerRegistry::new();
    let mut walks = 0;

    for slot in plugins {
        let name = slot.name();
        if slot.plugin.batched() {
            registry.begin_plugin(name);
            slot.plugin
                .register(ctx, &mut registry)
                .map_err(|e| PluginError::new(name, phase, e))?;
            tracing::debug!(plugin = name, %phase, handlers = registry.len(), "registered handlers");
        } else {
            walks += flush(&mut registry, ctx, phase)?;
            tracing::debug!(plugin = name, %phase, "running plugin");
            slot.plugin
                .apply(ctx)
                .map_err(|e| PluginError::new(name, phase, e))?;
        }
    }

    walks += flush(&mut registry, ctx, phase)?;
    Ok(walks)
}

fn flush(
    registry: &mut HandlerRegistry,
    ctx: &mut TransformContext<'_>,
    phase: Phase,
) -> Result<usize, PluginError> {
    if registry.is_empty() {
        registry.clear();
        return Ok(0);
    }
    let visited = registry.run(&mut ctx.root, phase)?;
    tracing::debug!(%phase, visited, "batched walk complete");
    registry.clear();
    Ok(1)
}
