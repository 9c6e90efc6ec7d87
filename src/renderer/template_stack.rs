//! The per-render cursor over the inheritance chain

use std::sync::Arc;

use crate::engine::Engine;
use crate::parser::ast::Block;
use crate::template::Template;

/// Tracks where in the ancestor chain the walk currently is.
///
/// The chain is ordered oldest ancestor first: rendering starts at index 0
/// and block overrides move the cursor towards the most derived template.
/// Created fresh for every top-level render call and discarded afterwards.
/// The engine reference is what lets `include` tags resolve other
/// templates mid-render.
pub(crate) struct TemplateStack<'a> {
    engine: &'a Engine,
    chain: &'a [Arc<Template>],
    position: usize,
}

impl<'a> TemplateStack<'a> {
    pub fn new(engine: &'a Engine, chain: &'a [Arc<Template>]) -> TemplateStack<'a> {
        TemplateStack { engine, chain, position: 0 }
    }

    /// The template the cursor is on
    pub fn current(&self) -> &'a Template {
        let chain = self.chain;
        &chain[self.position]
    }

    /// Every template of the chain, oldest ancestor first
    pub fn chain(&self) -> &'a [Arc<Template>] {
        self.chain
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor; used when control passes to an overriding
    /// template and back
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Index of the nearest template more derived than `from` that
    /// overrides `block`
    pub fn next_override(&self, from: usize, block: &str) -> Option<usize> {
        (from + 1..self.chain.len()).find(|&level| self.chain[level].blocks.contains_key(block))
    }

    /// The definition of `name` in the template at `level`
    pub fn block_at(&self, level: usize, name: &str) -> Option<&'a Block> {
        let chain = self.chain;
        chain[level].blocks.get(name)
    }

    pub fn engine(&self) -> &'a Engine {
        self.engine
    }
}
