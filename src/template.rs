use std::collections::HashMap;

use crate::errors::Result;
use crate::parser::ast::{Block, Node};
use crate::parser::Parser;

/// A parsed template, immutable once built.
///
/// Concurrent renders share templates read-only through the engine's
/// registry; nothing here changes after `new` returns.
#[derive(Clone, Debug)]
pub struct Template {
    /// Name of the template, usually its path relative to the load directory
    pub name: String,
    /// Name of the parent template being extended, if any
    pub extends: Option<String>,
    /// The root nodes, in source order
    pub nodes: Vec<Node>,
    /// All blocks defined in the template, including nested ones
    pub blocks: HashMap<String, Block>,
}

impl Template {
    /// Parses `source` eagerly: a `Template` that exists is syntactically
    /// well-formed, only lookups can still fail at render time.
    pub fn new(name: &str, source: &str) -> Result<Template> {
        let parsed = Parser::new(name, source).parse()?;

        Ok(Template {
            name: name.to_string(),
            extends: parsed.extends,
            nodes: parsed.nodes,
            blocks: parsed.blocks,
        })
    }
}
