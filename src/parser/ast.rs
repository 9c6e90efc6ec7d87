//! The AST of the template language

use crate::parser::expression::Expression;
use crate::parser::symbol::Symbol;

/// A named, overridable region of a template
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Name of the block
    pub name: String,
    /// What's inside the block
    pub body: Vec<Node>,
}

/// A `{% macro name(a, b) %}...{% endmacro %}` definition.
///
/// It does not render at its definition site; it registers itself so a
/// later `{{ name(...) }}` can call it.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroDefinition {
    /// Name of the macro
    pub name: String,
    /// Parameter names, bound positionally at call time
    pub params: Vec<String>,
    /// What's inside the macro
    pub body: Vec<Node>,
}

/// An if/elif/else chain; at most one branch renders
#[derive(Clone, Debug, PartialEq)]
pub struct If {
    /// First item is the `if`, all the ones after are `elif`s
    pub conditions: Vec<(Expression, Vec<Node>)>,
    /// The optional `else` body
    pub otherwise: Option<Vec<Node>>,
}

/// A `{% for x in y %}...{% endfor %}` loop
#[derive(Clone, Debug, PartialEq)]
pub struct Forloop {
    /// Name of the loop variable
    pub value: String,
    /// What is iterated on: an array literal or a context variable
    pub container: Symbol,
    /// What's inside the loop
    pub body: Vec<Node>,
}

/// All nodes the engine can render
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Some literal text
    Text(String),
    /// A `{{ }}` tag
    Value(Expression),
    /// An if/elif/else chain
    If(If),
    /// A `{% for ... %}` loop
    Forloop(Forloop),
    /// A `{% block name %}...{% endblock %}` region
    Block(Block),
    /// A `{% macro ... %}` definition
    MacroDefinition(MacroDefinition),
    /// A `{% include "name" %}` tag, contains the template name
    Include(String),
}
