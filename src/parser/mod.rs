//! Recursive descent parser turning raw text into a template AST

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::errors::{Error, Result};
use crate::parser::ast::{Block, Forloop, If, MacroDefinition, Node};
use crate::parser::expression::{Clause, Expression};
use crate::parser::scanner::{find_tag, TagKind};
use crate::parser::symbol::{Literal, Symbol};

pub mod ast;
pub mod expression;
pub mod scanner;
pub mod symbol;

#[cfg(test)]
mod tests;

/// Everything extracted from one template source
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedTemplate {
    /// Name of the parent template, if an `extends` tag was found
    pub extends: Option<String>,
    /// The root nodes, in source order
    pub nodes: Vec<Node>,
    /// All blocks of the template, including nested ones
    pub blocks: HashMap<String, Block>,
}

/// Single pass parser over the raw text of one template
pub struct Parser<'a> {
    /// Template name, for errors and warnings
    name: &'a str,
    source: &'a str,
    /// Byte position of the scan cursor
    cursor: usize,
    /// Set when the previous tag ended with `-`, trims the next literal
    trim_next: bool,
    /// Set once anything that renders has been parsed
    content_seen: bool,
    extends: Option<String>,
    blocks: HashMap<String, Block>,
    macros_seen: HashSet<String>,
}

impl<'a> Parser<'a> {
    /// Creates a parser for one template source
    pub fn new(name: &'a str, source: &'a str) -> Parser<'a> {
        Parser {
            name,
            source,
            cursor: 0,
            trim_next: false,
            content_seen: false,
            extends: None,
            blocks: HashMap::new(),
            macros_seen: HashSet::new(),
        }
    }

    /// Parses the whole source eagerly; any grammar violation errors here
    pub fn parse(mut self) -> Result<ParsedTemplate> {
        let (nodes, closer) = self.parse_until(&[])?;
        debug_assert!(closer.is_none());
        Ok(ParsedTemplate { extends: self.extends, nodes, blocks: self.blocks })
    }

    /// Parses nodes until one of the `until` clauses is found and returns
    /// it, or until the end of the source when `until` is empty.
    fn parse_until(&mut self, until: &[Clause]) -> Result<(Vec<Node>, Option<Expression>)> {
        let mut nodes: Vec<Node> = vec![];

        loop {
            let tag = match find_tag(self.source, self.cursor)? {
                Some(tag) => tag,
                None => {
                    self.push_text(self.source.len(), false, &mut nodes);
                    if until.is_empty() {
                        return Ok((nodes, None));
                    }
                    return Err(Error::missing_end_tag(
                        &expected_names(until),
                        "end of template",
                    ));
                }
            };

            self.push_text(tag.start, tag.trim_left, &mut nodes);
            self.cursor = tag.end;
            self.trim_next = tag.trim_right;

            match tag.kind {
                TagKind::Comment => continue,
                TagKind::Value => {
                    let expression = Expression::parse(TagKind::Value, &tag.content)?;
                    nodes.push(Node::Value(expression));
                    self.content_seen = true;
                }
                TagKind::Control => {
                    let expression = Expression::parse(TagKind::Control, &tag.content)?;
                    if until.contains(&expression.clause) {
                        return Ok((nodes, Some(expression)));
                    }
                    if is_closing_clause(expression.clause) {
                        if until.is_empty() {
                            return Err(Error::msg(format!(
                                "Found `{}` tag with no matching opening tag",
                                expression.clause.name()
                            )));
                        }
                        return Err(Error::missing_end_tag(
                            &expected_names(until),
                            expression.clause.name(),
                        ));
                    }
                    self.dispatch(expression, &mut nodes)?;
                }
            }
        }
    }

    /// Opens a subtree for a composite clause, or finalizes a simple one
    fn dispatch(&mut self, expression: Expression, nodes: &mut Vec<Node>) -> Result<()> {
        match expression.clause {
            Clause::Extends => {
                let target = string_literal(&expression);
                if let Some(ref existing) = self.extends {
                    return Err(Error::msg(format!(
                        "Template `{}` already extends `{}`; inheriting from multiple templates isn't possible",
                        self.name, existing
                    )));
                }
                if self.content_seen {
                    warn!(
                        template = %self.name,
                        "`extends` is not the first tag in the template"
                    );
                }
                self.extends = Some(target);
                return Ok(());
            }
            Clause::Include => {
                nodes.push(Node::Include(string_literal(&expression)));
            }
            Clause::Block => {
                let name = single_name(&expression);
                let (body, closer) = self.parse_until(&[Clause::EndBlock])?;
                self.check_end_name(&name, Clause::EndBlock, closer)?;
                let block = Block { name: name.clone(), body };
                if self.blocks.insert(name.clone(), block.clone()).is_some() {
                    return Err(Error::duplicate_block(&name, self.name));
                }
                nodes.push(Node::Block(block));
            }
            Clause::For => {
                let value = single_name(&expression);
                let container =
                    expression.right.expect("for expressions always have a container");
                let (body, _closer) = self.parse_until(&[Clause::EndFor])?;
                nodes.push(Node::Forloop(Forloop { value, container, body }));
            }
            Clause::Macro => {
                let (name, params) = macro_signature(&expression);
                if !self.macros_seen.insert(name.clone()) {
                    return Err(Error::duplicate_macro(&name, self.name));
                }
                let (body, closer) = self.parse_until(&[Clause::EndMacro])?;
                self.check_end_name(&name, Clause::EndMacro, closer)?;
                nodes.push(Node::MacroDefinition(MacroDefinition { name, params, body }));
            }
            Clause::If => {
                let mut conditions: Vec<(Expression, Vec<Node>)> = vec![];
                let mut otherwise = None;
                let mut open = expression;
                // elif/else close the previous branch and are handed back
                // here to open their own
                loop {
                    let (body, closer) =
                        self.parse_until(&[Clause::Elif, Clause::Else, Clause::EndIf])?;
                    let closer = closer.expect("if chains always return their closer");
                    conditions.push((open, body));
                    match closer.clause {
                        Clause::Elif => open = closer,
                        Clause::Else => {
                            let (body, _end) = self.parse_until(&[Clause::EndIf])?;
                            otherwise = Some(body);
                            break;
                        }
                        Clause::EndIf => break,
                        _ => unreachable!("unexpected if chain closer"),
                    }
                }
                nodes.push(Node::If(If { conditions, otherwise }));
            }
            _ => unreachable!("`{}` is not dispatched", expression.clause.name()),
        }
        self.content_seen = true;
        Ok(())
    }

    /// Emits the literal span between the cursor and `upto`, applying any
    /// pending whitespace trims.
    fn push_text(&mut self, upto: usize, trim_end: bool, nodes: &mut Vec<Node>) {
        let mut raw = &self.source[self.cursor..upto];
        if self.trim_next {
            raw = raw.trim_start();
            self.trim_next = false;
        }
        if trim_end {
            raw = raw.trim_end();
        }
        if !raw.is_empty() {
            if !raw.trim().is_empty() {
                self.content_seen = true;
            }
            nodes.push(Node::Text(raw.to_string()));
        }
        self.cursor = upto;
    }

    /// An end tag may carry the opener's name; when it does, it has to match
    fn check_end_name(
        &self,
        opened: &str,
        end_clause: Clause,
        closer: Option<Expression>,
    ) -> Result<()> {
        let closer = closer.expect("subtree parses always return their closer");
        if let Some(Symbol::Variable(path)) = closer.left {
            if path[0] != opened {
                return Err(Error::missing_end_tag(
                    &format!("{} {}", end_clause.name(), opened),
                    &format!("{} {}", end_clause.name(), path[0]),
                ));
            }
        }
        Ok(())
    }
}

fn is_closing_clause(clause: Clause) -> bool {
    matches!(
        clause,
        Clause::Elif | Clause::Else | Clause::EndIf | Clause::EndFor | Clause::EndBlock
            | Clause::EndMacro
    )
}

fn expected_names(until: &[Clause]) -> String {
    until.iter().map(|c| c.name()).collect::<Vec<_>>().join("` or `")
}

// The extractors below rely on the validation done in `Expression::parse`:
// a clause that reached dispatch carries the symbols its grammar requires.

fn string_literal(expression: &Expression) -> String {
    match expression.left {
        Some(Symbol::Literal(Literal::Str(ref s))) => s.clone(),
        _ => unreachable!("validated at parse time"),
    }
}

fn single_name(expression: &Expression) -> String {
    match expression.left {
        Some(Symbol::Variable(ref path)) => path[0].clone(),
        _ => unreachable!("validated at parse time"),
    }
}

fn macro_signature(expression: &Expression) -> (String, Vec<String>) {
    match expression.left {
        Some(Symbol::Call { ref name, ref args }) => {
            let params = args
                .iter()
                .map(|arg| match arg {
                    Symbol::Variable(path) => path[0].clone(),
                    _ => unreachable!("validated at parse time"),
                })
                .collect();
            (name.clone(), params)
        }
        _ => unreachable!("validated at parse time"),
    }
}
