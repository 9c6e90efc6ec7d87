//! Parses a tag body into a clause, operator, symbols and filters

use std::fmt;

use crate::errors::{Error, Result};
use crate::parser::scanner::TagKind;
use crate::parser::symbol::{Literal, Symbol};
use crate::utils;

/// What a control or value tag does
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Clause {
    /// A `{{ ... }}` tag
    Value,
    /// `{% if ... %}`
    If,
    /// `{% elif ... %}`
    Elif,
    /// `{% else %}`
    Else,
    /// `{% endif %}`
    EndIf,
    /// `{% for x in y %}`
    For,
    /// `{% endfor %}`
    EndFor,
    /// `{% block name %}`
    Block,
    /// `{% endblock %}`
    EndBlock,
    /// `{% macro name(a, b) %}`
    Macro,
    /// `{% endmacro %}`
    EndMacro,
    /// `{% extends "name" %}`
    Extends,
    /// `{% include "name" %}`
    Include,
}

impl Clause {
    fn from_keyword(word: &str) -> Option<Clause> {
        match word {
            "if" => Some(Clause::If),
            "elif" => Some(Clause::Elif),
            "else" => Some(Clause::Else),
            "endif" => Some(Clause::EndIf),
            "for" => Some(Clause::For),
            "endfor" => Some(Clause::EndFor),
            "block" => Some(Clause::Block),
            "endblock" => Some(Clause::EndBlock),
            "macro" => Some(Clause::Macro),
            "endmacro" => Some(Clause::EndMacro),
            "extends" => Some(Clause::Extends),
            "include" => Some(Clause::Include),
            _ => None,
        }
    }

    /// The keyword as written in templates, for error messages
    pub fn name(self) -> &'static str {
        match self {
            Clause::Value => "a value tag",
            Clause::If => "if",
            Clause::Elif => "elif",
            Clause::Else => "else",
            Clause::EndIf => "endif",
            Clause::For => "for",
            Clause::EndFor => "endfor",
            Clause::Block => "block",
            Clause::EndBlock => "endblock",
            Clause::Macro => "macro",
            Clause::EndMacro => "endmacro",
            Clause::Extends => "extends",
            Clause::Include => "include",
        }
    }
}

/// The operator of a condition
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operator {
    /// No operator, a bare truth test
    None,
    /// `in`, collection membership
    In,
    /// `is [not] defined`
    IsDefined,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
}

impl Operator {
    fn from_token(token: &str) -> Option<Operator> {
        match token {
            "in" => Some(Operator::In),
            "==" => Some(Operator::Equal),
            "!=" => Some(Operator::NotEqual),
            "<" => Some(Operator::Less),
            "<=" => Some(Operator::LessOrEqual),
            ">" => Some(Operator::Greater),
            ">=" => Some(Operator::GreaterOrEqual),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match *self {
                Operator::None => "",
                Operator::In => "in",
                Operator::IsDefined => "is defined",
                Operator::Equal => "==",
                Operator::NotEqual => "!=",
                Operator::Less => "<",
                Operator::LessOrEqual => "<=",
                Operator::Greater => ">",
                Operator::GreaterOrEqual => ">=",
            }
        )
    }
}

/// A fully parsed tag body, immutable once built
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    /// What the tag does
    pub clause: Clause,
    /// The operator of a condition
    pub operator: Operator,
    /// `true` if the expression was negated with `not`
    pub negated: bool,
    /// The left-hand symbol, if the clause takes one
    pub left: Option<Symbol>,
    /// The right-hand symbol, if the operator takes one
    pub right: Option<Symbol>,
    /// Filter names, in application order
    pub filters: Vec<String>,
}

impl Expression {
    fn bare(clause: Clause) -> Expression {
        Expression {
            clause,
            operator: Operator::None,
            negated: false,
            left: None,
            right: None,
            filters: vec![],
        }
    }

    /// Parses a tag body. All grammar validation happens here, at parse
    /// time; a successfully built expression is structurally complete.
    pub fn parse(kind: TagKind, body: &str) -> Result<Expression> {
        let tokens = utils::tokenize(body)?;
        match kind {
            TagKind::Value => parse_value(&tokens, body),
            TagKind::Control => parse_control(&tokens, body),
            TagKind::Comment => unreachable!("comments are discarded before expression parsing"),
        }
    }
}

fn parse_value(tokens: &[String], body: &str) -> Result<Expression> {
    if tokens.is_empty() {
        return Err(Error::malformed_expression(body, "empty tag"));
    }

    let mut expression = Expression::bare(Clause::Value);
    let mut index = 0;

    if tokens[index] == "not" {
        expression.negated = true;
        index += 1;
        if tokens.get(index).map(String::as_str) == Some("not") {
            return Err(Error::malformed_expression(body, "double negation"));
        }
    }

    let token = tokens
        .get(index)
        .ok_or_else(|| Error::malformed_expression(body, "nothing to print"))?;
    expression.left = Some(Symbol::parse(token)?);
    index += 1;

    while index < tokens.len() {
        if tokens[index] != "|" {
            return Err(Error::malformed_expression(
                body,
                &format!("unexpected token `{}`", tokens[index]),
            ));
        }
        index += 1;
        let name = tokens
            .get(index)
            .ok_or_else(|| Error::malformed_expression(body, "`|` is missing a filter name"))?;
        if !utils::is_identifier(name) {
            return Err(Error::malformed_expression(
                body,
                &format!("`{}` is not a valid filter name", name),
            ));
        }
        expression.filters.push(name.to_string());
        index += 1;
    }

    Ok(expression)
}

fn parse_control(tokens: &[String], body: &str) -> Result<Expression> {
    if tokens.is_empty() {
        return Err(Error::malformed_expression(body, "empty tag"));
    }

    let clause = Clause::from_keyword(&tokens[0]).ok_or_else(|| {
        Error::malformed_expression(body, &format!("unknown clause `{}`", tokens[0]))
    })?;
    let rest = &tokens[1..];

    match clause {
        Clause::If | Clause::Elif => parse_condition(clause, rest, body),
        Clause::Else | Clause::EndIf | Clause::EndFor => {
            if !rest.is_empty() {
                return Err(Error::malformed_expression(
                    body,
                    &format!("`{}` takes no operand", clause.name()),
                ));
            }
            Ok(Expression::bare(clause))
        }
        Clause::EndBlock | Clause::EndMacro => {
            // an optional name is allowed, `{% endblock content %}`
            let mut expression = Expression::bare(clause);
            match rest {
                [] => {}
                [name] if utils::is_identifier(name) => {
                    expression.left = Some(Symbol::Variable(vec![name.to_string()]));
                }
                _ => {
                    return Err(Error::malformed_expression(
                        body,
                        &format!("`{}` takes at most one name", clause.name()),
                    ));
                }
            }
            Ok(expression)
        }
        Clause::For => parse_for(rest, body),
        Clause::Block => {
            let mut expression = Expression::bare(Clause::Block);
            match rest {
                [name] if utils::is_identifier(name) => {
                    expression.left = Some(Symbol::Variable(vec![name.to_string()]));
                }
                _ => {
                    return Err(Error::malformed_expression(
                        body,
                        "`block` takes exactly one name",
                    ));
                }
            }
            Ok(expression)
        }
        Clause::Macro => parse_macro(rest, body),
        Clause::Extends | Clause::Include => {
            let mut expression = Expression::bare(clause);
            let target = match rest {
                [token] => Symbol::parse(token)?,
                _ => {
                    return Err(Error::malformed_expression(
                        body,
                        &format!("`{}` takes exactly one template name", clause.name()),
                    ));
                }
            };
            match target {
                Symbol::Literal(Literal::Str(_)) => expression.left = Some(target),
                _ => {
                    return Err(Error::malformed_expression(
                        body,
                        &format!("`{}` takes a quoted template name", clause.name()),
                    ));
                }
            }
            Ok(expression)
        }
        Clause::Value => unreachable!("`value` is not a control keyword"),
    }
}

fn parse_condition(clause: Clause, tokens: &[String], body: &str) -> Result<Expression> {
    let mut expression = Expression::bare(clause);
    let mut index = 0;

    if tokens.get(index).map(String::as_str) == Some("not") {
        expression.negated = true;
        index += 1;
        if tokens.get(index).map(String::as_str) == Some("not") {
            return Err(Error::malformed_expression(body, "double negation"));
        }
    }

    let token = tokens
        .get(index)
        .ok_or_else(|| Error::malformed_expression(body, "condition is missing a value"))?;
    expression.left = Some(Symbol::parse(token)?);
    index += 1;

    if index == tokens.len() {
        // a bare truth test
        return Ok(expression);
    }

    let token = &tokens[index];
    if token == "is" {
        index += 1;
        if tokens.get(index).map(String::as_str) == Some("not") {
            if expression.negated {
                return Err(Error::malformed_expression(body, "double negation"));
            }
            expression.negated = true;
            index += 1;
        }
        match tokens.get(index).map(String::as_str) {
            Some("defined") => {}
            _ => {
                return Err(Error::malformed_expression(body, "expected `defined` after `is`"));
            }
        }
        index += 1;
        expression.operator = Operator::IsDefined;
        if index != tokens.len() {
            // `is [not] defined` takes no further operand
            return Err(Error::malformed_expression(
                body,
                &format!("unexpected token `{}` after `defined`", tokens[index]),
            ));
        }
        return Ok(expression);
    }

    expression.operator = Operator::from_token(token).ok_or_else(|| {
        Error::malformed_expression(body, &format!("unexpected token `{}`", token))
    })?;
    index += 1;

    let token = tokens.get(index).ok_or_else(|| {
        Error::malformed_expression(
            body,
            &format!("operator `{}` is missing a right-hand side", expression.operator),
        )
    })?;
    expression.right = Some(Symbol::parse(token)?);
    index += 1;

    if index != tokens.len() {
        return Err(Error::malformed_expression(
            body,
            &format!("unexpected token `{}`", tokens[index]),
        ));
    }

    Ok(expression)
}

fn parse_for(tokens: &[String], body: &str) -> Result<Expression> {
    let (value, container) = match tokens {
        [value, keyword, container] if keyword == "in" => (value, container),
        _ => {
            return Err(Error::malformed_expression(body, "expected `for <name> in <container>`"));
        }
    };

    let mut expression = Expression::bare(Clause::For);
    expression.operator = Operator::In;

    if !utils::is_identifier(value) {
        return Err(Error::malformed_expression(
            body,
            &format!("`{}` is not a valid loop variable name", value),
        ));
    }
    expression.left = Some(Symbol::Variable(vec![value.to_string()]));

    let container = Symbol::parse(container)?;
    match container {
        Symbol::Variable(_) | Symbol::Array(_) => expression.right = Some(container),
        _ => {
            return Err(Error::malformed_expression(
                body,
                "for loops iterate over an array literal or a context variable",
            ));
        }
    }

    Ok(expression)
}

fn parse_macro(tokens: &[String], body: &str) -> Result<Expression> {
    let signature = match tokens {
        [signature] => Symbol::parse(signature)?,
        _ => {
            return Err(Error::malformed_expression(body, "expected `macro name(a, b)`"));
        }
    };

    match &signature {
        Symbol::Call { args, .. } => {
            for arg in args {
                match arg {
                    Symbol::Variable(path) if path.len() == 1 => {}
                    _ => {
                        return Err(Error::malformed_expression(
                            body,
                            "macro parameters must be plain names",
                        ));
                    }
                }
            }
        }
        _ => {
            return Err(Error::malformed_expression(body, "expected `macro name(a, b)`"));
        }
    }

    let mut expression = Expression::bare(Clause::Macro);
    expression.left = Some(signature);
    Ok(expression)
}
