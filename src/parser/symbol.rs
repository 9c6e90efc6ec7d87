//! Parses a single token into a value descriptor

use std::fmt;

use crate::errors::{Error, Result};
use crate::utils;

/// A literal value found in a tag
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// A `"..."` string
    Str(String),
    /// A `'c'` single character
    Char(char),
    /// An integer
    Int(i64),
    /// A float
    Float(f64),
    /// `true` or `false`
    Bool(bool),
}

/// What a single token of a tag describes
#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    /// A literal value
    Literal(Literal),
    /// A dotted variable path, one entry per segment
    Variable(Vec<String>),
    /// A `[a, b, c]` array of symbols
    Array(Vec<Symbol>),
    /// A `name(arg, ...)` call
    Call {
        /// Name of the macro being called
        name: String,
        /// The arguments, in call order
        args: Vec<Symbol>,
    },
}

impl Symbol {
    /// Parses one token, dispatching on its first/last characters
    pub fn parse(token: &str) -> Result<Symbol> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::malformed_symbol(token, "empty token"));
        }

        if token.starts_with('"') {
            if token.len() < 2 || !token.ends_with('"') {
                return Err(Error::malformed_symbol(token, "unterminated string literal"));
            }
            return Ok(Symbol::Literal(Literal::Str(token[1..token.len() - 1].to_string())));
        }

        if token.starts_with('\'') {
            if token.len() < 2 || !token.ends_with('\'') {
                return Err(Error::malformed_symbol(token, "unterminated char literal"));
            }
            let inner = &token[1..token.len() - 1];
            let mut chars = inner.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Symbol::Literal(Literal::Char(c))),
                _ => Err(Error::malformed_symbol(
                    token,
                    "char literals hold exactly one character",
                )),
            };
        }

        if token.starts_with('[') {
            if !token.ends_with(']') {
                return Err(Error::malformed_symbol(token, "unterminated array"));
            }
            let mut items = vec![];
            for part in utils::split_top_level(&token[1..token.len() - 1], ',')? {
                items.push(Symbol::parse(&part)?);
            }
            return Ok(Symbol::Array(items));
        }

        if token.starts_with(|c: char| c.is_ascii_digit()) {
            return parse_number(token);
        }

        if token == "true" || token == "false" {
            return Ok(Symbol::Literal(Literal::Bool(token == "true")));
        }

        if let Some(open) = token.find('(') {
            if !token.ends_with(')') {
                return Err(Error::malformed_symbol(token, "unterminated call"));
            }
            let name = &token[..open];
            if !utils::is_identifier(name) {
                return Err(Error::malformed_symbol(token, "invalid call name"));
            }
            let mut args = vec![];
            for part in utils::split_top_level(&token[open + 1..token.len() - 1], ',')? {
                args.push(Symbol::parse(&part)?);
            }
            return Ok(Symbol::Call { name: name.to_string(), args });
        }

        // anything else is a dotted variable path; numeric segments index arrays
        let mut path = Vec::new();
        for segment in token.split('.') {
            if !utils::is_identifier(segment) && segment.parse::<usize>().is_err() {
                return Err(Error::malformed_symbol(
                    token,
                    &format!("invalid path segment `{}`", segment),
                ));
            }
            path.push(segment.to_string());
        }
        Ok(Symbol::Variable(path))
    }
}

fn parse_number(token: &str) -> Result<Symbol> {
    match token.matches('.').count() {
        0 => match token.parse::<i64>() {
            Ok(value) => Ok(Symbol::Literal(Literal::Int(value))),
            Err(_) => Err(Error::malformed_symbol(token, "invalid integer")),
        },
        1 => match token.parse::<f64>() {
            Ok(value) => Ok(Symbol::Literal(Literal::Float(value))),
            Err(_) => Err(Error::malformed_symbol(token, "invalid float")),
        },
        _ => Err(Error::malformed_symbol(token, "two dots in a number")),
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Literal(Literal::Str(s)) => write!(f, "\"{}\"", s),
            Symbol::Literal(Literal::Char(c)) => write!(f, "'{}'", c),
            Symbol::Literal(Literal::Int(i)) => write!(f, "{}", i),
            Symbol::Literal(Literal::Float(v)) => write!(f, "{}", v),
            Symbol::Literal(Literal::Bool(b)) => write!(f, "{}", b),
            Symbol::Variable(path) => write!(f, "{}", path.join(".")),
            Symbol::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Symbol::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
