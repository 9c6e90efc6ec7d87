//! The uniform capability layer over values.
//!
//! Every value the evaluator touches goes through the [`Shell`] contract:
//! render to text, truth test, numeric coercion, field lookup, iteration
//! size. Comparisons are defined once here and inherited by every
//! implementation. Host values enter the engine as `serde_json::Value`
//! through serde, and the blanket implementation below covers them all;
//! `SymbolShell` adds the lazy layer that defers context lookups to the
//! point of use.

use std::borrow::Cow;

use serde_json::Value;

use crate::context::Context;
use crate::errors::{Error, Result};
use crate::parser::expression::Operator;
use crate::parser::symbol::{Literal, Symbol};

/// A value during one render, either borrowed from the context or
/// materialized on the fly
pub(crate) type Val<'a> = Cow<'a, Value>;

/// The capability contract a value honors to be usable in a template
pub trait Shell {
    /// Renders the value to text
    fn render(&self) -> Result<String>;

    /// Whether the value counts as true in a condition
    fn is_true(&self) -> bool;

    /// Integer coercion, if the value has one
    fn as_int(&self) -> Option<i64>;

    /// Float coercion, if the value has one. Integers coerce too.
    fn as_float(&self) -> Option<f64>;

    /// Number of elements, for sequence values
    fn count(&self) -> Result<usize>;

    /// Named child field lookup, for structured values
    fn child(&self, name: &str) -> Result<Value>;

    /// Compares two values.
    ///
    /// Integer coercion is preferred, falling back to floats when either
    /// side is not an integer. `==`/`!=` additionally fall back to
    /// comparing the rendered text when neither side has a numeric
    /// coercion, ordering operators fail with a value error instead.
    fn compare(&self, operator: Operator, other: &dyn Shell) -> Result<bool> {
        if let (Some(left), Some(right)) = (self.as_int(), other.as_int()) {
            return Ok(match operator {
                Operator::Equal => left == right,
                Operator::NotEqual => left != right,
                Operator::Less => left < right,
                Operator::LessOrEqual => left <= right,
                Operator::Greater => left > right,
                Operator::GreaterOrEqual => left >= right,
                _ => unreachable!("`{}` is not a comparison operator", operator),
            });
        }

        if let (Some(left), Some(right)) = (self.as_float(), other.as_float()) {
            return Ok(match operator {
                Operator::Equal => left == right,
                Operator::NotEqual => left != right,
                Operator::Less => left < right,
                Operator::LessOrEqual => left <= right,
                Operator::Greater => left > right,
                Operator::GreaterOrEqual => left >= right,
                _ => unreachable!("`{}` is not a comparison operator", operator),
            });
        }

        match operator {
            Operator::Equal => Ok(self.render()? == other.render()?),
            Operator::NotEqual => Ok(self.render()? != other.render()?),
            Operator::Less | Operator::LessOrEqual | Operator::Greater
            | Operator::GreaterOrEqual => Err(Error::value_error(format!(
                "Tried to compare a value with no numeric coercion using `{}`",
                operator
            ))),
            Operator::None | Operator::In | Operator::IsDefined => {
                unreachable!("`{}` is not a comparison operator", operator)
            }
        }
    }
}

impl Shell for Value {
    fn render(&self) -> Result<String> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok(String::new()),
            Value::Array(items) => {
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    rendered.push(item.render()?);
                }
                Ok(format!("[{}]", rendered.join(", ")))
            }
            Value::Object(_) => Ok(serde_json::to_string(self)?),
        }
    }

    fn is_true(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
        }
    }

    fn as_int(&self) -> Option<i64> {
        self.as_i64()
    }

    fn as_float(&self) -> Option<f64> {
        self.as_f64()
    }

    fn count(&self) -> Result<usize> {
        match self {
            Value::Array(items) => Ok(items.len()),
            _ => Err(Error::value_error("Tried to count a value that is not an array")),
        }
    }

    fn child(&self, name: &str) -> Result<Value> {
        match field(self, name) {
            Some(Field::Ref(value)) => Ok(value.clone()),
            Some(Field::Computed(value)) => Ok(value),
            None => Err(Error::field_not_found(name, name)),
        }
    }
}

/// A child field lookup result: a reference into the parent, or a value
/// computed on the fly (the synthetic `length` field)
enum Field<'v> {
    Ref(&'v Value),
    Computed(Value),
}

fn field<'v>(value: &'v Value, segment: &str) -> Option<Field<'v>> {
    match value {
        Value::Object(map) => map.get(segment).map(Field::Ref),
        Value::Array(array) => {
            if segment == "length" {
                return Some(Field::Computed(Value::from(array.len() as u64)));
            }
            segment.parse::<usize>().ok().and_then(|i| array.get(i)).map(Field::Ref)
        }
        Value::String(s) if segment == "length" => {
            Some(Field::Computed(Value::from(s.chars().count() as u64)))
        }
        _ => None,
    }
}

/// Resolves a dotted path against the context.
///
/// The root segment missing from every scope is a missing variable; a
/// missing sub-field is a field error. Distinguishing the two keeps the
/// render errors actionable.
pub(crate) fn resolve_path<'a>(
    context: &'a Context,
    path: &[String],
    template: &str,
) -> Result<Val<'a>> {
    let root = context
        .lookup_root(&path[0])
        .ok_or_else(|| Error::variable_not_found(&path.join("."), template))?;

    let mut current: Val<'a> = Cow::Borrowed(root);
    for segment in &path[1..] {
        current = match current {
            Cow::Borrowed(value) => match field(value, segment) {
                Some(Field::Ref(v)) => Cow::Borrowed(v),
                Some(Field::Computed(v)) => Cow::Owned(v),
                None => return Err(Error::field_not_found(segment, &path.join("."))),
            },
            Cow::Owned(value) => match field(&value, segment) {
                Some(Field::Ref(v)) => Cow::Owned(v.clone()),
                Some(Field::Computed(v)) => Cow::Owned(v),
                None => return Err(Error::field_not_found(segment, &path.join("."))),
            },
        };
    }
    Ok(current)
}

/// Lazily materializes the value behind a `Symbol`.
///
/// Nothing is looked up until a capability is asked for, which is what lets
/// `is defined` probe for existence without failing.
pub(crate) struct SymbolShell<'a> {
    symbol: &'a Symbol,
    context: &'a Context,
    /// Template name, for error messages
    template: &'a str,
}

impl<'a> SymbolShell<'a> {
    pub fn new(symbol: &'a Symbol, context: &'a Context, template: &'a str) -> SymbolShell<'a> {
        SymbolShell { symbol, context, template }
    }

    /// Resolves the symbol to a concrete value; context lookups happen
    /// here, at point of use
    pub fn resolve(&self) -> Result<Val<'a>> {
        match self.symbol {
            Symbol::Literal(literal) => Ok(Cow::Owned(match literal {
                Literal::Str(s) => Value::String(s.clone()),
                Literal::Char(c) => Value::String(c.to_string()),
                Literal::Int(i) => Value::from(*i),
                Literal::Float(f) => Value::from(*f),
                Literal::Bool(b) => Value::Bool(*b),
            })),
            Symbol::Variable(path) => resolve_path(self.context, path, self.template),
            Symbol::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    let shell = SymbolShell::new(item, self.context, self.template);
                    values.push(shell.resolve()?.into_owned());
                }
                Ok(Cow::Owned(Value::Array(values)))
            }
            Symbol::Call { name, .. } => Err(Error::msg(format!(
                "`{}` is a macro call and cannot be used as a plain value",
                name
            ))),
        }
    }

    /// Whether the symbol resolves without an error
    pub fn is_defined(&self) -> bool {
        self.resolve().is_ok()
    }
}

impl Shell for SymbolShell<'_> {
    fn render(&self) -> Result<String> {
        self.resolve()?.as_ref().render()
    }

    fn is_true(&self) -> bool {
        self.resolve().map(|value| value.as_ref().is_true()).unwrap_or(false)
    }

    fn as_int(&self) -> Option<i64> {
        self.resolve().ok().and_then(|value| value.as_ref().as_int())
    }

    fn as_float(&self) -> Option<f64> {
        self.resolve().ok().and_then(|value| value.as_ref().as_float())
    }

    fn count(&self) -> Result<usize> {
        self.resolve()?.as_ref().count()
    }

    fn child(&self, name: &str) -> Result<Value> {
        self.resolve()?.as_ref().child(name)
    }
}
