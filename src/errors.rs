//! The errors of the engine

use std::error::Error as StdError;
use std::fmt;

/// The kind of an error (non-exhaustive)
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Generic error
    Msg(String),
    /// A token in a tag could not be parsed into a symbol
    MalformedSymbol {
        /// The offending token
        token: String,
        /// Why it was rejected
        reason: String,
    },
    /// A tag body could not be parsed into an expression
    MalformedExpression {
        /// The offending tag body
        expression: String,
        /// Why it was rejected
        reason: String,
    },
    /// A control block was opened without a matching end tag
    MissingEndTag {
        /// The closer(s) that would have been valid
        expected: String,
        /// What was found instead
        found: String,
    },
    /// Two blocks with the same name in one template
    DuplicateBlock {
        /// Name of the block
        name: String,
        /// Name of the template defining it twice
        template: String,
    },
    /// Two macros with the same name in one template
    DuplicateMacro {
        /// Name of the macro
        name: String,
        /// Name of the template defining it twice
        template: String,
    },
    /// A template was referenced but is not registered
    TemplateNotFound(String),
    /// A template extends a template that is not registered
    MissingParent {
        /// The template we are currently looking at
        current: String,
        /// The missing parent
        parent: String,
    },
    /// A circular `extends` chain was found
    CircularExtend {
        /// Name of the template with the loop
        tpl: String,
        /// All the parent templates we found so far
        inheritance_chain: Vec<String>,
    },
    /// A variable was not found in any active scope
    VariableNotFound {
        /// Full path of the variable
        name: String,
        /// Name of the template where the lookup happened
        template: String,
    },
    /// A filter was referenced but is not registered
    FilterNotFound(String),
    /// A macro was called but is not registered
    MacroNotFound(String),
    /// A child field or array index does not exist on a value
    FieldNotFound {
        /// The field or index that was asked for
        field: String,
        /// Full path of the lookup
        path: String,
    },
    /// A value without numeric coercion was used where a number was needed
    ValueError(String),
    /// An IO error occurred
    Io(std::io::ErrorKind),
    /// A value could not be serialized through serde
    Json(serde_json::Error),
}

/// The Error type
#[derive(Debug)]
pub struct Error {
    /// Kind of error
    pub kind: ErrorKind,
    source: Option<Box<dyn StdError + Sync + Send>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ErrorKind::Msg(ref message) => write!(f, "{}", message),
            ErrorKind::MalformedSymbol { ref token, ref reason } => {
                write!(f, "Malformed symbol `{}`: {}", token, reason)
            }
            ErrorKind::MalformedExpression { ref expression, ref reason } => {
                write!(f, "Malformed expression `{}`: {}", expression, reason)
            }
            ErrorKind::MissingEndTag { ref expected, ref found } => {
                write!(f, "Missing end tag: expected `{}` but found `{}`", expected, found)
            }
            ErrorKind::DuplicateBlock { ref name, ref template } => {
                write!(f, "Block `{}` is defined twice in template `{}`", name, template)
            }
            ErrorKind::DuplicateMacro { ref name, ref template } => {
                write!(f, "Macro `{}` is defined twice in template `{}`", name, template)
            }
            ErrorKind::TemplateNotFound(ref name) => write!(f, "Template `{}` not found", name),
            ErrorKind::MissingParent { ref current, ref parent } => write!(
                f,
                "Template `{}` is inheriting from `{}`, which doesn't exist or isn't loaded yet",
                current, parent
            ),
            ErrorKind::CircularExtend { ref tpl, ref inheritance_chain } => write!(
                f,
                "Circular extend detected for template `{}`. Inheritance chain: `{:?}`",
                tpl, inheritance_chain
            ),
            ErrorKind::VariableNotFound { ref name, ref template } => {
                write!(f, "Variable `{}` not found in context while rendering `{}`", name, template)
            }
            ErrorKind::FilterNotFound(ref name) => write!(f, "Filter `{}` not found", name),
            ErrorKind::MacroNotFound(ref name) => write!(f, "Macro `{}` not found", name),
            ErrorKind::FieldNotFound { ref field, ref path } => {
                write!(f, "Field `{}` not found while resolving `{}`", field, path)
            }
            ErrorKind::ValueError(ref message) => write!(f, "{}", message),
            ErrorKind::Io(ref io_error) => {
                write!(f, "Io error while loading a template: {:?}", io_error)
            }
            ErrorKind::Json(ref e) => write!(f, "{}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|c| &**c as &(dyn StdError + 'static))
    }
}

impl Error {
    /// Creates generic error
    pub fn msg(value: impl ToString) -> Self {
        Self { kind: ErrorKind::Msg(value.to_string()), source: None }
    }

    /// Creates generic error with a cause
    pub fn chain(value: impl ToString, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self { kind: ErrorKind::Msg(value.to_string()), source: Some(source.into()) }
    }

    /// Creates a malformed symbol error
    pub fn malformed_symbol(token: &str, reason: &str) -> Self {
        Self {
            kind: ErrorKind::MalformedSymbol {
                token: token.to_string(),
                reason: reason.to_string(),
            },
            source: None,
        }
    }

    /// Creates a malformed expression error
    pub fn malformed_expression(expression: &str, reason: &str) -> Self {
        Self {
            kind: ErrorKind::MalformedExpression {
                expression: expression.to_string(),
                reason: reason.to_string(),
            },
            source: None,
        }
    }

    /// Creates a missing end tag error
    pub fn missing_end_tag(expected: &str, found: &str) -> Self {
        Self {
            kind: ErrorKind::MissingEndTag {
                expected: expected.to_string(),
                found: found.to_string(),
            },
            source: None,
        }
    }

    /// Creates a duplicate block error
    pub fn duplicate_block(name: &str, template: &str) -> Self {
        Self {
            kind: ErrorKind::DuplicateBlock {
                name: name.to_string(),
                template: template.to_string(),
            },
            source: None,
        }
    }

    /// Creates a duplicate macro error
    pub fn duplicate_macro(name: &str, template: &str) -> Self {
        Self {
            kind: ErrorKind::DuplicateMacro {
                name: name.to_string(),
                template: template.to_string(),
            },
            source: None,
        }
    }

    /// Creates a template not found error
    pub fn template_not_found(name: &str) -> Self {
        Self { kind: ErrorKind::TemplateNotFound(name.to_string()), source: None }
    }

    /// Creates a missing parent error
    pub fn missing_parent(current: &str, parent: &str) -> Self {
        Self {
            kind: ErrorKind::MissingParent {
                current: current.to_string(),
                parent: parent.to_string(),
            },
            source: None,
        }
    }

    /// Creates a circular extend error
    pub fn circular_extend(tpl: &str, inheritance_chain: Vec<String>) -> Self {
        Self {
            kind: ErrorKind::CircularExtend { tpl: tpl.to_string(), inheritance_chain },
            source: None,
        }
    }

    /// Creates a variable not found error
    pub fn variable_not_found(name: &str, template: &str) -> Self {
        Self {
            kind: ErrorKind::VariableNotFound {
                name: name.to_string(),
                template: template.to_string(),
            },
            source: None,
        }
    }

    /// Creates a filter not found error
    pub fn filter_not_found(name: &str) -> Self {
        Self { kind: ErrorKind::FilterNotFound(name.to_string()), source: None }
    }

    /// Creates a macro not found error
    pub fn macro_not_found(name: &str) -> Self {
        Self { kind: ErrorKind::MacroNotFound(name.to_string()), source: None }
    }

    /// Creates a field not found error
    pub fn field_not_found(field: &str, path: &str) -> Self {
        Self {
            kind: ErrorKind::FieldNotFound { field: field.to_string(), path: path.to_string() },
            source: None,
        }
    }

    /// Creates a value error
    pub fn value_error(message: impl ToString) -> Self {
        Self { kind: ErrorKind::ValueError(message.to_string()), source: None }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self { kind: ErrorKind::Io(error.kind()), source: Some(Box::new(error)) }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self { kind: ErrorKind::Json(error), source: None }
    }
}

/// Convenient wrapper around std::Result
pub type Result<T> = std::result::Result<T, Error>;
