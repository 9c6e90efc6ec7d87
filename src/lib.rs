//! # Weft
//!
//! A template engine for Rust inspired by [Jinja2] and [Django] templates:
//! literal text interleaved with `{{ value }}`, `{% control %}` and
//! `{# comment #}` tags.
//!
//! ## Features
//!
//! - Variable interpolation with dotted paths and filters
//! - Conditionals (`if` / `elif` / `else`) and `for` loops with a `loop`
//!   record
//! - Named blocks overridable through template inheritance (`extends`),
//!   with the parent content available as `{{ super }}`
//! - Includes and parametrized macros
//! - Whitespace control with `{{-` / `-}}` trim markers
//! - Eager parsing: a registered template is syntactically well-formed
//!
//! ## Example
//!
//! ```rust
//! use weft::{Context, Engine};
//!
//! // Create a new Engine instance and add a template from a string
//! let engine = Engine::default();
//! engine.add_raw_template("hello", "Hello, {{ name }}!").unwrap();
//!
//! // Prepare the context with some data
//! let mut context = Context::new();
//! context.insert("name", "World");
//!
//! // Render the template with the given context
//! let rendered = engine.render("hello", &mut context).unwrap();
//! assert_eq!(rendered, "Hello, World!");
//! ```
//!
//! Templates in a directory can be loaded in one go with a glob:
//!
//! ```rust,no_run
//! # use weft::Engine;
//! let engine = Engine::new("templates/**/*").unwrap();
//! ```
//!
//! [Jinja2]: http://jinja.pocoo.org/
//! [Django]: https://docs.djangoproject.com/en/3.1/topics/templates/

#![deny(missing_docs)]

mod context;
mod engine;
mod errors;
mod filters;
mod parser;
mod renderer;
mod shell;
mod template;
mod utils;

// Library exports.

pub use crate::context::Context;
pub use crate::engine::Engine;
pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::filters::FilterFn;
pub use crate::shell::Shell;
pub use crate::utils::escape_html;
// The operator enum is part of the `Shell` comparison contract
pub use crate::parser::expression::Operator;
// Template and the AST are meant to be used internally only but are
// exported for tests; changing them is not considered a breaking change
#[doc(hidden)]
pub use crate::parser::ast;
#[doc(hidden)]
pub use crate::template::Template;
// Re-export Value and other useful things from serde
// so apps/tools can encode data in template types
pub use serde_json::value::{from_value, to_value, Map, Number, Value};
