//! The data made available to one render call

use std::collections::HashMap;

use serde::ser::Serialize;
use serde_json::value::{to_value, Value};

use crate::errors::Result;
use crate::parser::ast::MacroDefinition;

/// The variable scopes and macros of one render call.
///
/// A context is a stack of scope frames: the frame built by the caller at
/// the bottom, one frame pushed (and popped, strict LIFO) for every block,
/// branch, loop and macro entered during rendering. Lookup walks the stack
/// innermost-first. Macros live next to the stack in a flat registry: once
/// defined anywhere in the active inheritance chain, a macro stays callable
/// for the rest of the render.
#[derive(Clone, Debug)]
pub struct Context {
    scopes: Vec<HashMap<String, Value>>,
    macros: HashMap<String, MacroDefinition>,
}

impl Context {
    /// Initializes an empty context
    pub fn new() -> Context {
        Context { scopes: vec![HashMap::new()], macros: HashMap::new() }
    }

    /// Converts the `val` parameter to `Value` and inserts it into the
    /// innermost scope.
    ///
    /// Panics if the serialization fails.
    ///
    /// ```rust
    /// # use weft::Context;
    /// let mut context = Context::new();
    /// context.insert("number_users", &42);
    /// ```
    pub fn insert<T: Serialize + ?Sized, S: Into<String>>(&mut self, key: S, val: &T) {
        self.current_scope().insert(key.into(), to_value(val).unwrap());
    }

    /// Converts the `val` parameter to `Value` and inserts it into the
    /// innermost scope.
    ///
    /// Returns an error if the serialization fails.
    ///
    /// ```rust
    /// # use weft::Context;
    /// # struct CannotBeSerialized;
    /// # impl serde::Serialize for CannotBeSerialized {
    /// #     fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
    /// #         Err(serde::ser::Error::custom("Error"))
    /// #     }
    /// # }
    /// # let user = CannotBeSerialized;
    /// let mut context = weft::Context::new();
    /// context.try_insert("user", &user)?;
    /// # Ok::<(), weft::Error>(())
    /// ```
    pub fn try_insert<T: Serialize + ?Sized, S: Into<String>>(
        &mut self,
        key: S,
        val: &T,
    ) -> Result<()> {
        self.current_scope().insert(key.into(), to_value(val)?);

        Ok(())
    }

    /// Checks if a value exists at a specific dotted path.
    pub fn contains_key(&self, path: &str) -> bool {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        match self.lookup_root(&segments[0]) {
            Some(value) => dotted_pointer(value, &segments[1..]).is_some(),
            None => false,
        }
    }

    fn current_scope(&mut self) -> &mut HashMap<String, Value> {
        self.scopes.last_mut().expect("context always has at least one scope")
    }

    /// Opens a new scope frame. Every `enter_scope` is paired with an
    /// `exit_scope` by the renderer.
    pub(crate) fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Closes the innermost scope frame.
    pub(crate) fn exit_scope(&mut self) {
        assert!(self.scopes.len() > 1, "mistakenly popped the origin scope");
        self.scopes.pop();
    }

    /// Binds an already-serialized value in the innermost scope
    pub(crate) fn insert_value(&mut self, key: &str, value: Value) {
        self.current_scope().insert(key.to_string(), value);
    }

    /// Finds the first scope holding `name`, walking innermost-first
    pub(crate) fn lookup_root(&self, name: &str) -> Option<&Value> {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Some(value);
            }
        }
        None
    }

    pub(crate) fn register_macro(&mut self, definition: MacroDefinition) {
        self.macros.insert(definition.name.clone(), definition);
    }

    pub(crate) fn get_macro(&self, name: &str) -> Option<&MacroDefinition> {
        self.macros.get(name)
    }
}

impl Default for Context {
    fn default() -> Context {
        Context::new()
    }
}

/// Descends `value` following path segments: object fields by name, array
/// elements by numeric segment. Returns `None` as soon as a segment does
/// not exist.
pub(crate) fn dotted_pointer<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = match current {
            Value::Object(map) => map.get(segment.as_str())?,
            Value::Array(array) => array.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}
