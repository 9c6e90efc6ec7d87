//! The built-in filters

pub mod string;

use crate::errors::Result;

/// The filter function type definition: a pure `String → String` transform.
///
/// Filters are registered by name on the engine and chained left to right
/// with `{{ value | a | b }}`.
pub type FilterFn = fn(String) -> Result<String>;
