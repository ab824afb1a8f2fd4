//! Recursive validate / cast over [`TypeShape`].
//!
//! Both walks are pure: they never touch a record, only the value handed in.

mod cast;
mod scalar;
mod validate;


pub use cast::cast_value;
pub use validate::validate_value;

use crate::{shape::TypeShape, value::Value};

/// Whether `value` already satisfies `shape` without conversion.
#[must_use]
pub fn satisfies(value: &Value, shape: &TypeShape) -> bool {
    validate_value(value, shape).is_ok()
}
