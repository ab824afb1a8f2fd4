//! Core runtime for recordkit: values, type shapes, the validate / cast
//! engine, field models, feature composition and records.

#[macro_use]
mod macros;

// public exports are one module level down
pub mod cast;
pub mod compose;
pub mod error;
pub mod matcher;
pub mod model;
pub mod record;
pub mod shape;
pub mod validate;
pub mod value;

mod report;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary: declaring types, building
/// values and constructing records.
///

pub mod prelude {
    pub use crate::{
        kwargs,
        model::{Features, FieldConfig, RecordDeclaration, RecordType, RecordTypeBuilder},
        record::Record,
        shape::TypeShape,
        value::{ContainerKind, MapKind, SeqKind, Value},
    };
}
