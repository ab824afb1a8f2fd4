//! ## Crate layout
//! - `core`: values, type shapes, the validate / cast engine, field models,
//!   feature composition and records.
//! - `error`: public error type with a stable kind taxonomy.
//!
//! The `prelude` module carries what declaring code needs: the builder,
//! feature flags, shapes, values and the `kwargs!` macro.

pub use recordkit_core as core;

pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::kwargs;
pub use error::{Error, ErrorKind};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        kwargs,
        model::{Features, FieldConfig, RecordDeclaration, RecordType, RecordTypeBuilder},
        record::Record,
        shape::TypeShape,
        value::{ContainerKind, MapKind, SeqKind, Value},
    };
    pub use crate::error::{Error, ErrorKind};
}
