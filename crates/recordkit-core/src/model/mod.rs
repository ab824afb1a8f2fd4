mod declaration;
mod descriptor;
mod features;
mod field;


pub use declaration::{FieldDeclaration, RecordDeclaration};
pub use descriptor::{PostInit, RecordType, RecordTypeBuilder};
pub use features::Features;
pub use field::{
    DefaultFactory, FieldConfig, FieldDecl, FieldInit, FieldModel, FieldTable, Metadata,
    build_field_table,
};
