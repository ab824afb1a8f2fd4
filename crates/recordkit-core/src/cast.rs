use crate::{
    Error,
    error::{CastingError, ShapeError},
    matcher::cast_value,
    model::FieldModel,
    record::Record,
    report::FieldReport,
    value::Value,
};
use std::sync::Arc;
use tracing::debug;

///
/// cast_fields
///
/// Cast every field of a record into its declared shape. Successful casts
/// are written straight to storage; failures are collected and reported
/// once every field has been attempted.
///
pub fn cast_fields(record: &mut Record) -> Result<(), Error> {
    let ty = Arc::clone(record.record_type());
    let mut report = FieldReport::default();

    for (index, field) in ty.fields().iter().enumerate() {
        match cast_value(&record.values()[index], field.shape()) {
            Ok(cast) => record.set_raw(index, cast),
            Err(cause) => report.record(field, cause, |cause| message(field, cause)),
        }
    }

    if report.issue_count() > 0 {
        debug!(
            target: "recordkit::cast",
            record = ty.name(),
            failed = report.issue_count(),
            "record casting failed"
        );
    }

    report.finish(|issues| CastingError { issues }.into())
}

///
/// cast_field
/// Single-field form used by attribute writes.
///
pub fn cast_field(field: &FieldModel, value: &Value) -> Result<Value, Error> {
    cast_value(value, field.shape()).map_err(|cause| {
        FieldReport::single(
            field,
            cause,
            |cause| message(field, cause),
            |issues| CastingError { issues }.into(),
        )
    })
}

fn message(field: &FieldModel, cause: &ShapeError) -> String {
    format!("Casting error for field '{}': {cause}", field.name())
}
