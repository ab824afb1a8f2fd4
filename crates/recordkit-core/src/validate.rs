use crate::{
    Error,
    error::ValidationError,
    matcher::validate_value,
    model::FieldModel,
    record::Record,
    report::FieldReport,
    value::Value,
};
use tracing::debug;

///
/// validate_fields
///
/// Check every field of a record against its declared shape.
/// All failing fields are reported together; the record is never changed.
///
pub fn validate_fields(record: &Record) -> Result<(), Error> {
    let mut report = FieldReport::default();

    for (field, value) in record.record_type().fields().iter().zip(record.values()) {
        if let Err(cause) = validate_value(value, field.shape()) {
            report.record(field, cause, |_| message(field, value));
        }
    }

    if report.issue_count() > 0 {
        debug!(
            target: "recordkit::validate",
            record = record.type_name(),
            failed = report.issue_count(),
            "record validation failed"
        );
    }

    report.finish(|issues| ValidationError { issues }.into())
}

///
/// validate_field
/// Single-field form used by attribute writes.
///
pub fn validate_field(field: &FieldModel, value: &Value) -> Result<(), Error> {
    validate_value(value, field.shape()).map_err(|cause| {
        FieldReport::single(
            field,
            cause,
            |_| message(field, value),
            |issues| ValidationError { issues }.into(),
        )
    })
}

fn message(field: &FieldModel, value: &Value) -> String {
    format!(
        "Validation error for field '{}': expected {}, got {} of type {}",
        field.name(),
        field.shape(),
        value.repr(),
        value.kind_name()
    )
}
