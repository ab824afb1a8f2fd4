use crate::{
    Error,
    error::{FieldIssue, FieldIssues, NoHandlerError, ShapeError},
    model::FieldModel,
};

///
/// FieldReport
///
/// Collects per-field failures across a whole-record pass. Missing handlers
/// are fatal: the first one is kept and reported instead of the issues.
///

#[derive(Debug, Default)]
pub(crate) struct FieldReport {
    issues: FieldIssues,
    fatal: Option<NoHandlerError>,
}

impl FieldReport {
    pub(crate) fn record(
        &mut self,
        field: &FieldModel,
        cause: ShapeError,
        message: impl FnOnce(&ShapeError) -> String,
    ) {
        if cause.is_no_handler() {
            if self.fatal.is_none() {
                self.fatal = Some(NoHandlerError {
                    field: field.name().to_string(),
                    cause,
                });
            }
            return;
        }

        self.issues.push(FieldIssue {
            field: field.name().to_string(),
            message: message(&cause),
            cause,
        });
    }

    /// Error for a single-field failure outside a whole-record pass.
    pub(crate) fn single(
        field: &FieldModel,
        cause: ShapeError,
        message: impl FnOnce(&ShapeError) -> String,
        aggregate: impl FnOnce(FieldIssues) -> Error,
    ) -> Error {
        let mut report = Self::default();
        report.record(field, cause, message);

        match report.fatal {
            Some(fatal) => fatal.into(),
            None => aggregate(report.issues),
        }
    }

    pub(crate) fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub(crate) fn finish(self, aggregate: impl FnOnce(FieldIssues) -> Error) -> Result<(), Error> {
        if let Some(fatal) = self.fatal {
            return Err(fatal.into());
        }

        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(aggregate(self.issues))
        }
    }
}
