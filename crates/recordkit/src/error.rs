use recordkit_core::{Error as CoreError, error::AccessError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type: a stable kind, the failing fields, and the message.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub fields: Vec<String>,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, fields: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            fields,
            message: message.into(),
        }
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();

        let (kind, fields) = match err {
            CoreError::AccessError(inner) => {
                let field = match inner {
                    AccessError::DeclaredFieldDelete { field, .. }
                    | AccessError::PrivateWrite { field }
                    | AccessError::PrivateNotFound { field }
                    | AccessError::UnknownAttribute { field, .. }
                    | AccessError::UndeclaredSlot { field, .. } => field,
                };
                (ErrorKind::Access, vec![field])
            }
            CoreError::CastingError(inner) => (ErrorKind::Casting, owned(inner.issues.fields())),
            CoreError::ConfigError(_) => (ErrorKind::Config, Vec::new()),
            CoreError::MissingFieldsError(inner) => (ErrorKind::MissingFields, inner.fields),
            CoreError::MutationError(_) => (ErrorKind::Mutation, Vec::new()),
            CoreError::NoHandlerError(inner) => (ErrorKind::NoHandler, vec![inner.field]),
            CoreError::UnexpectedFieldsError(inner) => (ErrorKind::UnexpectedFields, inner.fields),
            CoreError::ValidationError(inner) => {
                (ErrorKind::Validation, owned(inner.issues.fields()))
            }
        };

        Self::new(kind, fields, message)
    }
}

fn owned(fields: Vec<&str>) -> Vec<String> {
    fields.into_iter().map(str::to_string).collect()
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Attribute access the record type does not allow.
    Access,

    /// Lossy conversion failed for one or more fields.
    Casting,

    /// The record type declaration is invalid.
    Config,

    MissingFields,

    /// Write or delete on a frozen record.
    Mutation,

    /// A container kind has no element handler.
    NoHandler,

    UnexpectedFields,

    /// One or more fields do not match their declared shape.
    Validation,
}
