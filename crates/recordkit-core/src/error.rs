use crate::value::Value;
use derive_more::{Deref, IntoIterator};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level error surfaced by declaration, construction and attribute writes.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error(transparent)]
    AccessError(#[from] AccessError),

    #[error(transparent)]
    CastingError(#[from] CastingError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    MissingFieldsError(#[from] MissingFieldsError),

    #[error(transparent)]
    MutationError(#[from] MutationError),

    #[error(transparent)]
    NoHandlerError(#[from] NoHandlerError),

    #[error(transparent)]
    UnexpectedFieldsError(#[from] UnexpectedFieldsError),

    #[error(transparent)]
    ValidationError(#[from] ValidationError),
}

///
/// ShapeError
///
/// Engine-level failure of a single value against a single shape.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ShapeError {
    #[error("expected {expected} positions, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("Cannot cast {value} of type {kind} to {target}: {reason}")]
    Coercion {
        value: String,
        kind: String,
        target: String,
        reason: String,
    },

    #[error("expected {expected}, got {value} of type {kind}")]
    Mismatch {
        expected: String,
        value: String,
        kind: String,
    },

    #[error("No {operation} handler available for type {kind}")]
    NoHandler { operation: Operation, kind: String },

    #[error("Cannot cast {value} of type {kind} to {target}: Cannot cast to any type in Union")]
    NoMemberAccepted {
        value: String,
        kind: String,
        target: String,
        attempts: Vec<Self>,
    },
}

impl ShapeError {
    pub(crate) fn mismatch(expected: &impl fmt::Display, value: &Value) -> Self {
        Self::Mismatch {
            expected: expected.to_string(),
            value: value.repr(),
            kind: value.kind_name(),
        }
    }

    pub(crate) fn coercion(
        value: &Value,
        target: &impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::Coercion {
            value: value.repr(),
            kind: value.kind_name(),
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn is_no_handler(&self) -> bool {
        matches!(self, Self::NoHandler { .. })
    }
}

///
/// Operation
/// The engine walk a shape error came from.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Validation,
    Casting,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => f.write_str("validation"),
            Self::Casting => f.write_str("casting"),
        }
    }
}

///
/// FieldIssue
/// One failing field inside an aggregate error.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
    pub cause: ShapeError,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

///
/// FieldIssues
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct FieldIssues(Vec<FieldIssue>);

impl FieldIssues {
    pub(crate) fn push(&mut self, issue: FieldIssue) {
        self.0.push(issue);
    }

    /// Names of the failing fields, in field order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|issue| issue.field.as_str()).collect()
    }
}

impl fmt::Display for FieldIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for issue in &self.0 {
            write!(f, "\n  - {issue};")?;
        }
        Ok(())
    }
}

///
/// ValidationError
///

#[derive(Clone, Debug, ThisError)]
#[error("{issues}")]
pub struct ValidationError {
    pub issues: FieldIssues,
}

///
/// CastingError
///

#[derive(Clone, Debug, ThisError)]
#[error("{issues}")]
pub struct CastingError {
    pub issues: FieldIssues,
}

///
/// ConfigError
/// Raised while declaring a record type.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("field '{field}': cannot specify both default and default_factory")]
    ConflictingDefaults { field: String },

    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },

    #[error("invalid feature '{0}'")]
    InvalidFeature(String),

    #[error(
        "Mutable default values are not allowed. Found {kind} {value}. \
         Use a default_factory returning {value} instead to avoid shared state issues."
    )]
    MutableDefault {
        field: String,
        kind: String,
        value: String,
    },

    #[error("{key_set} keys name undeclared field '{field}'")]
    UnknownKey { key_set: &'static str, field: String },
}

///
/// MissingFieldsError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub struct MissingFieldsError {
    pub type_name: String,
    pub fields: Vec<String>,
}

impl fmt::Display for MissingFieldsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.fields.len();
        let plural = if count > 1 { "s" } else { "" };

        write!(
            f,
            "{}.new() missing {count} required argument{plural}: {}",
            self.type_name,
            quoted_list(&self.fields)
        )
    }
}

///
/// UnexpectedFieldsError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{type_name}.new() got unexpected arguments: {}", quoted_list(.fields))]
pub struct UnexpectedFieldsError {
    pub type_name: String,
    pub fields: Vec<String>,
}

///
/// AccessError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AccessError {
    #[error("Cannot delete declared field '{field}' of {type_name}")]
    DeclaredFieldDelete { type_name: String, field: String },

    #[error("Cannot write to private fields directly. Use _{field} to set private fields.")]
    PrivateWrite { field: String },

    #[error("Private field '{field}' not found")]
    PrivateNotFound { field: String },

    #[error("{type_name} has no attribute '{field}'")]
    UnknownAttribute { type_name: String, field: String },

    #[error("{type_name} uses a compact layout and cannot hold undeclared attribute '{field}'")]
    UndeclaredSlot { type_name: String, field: String },
}

///
/// MutationError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MutationError {
    #[error("Cannot delete attributes from frozen record {type_name}")]
    Delete { type_name: String },

    #[error("Cannot modify attributes of frozen record {type_name}")]
    Modify { type_name: String },
}

///
/// NoHandlerError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("field '{field}': {cause}")]
pub struct NoHandlerError {
    pub field: String,
    pub cause: ShapeError,
}

fn quoted_list(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| format!("'{field}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
