#![forbid(unsafe_code)]

//! Session error type.
//!
//! # Failure Modes
//!
//! | Error | Cause | Field error state |
//! |-------|-------|-------------------|
//! | `FormError::Validation` | One or more fields fail their schema | Written for every issue |
//! | `FormError::InvalidKey` | Requested key has no schema | Untouched |
//! | `FormError::Schema` | A schema could not run | Untouched |

use std::fmt;

use formwire_schema::{ParseError, SchemaError, SchemaFault};

/// Errors returned by [`FormSession`](crate::FormSession) validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    /// Schema validation failed; carries every issue found.
    Validation(SchemaError),
    /// A key passed to `validate` has no registered schema.
    InvalidKey(String),
    /// A schema faulted while checking a value.
    Schema(SchemaFault),
}

impl FormError {
    /// Returns `true` for a schema validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, FormError::Validation(_))
    }

    /// The underlying validation failure, if this is one.
    #[must_use]
    pub fn as_validation(&self) -> Option<&SchemaError> {
        match self {
            FormError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Validation(e) => write!(f, "{e}"),
            FormError::InvalidKey(key) => write!(f, "Invalid key: {key}"),
            FormError::Schema(e) => write!(f, "schema fault: {e}"),
        }
    }
}

impl std::error::Error for FormError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormError::Validation(e) => Some(e),
            FormError::InvalidKey(_) => None,
            FormError::Schema(e) => Some(e),
        }
    }
}

impl From<SchemaError> for FormError {
    fn from(e: SchemaError) -> Self {
        FormError::Validation(e)
    }
}

impl From<SchemaFault> for FormError {
    fn from(e: SchemaFault) -> Self {
        FormError::Schema(e)
    }
}

impl From<ParseError> for FormError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Invalid(e) => FormError::Validation(e),
            ParseError::Fault(e) => FormError::Schema(e),
        }
    }
}

/// Result type for session operations.
pub type FormResult<T> = Result<T, FormError>;
