#![forbid(unsafe_code)]

//! formwire public facade crate.
//!
//! This crate provides the stable surface area for users. It re-exports the
//! session, schema and reactive types from the internal crates and offers a
//! prelude for day-to-day usage.
//!
//! ```rust
//! use formwire::prelude::*;
//! use serde_json::json;
//!
//! let session = formwire::create(
//!     FormDefinition::new()
//!         .field("name", FieldDefinition::new().with_schema(string().min(3)))
//!         .field("age", FieldDefinition::new().with_schema(number().min(18.0))),
//!     SessionOptions::safe(),
//! );
//!
//! session.set_value("name", "Aaron");
//! session.set_value("age", 17);
//!
//! let report = session.check(&["age"])?;
//! assert!(!report.success);
//! assert_eq!(session.form().get("age").unwrap().extra().get("min"), Some(&json!(18)));
//! # Ok::<(), formwire::Error>(())
//! ```

use std::fmt;

// --- Session re-exports ----------------------------------------------------

pub use formwire_core::{
    DEFAULT_FAILURE_MESSAGE, FieldDefinition, FieldError, FieldState, FormDefinition, FormError,
    FormSession, FormState, SessionOptions, ValidationReport, decorate_extra, empty_value,
    field_error, project_issues,
};

// --- Schema re-exports -----------------------------------------------------

pub use formwire_schema::{
    BooleanSchema, EnumSchema, Issue, IssueKind, NumberSchema, ObjectSchema, ParseError, Schema,
    SchemaError, SchemaExt, SchemaFault, StringSchema, boolean, enumeration, number, object,
    string,
};

// --- Reactive re-exports ---------------------------------------------------

pub use formwire_reactive::{BatchScope, Observable, Subscription};

/// Build a validation session. Equivalent to [`FormSession::new`].
#[must_use]
pub fn create(definition: FormDefinition, options: SessionOptions) -> FormSession {
    FormSession::new(definition, options)
}

// --- Errors ---------------------------------------------------------------

/// Top-level error type for formwire users.
#[derive(Debug)]
pub enum Error {
    /// Validation or usage error from a session.
    Form(FormError),
    /// Options document could not be parsed.
    Options(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form(err) => write!(f, "{err}"),
            Self::Options(err) => write!(f, "invalid session options: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Form(err) => Some(err),
            Self::Options(err) => Some(err),
        }
    }
}

impl From<FormError> for Error {
    fn from(err: FormError) -> Self {
        Self::Form(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Options(err)
    }
}

/// Standard result type for formwire APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a session with options parsed from a JSON document.
pub fn create_with_json_options(definition: FormDefinition, options: &str) -> Result<FormSession> {
    let options = SessionOptions::from_json(options)?;
    Ok(FormSession::new(definition, options))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, FieldDefinition, FormDefinition, FormError, FormSession, Result, Schema,
        SchemaExt, SessionOptions, ValidationReport, boolean, enumeration, number, object,
        string,
    };

    pub use crate::{core, reactive, schema};
}

pub use formwire_core as core;
pub use formwire_reactive as reactive;
pub use formwire_schema as schema;
