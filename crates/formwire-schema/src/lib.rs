#![forbid(unsafe_code)]

//! Composable value schemas with structured issue reporting.
//!
//! This crate provides the schema layer that `formwire` sessions validate
//! against:
//! - A core [`Schema`] trait over JSON values
//! - Built-in schemas for strings, numbers, booleans and string enums
//! - [`ObjectSchema`] for composing named field schemas, with a relaxed
//!   [`partial`](ObjectSchema::partial) variant
//! - Structured [`Issue`]s carrying a path, a message and a classified
//!   [`IssueKind`] (including bound values for size checks)
//!
//! # Example
//!
//! ```rust
//! use formwire_schema::{IssueKind, ParseError, Schema, number, object, string};
//! use serde_json::json;
//!
//! let schema = object()
//!     .field("name", string().min(3))
//!     .field("age", number().min(18.0).message("You must be at least 18 years old"));
//!
//! let err = schema.parse(&json!({"name": "Aaron", "age": 17})).unwrap_err();
//! let ParseError::Invalid(err) = err else { panic!("schema faulted") };
//!
//! assert_eq!(err.issues[0].path, vec!["age"]);
//! assert_eq!(err.issues[0].message, "You must be at least 18 years old");
//! assert!(matches!(err.issues[0].kind, IssueKind::TooSmall { .. }));
//! ```
//!
//! # Invariants
//!
//! 1. A type mismatch yields exactly one `invalid_type` issue and no further
//!    checks run on that value.
//! 2. Every failing check of a type-correct value is reported, in the order
//!    the checks were added.
//! 3. Integral bounds are reported as JSON integers.

pub mod issue;
pub mod number;
pub mod object;
pub mod primitive;
pub mod schema;
pub mod string;

pub use issue::{
    BoundOrigin, FlattenedIssues, ISSUE_CODE_CUSTOM, ISSUE_CODE_INVALID_ENUM_VALUE,
    ISSUE_CODE_INVALID_STRING, ISSUE_CODE_INVALID_TYPE, ISSUE_CODE_TOO_BIG,
    ISSUE_CODE_TOO_SMALL, Issue, IssueKind, ParseError, SchemaError, SchemaFault,
    StringValidation, bound_number, value_type,
};
pub use number::{NumberSchema, number};
pub use object::{ObjectSchema, object};
pub use primitive::{BooleanSchema, EnumSchema, boolean, enumeration};
pub use schema::{CheckResult, Optional, Refine, Schema, SchemaExt, TryRefine};
pub use string::{StringSchema, string};
