#![forbid(unsafe_code)]

//! Form validation sessions for formwire.
//!
//! A [`FormSession`] binds a set of named fields, each with a value and an
//! optional schema, to observable state:
//! - Field values and error state live in [`Observable`]s that a UI layer
//!   writes and subscribes to
//! - [`FormSession::validate`] runs full or partial validation against the
//!   schema composed from all field schemas
//! - Failures are projected onto each field as a message plus structured
//!   `extra` data (see [`decorate_extra`])
//!
//! [`Observable`]: formwire_reactive::Observable
//!
//! # Safe Mode
//!
//! [`FormSession::validate`] returns `Result<(), FormError>`.
//! [`FormSession::validate_safe`] never fails and returns a
//! [`ValidationReport`]. [`FormSession::check`] picks one of the two based
//! on [`SessionOptions::safe`].
//!
//! # Invariants
//!
//! 1. Validation never writes field values.
//! 2. Fields without a schema are never validated.
//! 3. An unknown key passed to `validate` leaves all error state untouched.
//! 4. A successful pass clears error state for every field it covered.

pub mod error;
pub mod field;
pub mod options;
pub mod projection;
pub mod session;

pub use error::{FormError, FormResult};
pub use field::{FieldDefinition, FieldError, FieldState, FormDefinition, FormState, empty_value};
pub use options::{DEFAULT_FAILURE_MESSAGE, SessionOptions, ValidationReport};
pub use projection::{decorate_extra, field_error, project_issues};
pub use session::FormSession;
