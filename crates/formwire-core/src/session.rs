#![forbid(unsafe_code)]

//! The form validation session.
//!
//! A [`FormSession`] owns the live [`FormState`] of one form and the
//! [`ObjectSchema`] composed from its field schemas at construction.
//!
//! # Validation Passes
//!
//! ```text
//!   validate(keys)
//!        │
//!        ├─ snapshot all field values
//!        │
//!        ├─ keys empty ──▶ full schema ──────────────┐
//!        │                                           │
//!        └─ keys given ──▶ unknown key? ─▶ InvalidKey │
//!                           │                        │
//!                           └─▶ partial schema over  │
//!                               requested keys only ─┤
//!                                                    ▼
//!                          ok: clear errors (all fields / requested keys)
//!                          issues: project onto fields, return Validation
//!                          fault: return Schema
//! ```
//!
//! All error-state writes of one pass happen inside a [`BatchScope`], so
//! subscribers are notified once per field with its final state.

use std::sync::Arc;

use formwire_reactive::BatchScope;
use formwire_schema::{ObjectSchema, ParseError, Schema};
use serde_json::{Map, Value};

use crate::error::{FormError, FormResult};
use crate::field::{FieldState, FormDefinition, FormState};
use crate::options::{SessionOptions, ValidationReport};
use crate::projection::project_issues;

/// Validation session for one form.
///
/// ```rust
/// use formwire_core::{FieldDefinition, FormDefinition, FormSession, SessionOptions};
/// use formwire_schema::{number, string};
/// use serde_json::json;
///
/// let session = FormSession::new(
///     FormDefinition::new()
///         .field("name", FieldDefinition::new().with_schema(string().min(3)))
///         .field(
///             "age",
///             FieldDefinition::new()
///                 .with_schema(number().min(18.0).message("You must be at least 18 years old")),
///         ),
///     SessionOptions::default(),
/// );
///
/// session.set_value("name", "Aaron");
/// session.set_value("age", 20);
/// assert!(session.validate(&[]).is_ok());
///
/// session.set_value("age", 17);
/// assert!(session.validate(&["age"]).is_err());
///
/// let age = session.form().get("age").unwrap();
/// assert_eq!(age.message(), "You must be at least 18 years old");
/// assert_eq!(age.extra().get("min"), Some(&json!(18)));
/// ```
#[derive(Debug)]
pub struct FormSession {
    form: FormState,
    schema: ObjectSchema,
    options: SessionOptions,
}

impl FormSession {
    /// Build a session from a form definition.
    ///
    /// The composed schema covers exactly the fields that declare a schema
    /// here; it never changes afterwards.
    #[must_use]
    pub fn new(definition: FormDefinition, options: SessionOptions) -> Self {
        let form = FormState::from_definition(&definition);
        let mut schema = ObjectSchema::new();
        for (key, field) in form.iter() {
            if let Some(field_schema) = field.schema() {
                schema.insert(key, Arc::clone(field_schema));
            }
        }
        tracing::debug!(
            fields = form.len(),
            validated = schema.len(),
            safe = options.safe,
            "form session created"
        );
        Self {
            form,
            schema,
            options,
        }
    }

    /// Live field state.
    #[must_use]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Shorthand for `form().get(key)`.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldState> {
        self.form.get(key)
    }

    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The composed schema.
    #[must_use]
    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    /// Write a field value. Returns `false` if the key is unknown.
    pub fn set_value(&self, key: &str, value: impl Into<Value>) -> bool {
        match self.form.get(key) {
            Some(field) => {
                field.value.set(value.into());
                true
            }
            None => false,
        }
    }

    /// Validate the whole form (`keys` empty) or only the listed keys.
    ///
    /// On a schema failure the matching fields' error state is written
    /// before the error is returned. Values are never modified.
    pub fn validate(&self, keys: &[&str]) -> FormResult<()> {
        let _batch = BatchScope::new();
        let values = self.form.snapshot();

        let outcome = if keys.is_empty() {
            tracing::debug!(mode = "full", "validating form");
            self.schema.parse_map(&values)
        } else {
            if let Some(unknown) = keys.iter().find(|k| !self.schema.contains_key(k)) {
                tracing::warn!(key = *unknown, "validate called with a key that has no schema");
                return Err(FormError::InvalidKey((*unknown).to_string()));
            }
            tracing::debug!(mode = "partial", ?keys, "validating form");
            let requested: Map<String, Value> = values
                .into_iter()
                .filter(|(k, _)| keys.iter().any(|key| *key == k.as_str()))
                .collect();
            self.schema.partial().parse_map(&requested)
        };

        match outcome {
            Ok(()) => {
                if keys.is_empty() {
                    for (_, field) in self.form.iter() {
                        field.clear_error();
                    }
                } else {
                    for key in keys {
                        if let Some(field) = self.form.get(key) {
                            field.clear_error();
                        }
                    }
                }
                Ok(())
            }
            Err(ParseError::Invalid(err)) => {
                let applied = project_issues(&err, &self.form);
                tracing::debug!(issues = err.issues.len(), applied, "form validation failed");
                Err(FormError::Validation(err))
            }
            Err(ParseError::Fault(fault)) => {
                tracing::warn!(error = %fault, "schema faulted during validation");
                Err(FormError::Schema(fault))
            }
        }
    }

    /// Like [`validate`](Self::validate), but reports every failure as a
    /// [`ValidationReport`] instead of an error.
    ///
    /// Schema failures report the configured failure message; other errors
    /// report their own message.
    pub fn validate_safe(&self, keys: &[&str]) -> ValidationReport {
        match self.validate(keys) {
            Ok(()) => ValidationReport::success(),
            Err(FormError::Validation(_)) => {
                ValidationReport::failure(self.options.failure_message.clone())
            }
            Err(other) => ValidationReport::failure(other.to_string()),
        }
    }

    /// Validate according to [`SessionOptions::safe`].
    ///
    /// In safe mode this never returns `Err`. Otherwise failures are returned
    /// as errors and success yields a successful report.
    pub fn check(&self, keys: &[&str]) -> FormResult<ValidationReport> {
        if self.options.safe {
            Ok(self.validate_safe(keys))
        } else {
            self.validate(keys).map(|()| ValidationReport::success())
        }
    }

    /// Reset the value and error state of `key`. Unknown keys are ignored.
    pub fn clear_one(&self, key: &str) {
        if let Some(field) = self.form.get(key) {
            field.clear();
            tracing::debug!(key, "field cleared");
        }
    }

    /// Reset the value and error state of every field.
    pub fn clear_all(&self) {
        let _batch = BatchScope::new();
        for key in self.form.keys() {
            self.clear_one(key);
        }
    }

    /// Returns `true` if the form currently passes full validation.
    ///
    /// Does not touch error state. A faulting schema counts as invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.schema.is_valid(&Value::Object(self.form.snapshot()))
    }
}
