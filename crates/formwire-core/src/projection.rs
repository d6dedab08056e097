#![forbid(unsafe_code)]

//! Projection of schema issues onto field error state.

use formwire_reactive::BatchScope;
use formwire_schema::{Issue, IssueKind, SchemaError};
use serde_json::{Map, Value};

use crate::field::{FieldError, FormState};

/// Structured extra data for an issue.
///
/// | issue kind | extra |
/// |------------|-------|
/// | `too_small` | `{"min": minimum}` |
/// | `too_big` | `{"max": maximum}` |
/// | anything else | `{}` |
///
/// ```rust
/// use formwire_core::decorate_extra;
/// use formwire_schema::{Schema, number};
/// use serde_json::json;
///
/// let issues = number().min(18.0).check(&json!(17)).unwrap();
/// let extra = decorate_extra(&issues[0]);
/// assert_eq!(extra.get("min"), Some(&json!(18)));
/// ```
#[must_use]
pub fn decorate_extra(issue: &Issue) -> Map<String, Value> {
    let mut extra = Map::new();
    match &issue.kind {
        IssueKind::TooSmall { minimum, .. } => {
            extra.insert("min".to_string(), Value::Number(minimum.clone()));
        }
        IssueKind::TooBig { maximum, .. } => {
            extra.insert("max".to_string(), Value::Number(maximum.clone()));
        }
        _ => {}
    }
    extra
}

/// Field error state for a single issue.
#[must_use]
pub fn field_error(issue: &Issue) -> FieldError {
    FieldError::new(issue.message.clone(), decorate_extra(issue))
}

/// Write every issue of `error` into the matching field of `form`.
///
/// Issues are applied in order, so when a field has several issues the last
/// one wins. Issues with an empty path, or whose first path segment names no
/// field, are skipped. Fields not mentioned keep their current error state.
/// Returns the number of issues applied.
pub fn project_issues(error: &SchemaError, form: &FormState) -> usize {
    let _batch = BatchScope::new();
    let mut applied = 0;
    for issue in &error.issues {
        let Some(key) = issue.field() else {
            continue;
        };
        let Some(field) = form.get(key) else {
            tracing::warn!(field = key, code = issue.code(), "issue names an unknown field");
            continue;
        };
        tracing::trace!(field = key, code = issue.code(), issue = %issue.message, "projecting issue");
        field.error.set(field_error(issue));
        applied += 1;
    }
    applied
}
