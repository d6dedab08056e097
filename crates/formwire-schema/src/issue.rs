#![forbid(unsafe_code)]

//! Structured validation issues and the error types that carry them.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

// ---------------------------------------------------------------------------
// Issue Codes
// ---------------------------------------------------------------------------

/// Code for a value of the wrong type (or a missing required value).
pub const ISSUE_CODE_INVALID_TYPE: &str = "invalid_type";
/// Code for a value below its lower bound.
pub const ISSUE_CODE_TOO_SMALL: &str = "too_small";
/// Code for a value above its upper bound.
pub const ISSUE_CODE_TOO_BIG: &str = "too_big";
/// Code for a string that fails a format check.
pub const ISSUE_CODE_INVALID_STRING: &str = "invalid_string";
/// Code for a value outside an enumeration.
pub const ISSUE_CODE_INVALID_ENUM_VALUE: &str = "invalid_enum_value";
/// Code for a failed user refinement.
pub const ISSUE_CODE_CUSTOM: &str = "custom";

/// Received-type name used when an object key is absent.
pub const RECEIVED_UNDEFINED: &str = "undefined";

// ---------------------------------------------------------------------------
// IssueKind
// ---------------------------------------------------------------------------

/// What a bound applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundOrigin {
    /// Character count of a string.
    String,
    /// Numeric value.
    Number,
}

/// Which string format check failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StringValidation {
    Email,
    Url,
    Includes(String),
    StartsWith(String),
    EndsWith(String),
}

/// Classification of an [`Issue`], with the data needed to explain it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IssueKind {
    /// Value has the wrong type.
    InvalidType {
        expected: String,
        received: String,
    },
    /// Value is below `minimum`.
    TooSmall {
        minimum: Number,
        inclusive: bool,
        exact: bool,
        origin: BoundOrigin,
    },
    /// Value is above `maximum`.
    TooBig {
        maximum: Number,
        inclusive: bool,
        exact: bool,
        origin: BoundOrigin,
    },
    /// String fails a format check.
    InvalidString { validation: StringValidation },
    /// Value is not one of the allowed options.
    InvalidEnumValue {
        options: Vec<String>,
        received: String,
    },
    /// A refinement predicate rejected the value.
    Custom,
}

impl IssueKind {
    /// Stable code string for this kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidType { .. } => ISSUE_CODE_INVALID_TYPE,
            Self::TooSmall { .. } => ISSUE_CODE_TOO_SMALL,
            Self::TooBig { .. } => ISSUE_CODE_TOO_BIG,
            Self::InvalidString { .. } => ISSUE_CODE_INVALID_STRING,
            Self::InvalidEnumValue { .. } => ISSUE_CODE_INVALID_ENUM_VALUE,
            Self::Custom => ISSUE_CODE_CUSTOM,
        }
    }
}

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

/// A single validation failure.
///
/// `path` is empty when the issue was raised by a leaf schema; container
/// schemas prepend the key under which they found the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub path: Vec<String>,
    pub message: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl Issue {
    /// Create an issue with an empty path.
    #[must_use]
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
            kind,
        }
    }

    /// Prepend `key` to the issue path.
    #[must_use]
    pub fn at(mut self, key: impl Into<String>) -> Self {
        self.path.insert(0, key.into());
        self
    }

    /// Stable code string of the issue kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// First path segment, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

// ---------------------------------------------------------------------------
// SchemaError
// ---------------------------------------------------------------------------

/// A structural validation failure: one or more issues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaError {
    pub issues: Vec<Issue>,
}

/// Issues grouped by their first path segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenedIssues {
    /// Issues with an empty path.
    pub form_errors: Vec<String>,
    /// Messages keyed by field, in issue order.
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl SchemaError {
    #[must_use]
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Group issue messages by field.
    #[must_use]
    pub fn flatten(&self) -> FlattenedIssues {
        let mut flat = FlattenedIssues::default();
        for issue in &self.issues {
            match issue.field() {
                Some(field) => flat
                    .field_errors
                    .entry(field.to_string())
                    .or_default()
                    .push(issue.message.clone()),
                None => flat.form_errors.push(issue.message.clone()),
            }
        }
        flat
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation issue(s)", self.issues.len())?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

// ---------------------------------------------------------------------------
// SchemaFault
// ---------------------------------------------------------------------------

/// A schema could not finish checking a value.
///
/// Unlike [`SchemaError`] this says nothing about the value; it reports a
/// failure of the check itself (for example a fallible refinement that could
/// not reach its data source).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFault {
    pub path: Vec<String>,
    pub message: String,
}

impl SchemaFault {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Prepend `key` to the fault path.
    #[must_use]
    pub fn at(mut self, key: impl Into<String>) -> Self {
        self.path.insert(0, key.into());
        self
    }
}

impl fmt::Display for SchemaFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} (at {})", self.message, self.path.join("."))
        }
    }
}

impl std::error::Error for SchemaFault {}

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// Outcome of a failed [`parse`](crate::Schema::parse).
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The value does not satisfy the schema.
    Invalid(SchemaError),
    /// The schema could not run.
    Fault(SchemaFault),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Invalid(e) => write!(f, "{e}"),
            ParseError::Fault(e) => write!(f, "schema fault: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Invalid(e) => Some(e),
            ParseError::Fault(e) => Some(e),
        }
    }
}

impl From<SchemaError> for ParseError {
    fn from(e: SchemaError) -> Self {
        ParseError::Invalid(e)
    }
}

impl From<SchemaFault> for ParseError {
    fn from(e: SchemaFault) -> Self {
        ParseError::Fault(e)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Name of the JSON type of `value`, as reported in `received`.
#[must_use]
pub fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert a bound to a JSON number, keeping integral bounds integral.
#[must_use]
pub fn bound_number(bound: f64) -> Number {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if bound.fract() == 0.0 && bound.abs() <= MAX_SAFE {
        Number::from(bound as i64)
    } else {
        Number::from_f64(bound).unwrap_or_else(|| Number::from(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn too_small(min: f64) -> Issue {
        Issue::new(
            IssueKind::TooSmall {
                minimum: bound_number(min),
                inclusive: true,
                exact: false,
                origin: BoundOrigin::Number,
            },
            "too small",
        )
    }

    #[test]
    fn issue_codes() {
        assert_eq!(too_small(1.0).code(), "too_small");
        assert_eq!(Issue::new(IssueKind::Custom, "x").code(), "custom");
    }

    #[test]
    fn at_prepends_path() {
        let issue = too_small(1.0).at("inner").at("outer");
        assert_eq!(issue.path, vec!["outer", "inner"]);
        assert_eq!(issue.field(), Some("outer"));
        assert_eq!(issue.to_string(), "outer.inner: too small");
    }

    #[test]
    fn integral_bounds_stay_integral() {
        assert_eq!(Value::Number(bound_number(18.0)), json!(18));
        assert_eq!(Value::Number(bound_number(-3.0)), json!(-3));
        assert_eq!(Value::Number(bound_number(2.5)), json!(2.5));
    }

    #[test]
    fn non_finite_bound_falls_back() {
        assert_eq!(Value::Number(bound_number(f64::NAN)), json!(0));
    }

    #[test]
    fn issue_serializes_with_code_tag() {
        let issue = too_small(18.0).at("age");
        let v = serde_json::to_value(&issue).unwrap();
        assert_eq!(v["code"], json!("too_small"));
        assert_eq!(v["minimum"], json!(18));
        assert_eq!(v["origin"], json!("number"));
        assert_eq!(v["path"], json!(["age"]));
    }

    #[test]
    fn flatten_groups_by_field() {
        let err = SchemaError::new(vec![
            Issue::new(IssueKind::Custom, "a1").at("a"),
            Issue::new(IssueKind::Custom, "form"),
            Issue::new(IssueKind::Custom, "a2").at("a"),
            Issue::new(IssueKind::Custom, "b1").at("b"),
        ]);
        let flat = err.flatten();
        assert_eq!(flat.form_errors, vec!["form"]);
        assert_eq!(flat.field_errors["a"], vec!["a1", "a2"]);
        assert_eq!(flat.field_errors["b"], vec!["b1"]);
    }

    #[test]
    fn schema_error_display_lists_issues() {
        let err = SchemaError::new(vec![
            Issue::new(IssueKind::Custom, "bad").at("a"),
            Issue::new(IssueKind::Custom, "worse").at("b"),
        ]);
        assert_eq!(err.to_string(), "2 validation issue(s): a: bad; b: worse");
    }

    #[test]
    fn fault_display_includes_path() {
        let fault = SchemaFault::new("lookup failed").at("email");
        assert_eq!(fault.to_string(), "lookup failed (at email)");
    }

    #[test]
    fn value_type_names() {
        assert_eq!(value_type(&json!(null)), "null");
        assert_eq!(value_type(&json!(1)), "number");
        assert_eq!(value_type(&json!("x")), "string");
        assert_eq!(value_type(&json!([1])), "array");
        assert_eq!(value_type(&json!({})), "object");
        assert_eq!(value_type(&json!(true)), "boolean");
    }
}
