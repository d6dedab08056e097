#![forbid(unsafe_code)]

//! The `Schema` trait and the modifiers every schema supports.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::issue::{Issue, IssueKind, ParseError, SchemaError, SchemaFault};

/// Issues found in a value, or a fault that stopped the check.
pub type CheckResult = Result<Vec<Issue>, SchemaFault>;

// ---------------------------------------------------------------------------
// Schema Trait
// ---------------------------------------------------------------------------

/// A declarative check over a JSON value.
///
/// `check` returns every issue it finds; an empty list means the value is
/// valid. Leaf schemas return issues with an empty path and containers
/// prefix the key under which they found each nested value.
///
/// # Implementing a Custom Schema
///
/// ```rust
/// use formwire_schema::{CheckResult, Issue, IssueKind, Schema};
/// use serde_json::{Value, json};
///
/// struct Even;
///
/// impl Schema for Even {
///     fn check(&self, value: &Value) -> CheckResult {
///         match value.as_i64() {
///             Some(n) if n % 2 == 0 => Ok(Vec::new()),
///             _ => Ok(vec![Issue::new(IssueKind::Custom, "Must be even")]),
///         }
///     }
///
///     fn type_name(&self) -> &'static str {
///         "even"
///     }
/// }
///
/// assert!(Even.is_valid(&json!(4)));
/// assert!(!Even.is_valid(&json!(3)));
/// ```
pub trait Schema: Send + Sync {
    /// Check `value` and report every issue found.
    fn check(&self, value: &Value) -> CheckResult;

    /// Short name of the accepted type, used in `expected`.
    fn type_name(&self) -> &'static str;

    /// Whether an absent object key satisfies this schema.
    fn accepts_missing(&self) -> bool {
        false
    }

    /// Check `value`, turning a non-empty issue list into an error.
    fn parse(&self, value: &Value) -> Result<(), ParseError> {
        let issues = self.check(value)?;
        if issues.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::new(issues).into())
        }
    }

    /// Returns `true` if `value` passes and the schema did not fault.
    fn is_valid(&self, value: &Value) -> bool {
        matches!(self.check(value), Ok(issues) if issues.is_empty())
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn check(&self, value: &Value) -> CheckResult {
        (**self).check(value)
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn accepts_missing(&self) -> bool {
        (**self).accepts_missing()
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn check(&self, value: &Value) -> CheckResult {
        (**self).check(value)
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn accepts_missing(&self) -> bool {
        (**self).accepts_missing()
    }
}

/// Build the issue for a value of the wrong type.
pub(crate) fn invalid_type(expected: &str, value: &Value, message: Option<&str>) -> Issue {
    let received = crate::issue::value_type(value);
    let message = message
        .map(str::to_string)
        .unwrap_or_else(|| format!("Expected {expected}, received {received}"));
    Issue::new(
        IssueKind::InvalidType {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        message,
    )
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifiers available on every sized schema.
pub trait SchemaExt: Schema + Sized {
    /// Let absent keys and `null` pass.
    fn optional(self) -> Optional<Self> {
        Optional { inner: self }
    }

    /// Reject values for which `predicate` returns `false`.
    ///
    /// The predicate only runs when the inner schema reported no issues.
    fn refine<F>(self, predicate: F, message: impl Into<String>) -> Refine<Self, F>
    where
        F: Fn(&Value) -> bool + Send + Sync,
    {
        Refine {
            inner: self,
            predicate,
            message: message.into(),
        }
    }

    /// Like [`refine`](SchemaExt::refine), but the check itself may fail.
    ///
    /// `Err(reason)` from `check` aborts validation with a [`SchemaFault`].
    fn try_refine<F>(self, check: F, message: impl Into<String>) -> TryRefine<Self, F>
    where
        F: Fn(&Value) -> Result<bool, String> + Send + Sync,
    {
        TryRefine {
            inner: self,
            check,
            message: message.into(),
        }
    }

    /// Erase the concrete type.
    fn into_arc(self) -> Arc<dyn Schema>
    where
        Self: 'static,
    {
        Arc::new(self)
    }
}

impl<S: Schema + Sized> SchemaExt for S {}

/// Schema that also accepts a missing or `null` value.
#[derive(Debug, Clone)]
pub struct Optional<S> {
    inner: S,
}

impl<S: Schema> Schema for Optional<S> {
    fn check(&self, value: &Value) -> CheckResult {
        if value.is_null() {
            return Ok(Vec::new());
        }
        self.inner.check(value)
    }

    fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    fn accepts_missing(&self) -> bool {
        true
    }
}

/// Schema with an additional predicate.
pub struct Refine<S, F> {
    inner: S,
    predicate: F,
    message: String,
}

impl<S, F> Schema for Refine<S, F>
where
    S: Schema,
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn check(&self, value: &Value) -> CheckResult {
        let issues = self.inner.check(value)?;
        if !issues.is_empty() || (self.predicate)(value) {
            return Ok(issues);
        }
        Ok(vec![Issue::new(IssueKind::Custom, self.message.clone())])
    }

    fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    fn accepts_missing(&self) -> bool {
        self.inner.accepts_missing()
    }
}

impl<S: fmt::Debug, F> fmt::Debug for Refine<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refine")
            .field("inner", &self.inner)
            .field("message", &self.message)
            .finish()
    }
}

/// Schema with an additional fallible predicate.
pub struct TryRefine<S, F> {
    inner: S,
    check: F,
    message: String,
}

impl<S, F> Schema for TryRefine<S, F>
where
    S: Schema,
    F: Fn(&Value) -> Result<bool, String> + Send + Sync,
{
    fn check(&self, value: &Value) -> CheckResult {
        let issues = self.inner.check(value)?;
        if !issues.is_empty() {
            return Ok(issues);
        }
        match (self.check)(value) {
            Ok(true) => Ok(issues),
            Ok(false) => Ok(vec![Issue::new(IssueKind::Custom, self.message.clone())]),
            Err(reason) => Err(SchemaFault::new(reason)),
        }
    }

    fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    fn accepts_missing(&self) -> bool {
        self.inner.accepts_missing()
    }
}

impl<S: fmt::Debug, F> fmt::Debug for TryRefine<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryRefine")
            .field("inner", &self.inner)
            .field("message", &self.message)
            .finish()
    }
}
