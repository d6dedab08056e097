#![forbid(unsafe_code)]

//! String schema and its checks.

use serde_json::Value;

use crate::issue::{BoundOrigin, Issue, IssueKind, StringValidation, bound_number};
use crate::schema::{CheckResult, Schema, invalid_type};

#[derive(Debug, Clone, PartialEq)]
enum StringRule {
    Min(usize),
    Max(usize),
    Length(usize),
    Email,
    Url,
    Includes(String),
    StartsWith(String),
    EndsWith(String),
}

#[derive(Debug, Clone)]
struct StringCheck {
    rule: StringRule,
    message: Option<String>,
}

/// Schema accepting JSON strings.
///
/// Lengths count `char`s, so `"café"` has length 4.
///
/// ```rust
/// use formwire_schema::{Schema, string};
/// use serde_json::json;
///
/// let name = string().min(3).message("Name must be at least 3 characters long");
/// assert!(name.is_valid(&json!("Aaron")));
///
/// let issues = name.check(&json!("A")).unwrap();
/// assert_eq!(issues[0].message, "Name must be at least 3 characters long");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    checks: Vec<StringCheck>,
    type_message: Option<String>,
    trim: bool,
}

/// Create a string schema.
#[must_use]
pub fn string() -> StringSchema {
    StringSchema::new()
}

impl StringSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, rule: StringRule) -> Self {
        self.checks.push(StringCheck {
            rule,
            message: None,
        });
        self
    }

    /// Override the message of the most recently added check.
    ///
    /// With no checks yet, overrides the wrong-type message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        let message = Some(message.into());
        match self.checks.last_mut() {
            Some(check) => check.message = message,
            None => self.type_message = message,
        }
        self
    }

    /// At least `min` characters.
    #[must_use]
    pub fn min(self, min: usize) -> Self {
        self.push(StringRule::Min(min))
    }

    /// At most `max` characters.
    #[must_use]
    pub fn max(self, max: usize) -> Self {
        self.push(StringRule::Max(max))
    }

    /// Exactly `len` characters.
    #[must_use]
    pub fn length(self, len: usize) -> Self {
        self.push(StringRule::Length(len))
    }

    /// At least one character.
    #[must_use]
    pub fn nonempty(self) -> Self {
        self.min(1)
    }

    #[must_use]
    pub fn email(self) -> Self {
        self.push(StringRule::Email)
    }

    /// Must start with `http://` or `https://` followed by a host.
    #[must_use]
    pub fn url(self) -> Self {
        self.push(StringRule::Url)
    }

    #[must_use]
    pub fn includes(self, needle: impl Into<String>) -> Self {
        self.push(StringRule::Includes(needle.into()))
    }

    #[must_use]
    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        self.push(StringRule::StartsWith(prefix.into()))
    }

    #[must_use]
    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        self.push(StringRule::EndsWith(suffix.into()))
    }

    /// Run checks against the value with surrounding whitespace removed.
    #[must_use]
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    fn run(check: &StringCheck, value: &str) -> Option<Issue> {
        let len = value.chars().count();
        let (kind, default) = match &check.rule {
            StringRule::Min(min) if len < *min => (
                too_small(*min, false),
                format!("String must contain at least {min} character(s)"),
            ),
            StringRule::Max(max) if len > *max => (
                too_big(*max, false),
                format!("String must contain at most {max} character(s)"),
            ),
            StringRule::Length(exact) if len < *exact => (
                too_small(*exact, true),
                format!("String must contain exactly {exact} character(s)"),
            ),
            StringRule::Length(exact) if len > *exact => (
                too_big(*exact, true),
                format!("String must contain exactly {exact} character(s)"),
            ),
            StringRule::Email if !is_email(value) => (
                invalid_string(StringValidation::Email),
                "Invalid email".to_string(),
            ),
            StringRule::Url if !is_url(value) => (
                invalid_string(StringValidation::Url),
                "Invalid url".to_string(),
            ),
            StringRule::Includes(needle) if !value.contains(needle.as_str()) => (
                invalid_string(StringValidation::Includes(needle.clone())),
                format!("Invalid input: must include \"{needle}\""),
            ),
            StringRule::StartsWith(prefix) if !value.starts_with(prefix.as_str()) => (
                invalid_string(StringValidation::StartsWith(prefix.clone())),
                format!("Invalid input: must start with \"{prefix}\""),
            ),
            StringRule::EndsWith(suffix) if !value.ends_with(suffix.as_str()) => (
                invalid_string(StringValidation::EndsWith(suffix.clone())),
                format!("Invalid input: must end with \"{suffix}\""),
            ),
            _ => return None,
        };
        Some(Issue::new(kind, check.message.clone().unwrap_or(default)))
    }
}

impl Schema for StringSchema {
    fn check(&self, value: &Value) -> CheckResult {
        let Value::String(raw) = value else {
            return Ok(vec![invalid_type(
                "string",
                value,
                self.type_message.as_deref(),
            )]);
        };
        let s = if self.trim { raw.trim() } else { raw.as_str() };
        Ok(self
            .checks
            .iter()
            .filter_map(|check| Self::run(check, s))
            .collect())
    }

    fn type_name(&self) -> &'static str {
        "string"
    }
}

fn too_small(min: usize, exact: bool) -> IssueKind {
    IssueKind::TooSmall {
        minimum: bound_number(min as f64),
        inclusive: true,
        exact,
        origin: BoundOrigin::String,
    }
}

fn too_big(max: usize, exact: bool) -> IssueKind {
    IssueKind::TooBig {
        maximum: bound_number(max as f64),
        inclusive: true,
        exact,
        origin: BoundOrigin::String,
    }
}

fn invalid_string(validation: StringValidation) -> IssueKind {
    IssueKind::InvalidString { validation }
}

/// Heuristic email check: `local@domain.tld`, no whitespace, TLD of two or
/// more characters.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') {
        return false;
    }
    let parts: Vec<&str> = domain.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return false;
    }
    parts.last().is_some_and(|tld| tld.chars().count() >= 2)
}

fn is_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) => !rest.is_empty() && !rest.starts_with('/') && !rest.contains(' '),
        None => false,
    }
}
