#![forbid(unsafe_code)]

//! Boolean and string-enumeration schemas.

use serde_json::Value;

use crate::issue::{Issue, IssueKind, value_type};
use crate::schema::{CheckResult, Schema, invalid_type};

/// Schema accepting JSON booleans.
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    type_message: Option<String>,
}

/// Create a boolean schema.
#[must_use]
pub fn boolean() -> BooleanSchema {
    BooleanSchema::default()
}

impl BooleanSchema {
    /// Override the wrong-type message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }
}

impl Schema for BooleanSchema {
    fn check(&self, value: &Value) -> CheckResult {
        if value.is_boolean() {
            Ok(Vec::new())
        } else {
            Ok(vec![invalid_type(
                "boolean",
                value,
                self.type_message.as_deref(),
            )])
        }
    }

    fn type_name(&self) -> &'static str {
        "boolean"
    }
}

/// Schema accepting one of a fixed set of strings.
///
/// ```rust
/// use formwire_schema::{Schema, enumeration};
/// use serde_json::json;
///
/// let plan = enumeration(["free", "pro"]);
/// assert!(plan.is_valid(&json!("pro")));
/// assert!(!plan.is_valid(&json!("enterprise")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnumSchema {
    options: Vec<String>,
    message: Option<String>,
}

/// Create a string enumeration schema.
#[must_use]
pub fn enumeration<I, S>(options: I) -> EnumSchema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumSchema {
        options: options.into_iter().map(Into::into).collect(),
        message: None,
    }
}

impl EnumSchema {
    /// Override the rejection message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The accepted options.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl Schema for EnumSchema {
    fn check(&self, value: &Value) -> CheckResult {
        if let Value::String(s) = value
            && self.options.iter().any(|o| o == s)
        {
            return Ok(Vec::new());
        }
        let received = match value {
            Value::String(s) => s.clone(),
            other => value_type(other).to_string(),
        };
        let message = self.message.clone().unwrap_or_else(|| {
            let expected = self
                .options
                .iter()
                .map(|o| format!("'{o}'"))
                .collect::<Vec<_>>()
                .join(" | ");
            format!("Invalid enum value. Expected {expected}, received '{received}'")
        });
        Ok(vec![Issue::new(
            IssueKind::InvalidEnumValue {
                options: self.options.clone(),
                received,
            },
            message,
        )])
    }

    fn type_name(&self) -> &'static str {
        "enum"
    }
}
