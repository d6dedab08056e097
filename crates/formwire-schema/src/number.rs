#![forbid(unsafe_code)]

//! Number schema and its checks.

use serde_json::Value;

use crate::issue::{BoundOrigin, Issue, IssueKind, bound_number};
use crate::schema::{CheckResult, Schema, invalid_type};

#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberRule {
    Min { value: f64, inclusive: bool },
    Max { value: f64, inclusive: bool },
    Int,
}

#[derive(Debug, Clone)]
struct NumberCheck {
    rule: NumberRule,
    message: Option<String>,
}

/// Schema accepting JSON numbers.
///
/// ```rust
/// use formwire_schema::{Schema, number};
/// use serde_json::json;
///
/// let age = number().min(18.0).message("You must be at least 18 years old");
/// assert!(age.is_valid(&json!(20)));
/// assert!(!age.is_valid(&json!(17)));
/// assert!(!age.is_valid(&json!("20")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    checks: Vec<NumberCheck>,
    type_message: Option<String>,
}

/// Create a number schema.
#[must_use]
pub fn number() -> NumberSchema {
    NumberSchema::new()
}

impl NumberSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, rule: NumberRule) -> Self {
        self.checks.push(NumberCheck {
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

    /// Greater than or equal to `min`.
    #[must_use]
    pub fn min(self, min: f64) -> Self {
        self.push(NumberRule::Min {
            value: min,
            inclusive: true,
        })
    }

    /// Alias of [`min`](Self::min).
    #[must_use]
    pub fn gte(self, min: f64) -> Self {
        self.min(min)
    }

    /// Strictly greater than `min`.
    #[must_use]
    pub fn gt(self, min: f64) -> Self {
        self.push(NumberRule::Min {
            value: min,
            inclusive: false,
        })
    }

    /// Less than or equal to `max`.
    #[must_use]
    pub fn max(self, max: f64) -> Self {
        self.push(NumberRule::Max {
            value: max,
            inclusive: true,
        })
    }

    /// Alias of [`max`](Self::max).
    #[must_use]
    pub fn lte(self, max: f64) -> Self {
        self.max(max)
    }

    /// Strictly less than `max`.
    #[must_use]
    pub fn lt(self, max: f64) -> Self {
        self.push(NumberRule::Max {
            value: max,
            inclusive: false,
        })
    }

    /// No fractional part.
    #[must_use]
    pub fn int(self) -> Self {
        self.push(NumberRule::Int)
    }

    #[must_use]
    pub fn positive(self) -> Self {
        self.gt(0.0)
    }

    #[must_use]
    pub fn nonnegative(self) -> Self {
        self.min(0.0)
    }

    fn run(check: &NumberCheck, n: f64) -> Option<Issue> {
        let (kind, default) = match check.rule {
            NumberRule::Min { value, inclusive } => {
                let fails = if inclusive { n < value } else { n <= value };
                if !fails {
                    return None;
                }
                let bound = bound_number(value);
                let default = if inclusive {
                    format!("Number must be greater than or equal to {bound}")
                } else {
                    format!("Number must be greater than {bound}")
                };
                let kind = IssueKind::TooSmall {
                    minimum: bound,
                    inclusive,
                    exact: false,
                    origin: BoundOrigin::Number,
                };
                (kind, default)
            }
            NumberRule::Max { value, inclusive } => {
                let fails = if inclusive { n > value } else { n >= value };
                if !fails {
                    return None;
                }
                let bound = bound_number(value);
                let default = if inclusive {
                    format!("Number must be less than or equal to {bound}")
                } else {
                    format!("Number must be less than {bound}")
                };
                let kind = IssueKind::TooBig {
                    maximum: bound,
                    inclusive,
                    exact: false,
                    origin: BoundOrigin::Number,
                };
                (kind, default)
            }
            NumberRule::Int => {
                if n.fract() == 0.0 {
                    return None;
                }
                let kind = IssueKind::InvalidType {
                    expected: "integer".to_string(),
                    received: "float".to_string(),
                };
                (kind, "Expected integer, received float".to_string())
            }
        };
        Some(Issue::new(kind, check.message.clone().unwrap_or(default)))
    }
}

impl Schema for NumberSchema {
    fn check(&self, value: &Value) -> CheckResult {
        let Some(n) = value.as_f64() else {
            return Ok(vec![invalid_type(
                "number",
                value,
                self.type_message.as_deref(),
            )]);
        };
        Ok(self
            .checks
            .iter()
            .filter_map(|check| Self::run(check, n))
            .collect())
    }

    fn type_name(&self) -> &'static str {
        "number"
    }
}
