#![forbid(unsafe_code)]

//! Session configuration and the safe-mode result object.

use serde::{Deserialize, Serialize};

/// Message reported by safe-mode validation when a schema check fails.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Validation failed";

/// Configuration for a [`FormSession`](crate::FormSession).
///
/// Loadable from JSON; missing keys take their defaults.
///
/// ```rust
/// use formwire_core::SessionOptions;
///
/// let options = SessionOptions::from_json(r#"{"safe": true}"#).unwrap();
/// assert!(options.safe);
/// assert_eq!(options.failure_message, "Validation failed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// When `true`, [`check`](crate::FormSession::check) never returns an
    /// error and reports failures through [`ValidationReport`].
    pub safe: bool,
    /// Report message for schema failures in safe mode.
    pub failure_message: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            safe: false,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl SessionOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with safe mode enabled.
    #[must_use]
    pub fn safe() -> Self {
        Self::default().with_safe(true)
    }

    #[must_use]
    pub fn with_safe(mut self, safe: bool) -> Self {
        self.safe = safe;
        self
    }

    #[must_use]
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Outcome of a safe-mode validation.
///
/// Serializes as `{"success": true}` or
/// `{"success": false, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }
}
