#![forbid(unsafe_code)]

//! Record schema composed from named field schemas.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::issue::{Issue, IssueKind, ParseError, RECEIVED_UNDEFINED, SchemaError};
use crate::schema::{CheckResult, Schema, invalid_type};

/// A record schema: one schema per key.
///
/// Keys present in the input but unknown to the schema are ignored. A
/// required key that is absent yields an `invalid_type` issue with the
/// message `Required`. The [`partial`](Self::partial) variant skips absent
/// keys instead, while still checking every key that is present.
///
/// Field schemas are shared (`Arc`), so deriving a partial variant is cheap
/// and never rebuilds the field schemas.
///
/// ```rust
/// use formwire_schema::{number, object, string};
/// use serde_json::json;
///
/// let schema = object()
///     .field("name", string().min(3))
///     .field("age", number().min(18.0));
///
/// let values = json!({"name": "Aaron", "age": 20});
/// assert!(schema.parse_map(values.as_object().unwrap()).is_ok());
///
/// // Only `age` is present, so only `age` is checked.
/// let partial = schema.partial();
/// let only_age = json!({"age": 30});
/// assert!(partial.parse_map(only_age.as_object().unwrap()).is_ok());
/// ```
#[derive(Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, Arc<dyn Schema>)>,
    relaxed: bool,
    type_message: Option<String>,
}

/// Create an empty object schema.
#[must_use]
pub fn object() -> ObjectSchema {
    ObjectSchema::new()
}

impl ObjectSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field schema (builder form).
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, schema: impl Schema + 'static) -> Self {
        self.insert(key, Arc::new(schema));
        self
    }

    /// Add or replace a shared field schema, keeping the original position
    /// of a replaced key.
    pub fn insert(&mut self, key: impl Into<String>, schema: Arc<dyn Schema>) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = schema,
            None => self.fields.push((key, schema)),
        }
    }

    /// Override the message used when the value is not an object.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    /// Variant in which every field may be absent.
    #[must_use]
    pub fn partial(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            relaxed: true,
            type_message: self.type_message.clone(),
        }
    }

    /// Returns `true` for a variant produced by [`partial`](Self::partial).
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.relaxed
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Field schema registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Schema>> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check a map of values, prefixing each issue path with its key.
    pub fn check_map(&self, values: &Map<String, Value>) -> CheckResult {
        let mut issues = Vec::new();
        for (key, schema) in &self.fields {
            let found = match values.get(key) {
                Some(value) => schema.check(value).map_err(|fault| fault.at(key.as_str()))?,
                None if self.relaxed || schema.accepts_missing() => continue,
                None => vec![required(schema.type_name())],
            };
            issues.extend(found.into_iter().map(|issue| issue.at(key.as_str())));
        }
        Ok(issues)
    }

    /// Check a map of values, failing on the first non-empty issue list.
    pub fn parse_map(&self, values: &Map<String, Value>) -> Result<(), ParseError> {
        let issues = self.check_map(values)?;
        if issues.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::new(issues).into())
        }
    }
}

fn required(expected: &str) -> Issue {
    Issue::new(
        IssueKind::InvalidType {
            expected: expected.to_string(),
            received: RECEIVED_UNDEFINED.to_string(),
        },
        "Required",
    )
}

impl Schema for ObjectSchema {
    fn check(&self, value: &Value) -> CheckResult {
        match value {
            Value::Object(map) => self.check_map(map),
            other => Ok(vec![invalid_type(
                "object",
                other,
                self.type_message.as_deref(),
            )]),
        }
    }

    fn type_name(&self) -> &'static str {
        "object"
    }
}

impl fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("relaxed", &self.relaxed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaExt;
    use crate::{boolean, number, string};
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    fn signup() -> ObjectSchema {
        object()
            .field("name", string().min(3).message("Name must be at least 3 characters long"))
            .field("age", number().min(18.0).message("You must be at least 18 years old"))
            .field("email", string().email().message("Invalid email address"))
    }

    #[test]
    fn full_parse_succeeds() {
        let values = map(json!({"name": "Aaron", "age": 20, "email": "abc123@gmail.com"}));
        assert!(signup().parse_map(&values).is_ok());
    }

    #[test]
    fn issues_carry_field_paths() {
        let values = map(json!({"name": "A", "age": 17, "email": "invalidemail"}));
        let issues = signup().check_map(&values).unwrap();
        let paths: Vec<_> = issues.iter().map(|i| i.path.join(".")).collect();
        assert_eq!(paths, vec!["name", "age", "email"]);
        assert_eq!(issues[1].message, "You must be at least 18 years old");
    }

    #[test]
    fn missing_required_key() {
        let values = map(json!({"name": "Aaron", "age": 20}));
        let issues = signup().check_map(&values).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, vec!["email"]);
        assert_eq!(issues[0].message, "Required");
        match &issues[0].kind {
            IssueKind::InvalidType { received, expected } => {
                assert_eq!(received, "undefined");
                assert_eq!(expected, "string");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn optional_field_may_be_absent() {
        let schema = object().field("nickname", string().min(2).optional());
        assert!(schema.parse_map(&Map::new()).is_ok());
    }

    #[test]
    fn partial_skips_absent_keys_only() {
        let partial = signup().partial();
        assert!(partial.is_partial());
        assert!(partial.parse_map(&map(json!({"age": 30}))).is_ok());

        let err = partial.parse_map(&map(json!({"age": 17}))).unwrap_err();
        match err {
            ParseError::Invalid(e) => {
                assert_eq!(e.issues.len(), 1);
                assert_eq!(e.issues[0].path, vec!["age"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn partial_does_not_mutate_original() {
        let schema = signup();
        let _partial = schema.partial();
        assert!(!schema.is_partial());
        assert!(schema.parse_map(&map(json!({"age": 30}))).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let schema = object().field("a", boolean());
        assert!(schema.parse_map(&map(json!({"a": true, "b": "x"}))).is_ok());
    }

    #[test]
    fn nested_paths() {
        let schema = object().field(
            "address",
            object().field("zip", string().length(5)),
        );
        let issues = schema
            .check_map(&map(json!({"address": {"zip": "123"}})))
            .unwrap();
        assert_eq!(issues[0].path, vec!["address", "zip"]);
        assert_eq!(issues[0].field(), Some("address"));
    }

    #[test]
    fn nested_non_object() {
        let schema = object().field("address", object().message("Address is required"));
        let issues = schema.check_map(&map(json!({"address": ""}))).unwrap();
        assert_eq!(issues[0].message, "Address is required");
    }

    #[test]
    fn faults_carry_key() {
        let schema = object().field(
            "code",
            string().try_refine(|_| Err("registry offline".to_string()), "unused"),
        );
        let fault = schema.check_map(&map(json!({"code": "x"}))).unwrap_err();
        assert_eq!(fault.path, vec!["code"]);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut schema = object().field("a", string()).field("b", string());
        schema.insert("a", Arc::new(number()));
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(schema.get("a").map(|s| s.type_name()), Some("number"));
        assert_eq!(schema.len(), 2);
    }
}
