#![forbid(unsafe_code)]

//! Field definitions (input) and live field state.

use std::fmt;
use std::sync::Arc;

use formwire_reactive::Observable;
use formwire_schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The value a field holds after construction from a falsy value or after
/// being cleared.
#[must_use]
pub fn empty_value() -> Value {
    Value::String(String::new())
}

/// `null`, `false`, `0` and `""` are treated as "no initial value".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

// ---------------------------------------------------------------------------
// FieldDefinition / FormDefinition: construction input
// ---------------------------------------------------------------------------

/// Declaration of one field: an optional initial value and an optional
/// schema.
#[derive(Clone, Default)]
pub struct FieldDefinition {
    value: Option<Value>,
    schema: Option<Arc<dyn Schema>>,
}

impl FieldDefinition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach a schema.
    #[must_use]
    pub fn with_schema(self, schema: impl Schema + 'static) -> Self {
        self.with_shared_schema(Arc::new(schema))
    }

    /// Attach a schema shared with other definitions.
    #[must_use]
    pub fn with_shared_schema(mut self, schema: Arc<dyn Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn schema(&self) -> Option<&Arc<dyn Schema>> {
        self.schema.as_ref()
    }

    /// Initial value a session seeds the field with.
    pub(crate) fn initial_value(&self) -> Value {
        match &self.value {
            Some(v) if !is_falsy(v) => v.clone(),
            _ => empty_value(),
        }
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("value", &self.value)
            .field("schema", &self.schema.as_ref().map(|s| s.type_name()))
            .finish()
    }
}

/// Ordered set of field definitions keyed by unique field key.
#[derive(Debug, Clone, Default)]
pub struct FormDefinition {
    fields: Vec<(String, FieldDefinition)>,
}

impl FormDefinition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field (builder form).
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, definition: FieldDefinition) -> Self {
        self.insert(key, definition);
        self
    }

    /// Add a field. Re-declaring a key replaces the earlier definition and
    /// keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, definition: FieldDefinition) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = definition,
            None => self.fields.push((key, definition)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.fields.iter().map(|(k, d)| (k.as_str(), d))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldDefinition)> for FormDefinition {
    fn from_iter<I: IntoIterator<Item = (K, FieldDefinition)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (key, definition) in iter {
            form.insert(key, definition);
        }
        form
    }
}

// ---------------------------------------------------------------------------
// FieldError
// ---------------------------------------------------------------------------

/// Error state of one field.
///
/// `extra` carries structured data about the failure, such as `{"min": 18}`
/// for a value below its minimum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    pub extra: Map<String, Value>,
}

impl FieldError {
    #[must_use]
    pub fn new(message: impl Into<String>, extra: Map<String, Value>) -> Self {
        Self {
            message: message.into(),
            extra,
        }
    }

    /// Returns `true` when there is no message and no extra data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.message.is_empty() && self.extra.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FieldState / FormState: live state
// ---------------------------------------------------------------------------

/// Live state of one field.
///
/// `value` and `error` are observables: the UI layer writes `value` and
/// subscribes to both. Clones share state.
#[derive(Clone)]
pub struct FieldState {
    pub value: Observable<Value>,
    pub error: Observable<FieldError>,
    schema: Option<Arc<dyn Schema>>,
}

impl FieldState {
    pub(crate) fn from_definition(definition: &FieldDefinition) -> Self {
        Self {
            value: Observable::new(definition.initial_value()),
            error: Observable::new(FieldError::default()),
            schema: definition.schema.clone(),
        }
    }

    #[must_use]
    pub fn schema(&self) -> Option<&Arc<dyn Schema>> {
        self.schema.as_ref()
    }

    #[must_use]
    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    /// Current error message (empty when valid).
    #[must_use]
    pub fn message(&self) -> String {
        self.error.with(|e| e.message.clone())
    }

    /// Current error extra data.
    #[must_use]
    pub fn extra(&self) -> Map<String, Value> {
        self.error.with(|e| e.extra.clone())
    }

    /// Reset the error message and extra data.
    pub fn clear_error(&self) {
        self.error.set(FieldError::default());
    }

    /// Reset value, message and extra data.
    pub fn clear(&self) {
        self.value.set(empty_value());
        self.clear_error();
    }
}

impl fmt::Debug for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldState")
            .field("value", &self.value.get())
            .field("error", &self.error.get())
            .field("schema", &self.schema.as_ref().map(|s| s.type_name()))
            .finish()
    }
}

/// Ordered mapping from field key to [`FieldState`].
#[derive(Debug, Clone, Default)]
pub struct FormState {
    fields: Vec<(String, FieldState)>,
}

impl FormState {
    pub(crate) fn from_definition(definition: &FormDefinition) -> Self {
        Self {
            fields: definition
                .iter()
                .map(|(key, def)| (key.to_string(), FieldState::from_definition(def)))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldState> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldState)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Plain copy of every field's current value.
    #[must_use]
    pub fn snapshot(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(k, f)| (k.clone(), f.value.get()))
            .collect()
    }

    /// Fields that currently carry an error message.
    #[must_use]
    pub fn errors(&self) -> Vec<(String, FieldError)> {
        self.fields
            .iter()
            .filter_map(|(k, f)| {
                let error = f.error.get();
                (!error.message.is_empty()).then(|| (k.clone(), error))
            })
            .collect()
    }

    /// Returns `true` when no field carries error state.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.fields
            .iter()
            .all(|(_, f)| f.error.with(FieldError::is_empty))
    }
}
