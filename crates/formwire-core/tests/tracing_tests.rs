#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! These tests verify the structured events a session emits:
//!   cargo test -p formwire-core --test tracing_tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use formwire_core::{FieldDefinition, FormDefinition, FormSession, SessionOptions};
use formwire_schema::{number, string};
use serde_json::json;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured event with its level and fields.
#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

/// A tracing Layer that records every event.
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: tracing::Subscriber> Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.fields,
        });
    }
}

fn with_captured_events(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(EventCapture {
        events: Arc::clone(&events),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn session() -> FormSession {
    FormSession::new(
        FormDefinition::new()
            .field("name", FieldDefinition::new().with_schema(string().min(3)))
            .field("age", FieldDefinition::new().with_schema(number().min(18.0))),
        SessionOptions::default(),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn construction_is_logged() {
    let events = with_captured_events(|| {
        let _ = session();
    });
    let created = events
        .iter()
        .find(|e| e.message() == "form session created")
        .expect("creation event");
    assert_eq!(created.level, tracing::Level::DEBUG);
    assert_eq!(created.fields.get("validated").map(String::as_str), Some("2"));
}

#[test]
fn failed_pass_logs_issue_count() {
    let events = with_captured_events(|| {
        let s = session();
        let _ = s.validate(&[]);
    });
    let failed = events
        .iter()
        .find(|e| e.message() == "form validation failed")
        .expect("failure event");
    assert_eq!(failed.fields.get("issues").map(String::as_str), Some("2"));
    assert_eq!(failed.fields.get("applied").map(String::as_str), Some("2"));

    let projected: Vec<_> = events
        .iter()
        .filter(|e| e.message() == "projecting issue")
        .collect();
    assert_eq!(projected.len(), 2);
}

#[test]
fn projected_issue_text_does_not_replace_event_message() {
    let events = with_captured_events(|| {
        let s = session();
        s.set_value("age", json!(12));
        let _ = s.validate(&["age"]);
    });
    let projected = events
        .iter()
        .find(|e| e.fields.get("field").map(String::as_str) == Some("age"))
        .expect("projection event for age");
    assert_eq!(projected.message(), "projecting issue");
    assert_eq!(
        projected.fields.get("issue").map(String::as_str),
        Some("Number must be greater than or equal to 18")
    );
    assert_eq!(projected.fields.get("code").map(String::as_str), Some("too_small"));
}

#[test]
fn invalid_key_warns() {
    let events = with_captured_events(|| {
        let s = session();
        let _ = s.validate(&["nickname"]);
    });
    let warning = events
        .iter()
        .find(|e| e.level == tracing::Level::WARN)
        .expect("warning event");
    assert_eq!(warning.fields.get("key").map(String::as_str), Some("nickname"));
}

#[test]
fn clear_logs_key() {
    let events = with_captured_events(|| {
        let s = session();
        s.set_value("name", json!("Aaron"));
        s.clear_one("name");
        s.clear_one("missing");
    });
    let cleared: Vec<_> = events
        .iter()
        .filter(|e| e.message() == "field cleared")
        .collect();
    assert_eq!(cleared.len(), 1);
    assert_eq!(cleared[0].fields.get("key").map(String::as_str), Some("name"));
}
