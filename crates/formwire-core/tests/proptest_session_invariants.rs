//! Property-based invariant tests for form sessions.
//!
//! 1. Validation never writes field values.
//! 2. Full validation succeeds iff every field passes its schema.
//! 3. Success clears every field's error state.
//! 4. Partial validation only writes the requested field.
//! 5. Safe-mode `check` never returns `Err`.
//! 6. Bound failures project `{min}` / `{max}` extra data.
//! 7. `clear_all` equals `clear_one` on every key.

use formwire_core::{FieldDefinition, FormDefinition, FormSession, SessionOptions};
use formwire_schema::{number, string};
use proptest::prelude::*;
use serde_json::{Value, json};

// ── Strategies ────────────────────────────────────────────────────────────

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(Value::from),
        (-50i64..=150).prop_map(Value::from),
        Just(json!(null)),
        Just(json!(true)),
    ]
}

fn session(options: SessionOptions) -> FormSession {
    FormSession::new(
        FormDefinition::new()
            .field(
                "name",
                FieldDefinition::new().with_schema(string().min(3).max(6)),
            )
            .field(
                "age",
                FieldDefinition::new().with_schema(number().min(18.0).max(120.0)),
            )
            .field("comment", FieldDefinition::new()),
        options,
    )
}

fn name_ok(v: &Value) -> bool {
    v.as_str().is_some_and(|s| (3..=6).contains(&s.chars().count()))
}

fn age_ok(v: &Value) -> bool {
    v.as_f64().is_some_and(|n| (18.0..=120.0).contains(&n))
}

fn fill(s: &FormSession, name: &Value, age: &Value, comment: &Value) {
    s.set_value("name", name.clone());
    s.set_value("age", age.clone());
    s.set_value("comment", comment.clone());
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn validation_never_writes_values(
        name in value_strategy(),
        age in value_strategy(),
        comment in value_strategy(),
    ) {
        let s = session(SessionOptions::default());
        fill(&s, &name, &age, &comment);
        let before = s.form().snapshot();
        let _ = s.validate(&[]);
        let _ = s.validate(&["age"]);
        let _ = s.validate(&["unknown"]);
        prop_assert_eq!(s.form().snapshot(), before);
    }

    #[test]
    fn full_validation_matches_field_rules(
        name in value_strategy(),
        age in value_strategy(),
        comment in value_strategy(),
    ) {
        let s = session(SessionOptions::default());
        fill(&s, &name, &age, &comment);
        let expected = name_ok(&name) && age_ok(&age);
        let result = s.validate(&[]);
        prop_assert_eq!(result.is_ok(), expected);
        if expected {
            prop_assert!(s.form().is_clean());
        } else {
            prop_assert_eq!(s.field("name").unwrap().message().is_empty(), name_ok(&name));
            prop_assert_eq!(s.field("age").unwrap().message().is_empty(), age_ok(&age));
        }
        prop_assert!(s.field("comment").unwrap().error.get().is_empty());
    }

    #[test]
    fn partial_validation_is_isolated(
        name in value_strategy(),
        age in value_strategy(),
    ) {
        let s = session(SessionOptions::default());
        fill(&s, &name, &age, &json!(""));
        let result = s.validate(&["age"]);
        prop_assert_eq!(result.is_ok(), age_ok(&age));
        prop_assert!(s.field("name").unwrap().error.get().is_empty());
    }

    #[test]
    fn safe_check_never_errs(
        name in value_strategy(),
        age in value_strategy(),
        keys in prop::sample::subsequence(vec!["name", "age", "comment", "ghost"], 0..=4),
    ) {
        let s = session(SessionOptions::safe());
        fill(&s, &name, &age, &json!(""));
        let report = s.check(&keys);
        prop_assert!(report.is_ok());
    }

    #[test]
    fn bound_failures_project_extra(age in -50i64..=200) {
        let s = session(SessionOptions::default());
        s.set_value("age", age);
        let _ = s.validate(&["age"]);
        let extra = Value::Object(s.field("age").unwrap().extra());
        if age < 18 {
            prop_assert_eq!(extra, json!({"min": 18}));
        } else if age > 120 {
            prop_assert_eq!(extra, json!({"max": 120}));
        } else {
            prop_assert_eq!(extra, json!({}));
        }
    }

    #[test]
    fn clear_all_equals_clear_each(
        name in value_strategy(),
        age in value_strategy(),
        comment in value_strategy(),
    ) {
        let a = session(SessionOptions::default());
        let b = session(SessionOptions::default());
        for s in [&a, &b] {
            fill(s, &name, &age, &comment);
            let _ = s.validate(&[]);
        }
        a.clear_all();
        for key in ["name", "age", "comment"] {
            b.clear_one(key);
        }
        prop_assert_eq!(a.form().snapshot(), b.form().snapshot());
        prop_assert!(a.form().is_clean());
        prop_assert!(b.form().is_clean());
    }
}
