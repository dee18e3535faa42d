//! Behavioural properties of the engine: decision/coercion agreement,
//! short-circuiting and asynchronous predicates

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use serde_json::{json, Value};
use vouch::prelude::*;
use vouch_test_fixtures::*;

fn id_target(ids: &[i64], joined: bool) -> Value {
    if joined {
        let text: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        json!({ "id": text.join(",") })
    } else {
        json!({ "id": ids })
    }
}

proptest! {
    #[test]
    fn test_is_valid_agrees_with_validate_get(
        ids in prop::collection::vec(0i64..6, 1..5),
        joined in any::<bool>(),
    ) {
        let schema = id_class();
        let target = id_target(&ids, joined);
        let decided = is_valid(&schema, &target);
        let coerced = validate_get(&schema, &target, &ValidateOptions::default());

        prop_assert_eq!(decided.is_ok(), coerced.is_ok());
        prop_assert_eq!(decided.is_ok(), !ids.contains(&3));
        if let Ok(instance) = coerced {
            prop_assert_eq!(instance.get("id"), Some(&json!(ids)));
        }
    }

    #[test]
    fn test_and_or_accepts_exactly_its_domain(value in -10i64..20) {
        let expected = matches!(value, 1 | 2 | 3 | 4 | 6);
        prop_assert_eq!(is_valid(&and_or_class(), &json!({ "value": value })).is_ok(), expected);
    }
}

fn counting_rule(calls: &Arc<AtomicUsize>, verdict: bool) -> Rule {
    let calls = calls.clone();
    Rule::new(move |_: &Value, _: &FieldKey| {
        calls.fetch_add(1, Ordering::SeqCst);
        verdict
    })
}

#[test]
fn test_and_stops_at_first_failure() -> Result<(), ConfigError> {
    let calls = Arc::new(AtomicUsize::new(0));
    let rule = and([
        counting_rule(&calls, true),
        counting_rule(&calls, false),
        counting_rule(&calls, true),
    ])?;
    let schema = Schema::builder("Counted").field("value", [rule]).build()?;

    assert!(is_valid(&schema, &json!({"value": 1})).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_or_stops_at_first_success() -> Result<(), ConfigError> {
    let calls = Arc::new(AtomicUsize::new(0));
    let rule = or([
        counting_rule(&calls, false),
        counting_rule(&calls, true),
        counting_rule(&calls, true),
    ])?;
    let schema = Schema::builder("Counted").field("value", [rule]).build()?;

    assert!(is_valid(&schema, &json!({"value": 1})).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    Ok(())
}

fn username_schema() -> Schema {
    let available = is().func_async(|target: Value, key: FieldKey| async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        match key.lookup(&target).and_then(Value::as_str) {
            Some("root") | Some("admin") => Err(format!("{} is already taken", key)),
            _ => Ok(()),
        }
    });
    Schema::builder("Signup")
        .field("username", [is().required(), is().alphanumeric(), available])
        .field("age", [is().int()])
        .build()
        .expect("signup schema")
}

#[tokio::test]
async fn test_async_predicate_messages() {
    init_tracing();
    let schema = username_schema();
    assert!(schema.is_async());

    assert!(is_valid_async(&schema, &json!({"username": "ada"})).await.is_ok());

    let error = is_valid_async(&schema, &json!({"username": "root"})).await.unwrap_err();
    assert_eq!(error.message, "username is already taken");
    assert_eq!(error.path, "username");
}

#[tokio::test]
async fn test_blocking_calls_refuse_async_schema_inside_runtime() {
    let schema = username_schema();
    let target = json!({"username": "ada"});

    let error = is_valid(&schema, &target).unwrap_err();
    assert!(error.requires_async_evaluation());
    assert_eq!(error.message, "schema Signup awaits asynchronous rules; use the async entry point");
    assert!(validate_get(&schema, &target, &ValidateOptions::default())
        .unwrap_err()
        .requires_async_evaluation());

    assert!(is_valid_async(&schema, &target).await.is_ok());
}

#[test]
fn test_blocking_calls_refuse_async_schema_without_runtime() {
    let error = is_valid(&username_schema(), &json!({"username": "root"})).unwrap_err();
    assert_eq!(error.kind, FailureKind::RequiresAsync);
}

#[tokio::test]
async fn test_sync_rules_fail_before_async_predicate() {
    let schema = username_schema();
    let error = is_valid_async(&schema, &json!({"username": "ro-ot"})).await.unwrap_err();
    assert_eq!(error.message, "ro-ot is alphanumeric");
}

#[tokio::test]
async fn test_async_coercion() -> Result<(), ValidationError> {
    let schema = username_schema();
    let instance = validate_get_async(
        &schema,
        &json!({"username": "ada", "age": "36", "admin": true}),
        &ValidateOptions::default(),
    )
    .await?;
    assert_eq!(Value::Object(instance), json!({"username": "ada", "age": 36}));
    Ok(())
}
