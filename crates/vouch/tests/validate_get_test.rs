//! Integration tests for coercion through `validate_get` and `validate_into`

use std::sync::{Arc, OnceLock};

use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};
use vouch::prelude::*;
use vouch_test_fixtures::*;

fn coerce(schema: &Schema, target: Value) -> Result<Value, ValidationError> {
    validate_get(schema, &target, &ValidateOptions::default()).map(Value::Object)
}

fn coerce_with(schema: &Schema, target: Value, options: &ValidateOptions) -> Result<Value, ValidationError> {
    validate_get(schema, &target, options).map(Value::Object)
}

#[test]
fn test_unvalidated_fields_are_filtered_by_default() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let schema = id_class();
    let target = json!({"id": [111], "dangerValue": "DROP TABLE"});

    assert_eq!(coerce(&schema, target.clone())?, json!({"id": [111]}));

    let keep = ValidateOptions::default().filter_unvalidated_fields(false);
    assert_eq!(
        coerce_with(&schema, target, &keep)?,
        json!({"id": [111], "dangerValue": "DROP TABLE"})
    );
    Ok(())
}

#[test]
fn test_custom_messages() {
    assert_eq!(
        coerce(&messaged_name_class(), json!({"name": "360"})).unwrap_err().message,
        "The length of name must between 4 to 10"
    );
    assert_eq!(
        coerce(&messaged_nested_class(), json!({"id": 111})).unwrap_err().message,
        "id must be type of IdClass"
    );
    assert_eq!(
        coerce(&messaged_deeply_nested_class(), json!({"value": {"id": 111}}))
            .unwrap_err()
            .message,
        "value must be of NestedClass"
    );
}

#[test]
fn test_nested_records_are_filtered_at_every_level() -> Result<(), Box<dyn std::error::Error>> {
    let target = json!({
        "value": {"id": {"id": ["122"], "inner": 1}, "middle": 2},
        "outer": 3
    });
    assert_eq!(
        coerce(&deeply_nested_class(), target)?,
        json!({"value": {"id": {"id": [122]}}})
    );
    Ok(())
}

#[test]
fn test_mixin_instance() -> Result<(), Box<dyn std::error::Error>> {
    let target = json!({"id": "1,2", "name": "360name", "numberValue": "7", "extra": true});
    assert_eq!(
        coerce(&mixin_class(), target)?,
        json!({"numberValue": 7, "id": [1, 2], "name": "360name"})
    );
    Ok(())
}

#[test]
fn test_parse_number() -> Result<(), Box<dyn std::error::Error>> {
    let schema = parse_int_class();
    assert_eq!(coerce(&schema, json!({"value": "1234"}))?, json!({"value": 1234}));

    let raw = ValidateOptions::default().parse_number(false);
    assert_eq!(
        coerce_with(&schema, json!({"value": "1234"}), &raw)?,
        json!({"value": "1234"})
    );
    Ok(())
}

#[test]
fn test_parse_array() -> Result<(), Box<dyn std::error::Error>> {
    let schema = id_class();
    let error = coerce(&schema, json!({"id": "1,2,3"})).unwrap_err();
    assert_eq!(error.message, "3 is not in [3]");
    assert_eq!(error.path, "id[2]");

    assert_eq!(coerce(&schema, json!({"id": "1,2"}))?, json!({"id": [1, 2]}));

    let no_split = ValidateOptions::default().parse_array(false);
    assert_eq!(coerce_with(&schema, json!({"id": "1,2"}), &no_split)?, json!({"id": "1,2"}));
    Ok(())
}

#[test]
fn test_each_parser() -> Result<(), Box<dyn std::error::Error>> {
    let schema = each_class();
    assert_eq!(coerce(&schema, json!({"id": "1,2,3"}))?, json!({"id": [1, 2, 3]}));
    assert_eq!(coerce(&schema, json!({"id": ["1", "2", "3"]}))?, json!({"id": [1, 2, 3]}));
    Ok(())
}

#[test]
fn test_or_parser_uses_the_first_passing_branch() -> Result<(), Box<dyn std::error::Error>> {
    let schema = or_class();
    assert_eq!(coerce(&schema, json!({"id": "1"}))?, json!({"id": 1}));
    assert_eq!(coerce(&schema, json!({"id": "sdfsf"}))?, json!({"id": "sdfsf"}));
    assert_eq!(coerce(&schema, json!({"id": "1,2,3"}))?, json!({"id": "1,2,3"}));
    assert_eq!(
        coerce(&schema, json!({"id": "1,2,3,4,5"}))?,
        json!({"id": [1, 2, 3, 4, 5]})
    );
    Ok(())
}

#[test]
fn test_and_parser_threads_the_value() -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(coerce(&and_class(Value::Null), json!({"id": "1"}))?, json!({"id": null}));
    assert_eq!(coerce(&and_class(json!("x")), json!({"id": "1"}))?, json!({"id": "x"}));
    Ok(())
}

#[test]
fn test_options_from_configuration() -> Result<(), Box<dyn std::error::Error>> {
    let options: ValidateOptions = serde_json::from_value(json!({
        "filterUnvalidateFields": false,
        "parseNumber": false
    }))?;
    assert!(options.parse_array);

    assert_eq!(
        coerce_with(&each_class(), json!({"id": "1,2", "x": 0}), &options)?,
        json!({"id": ["1", "2"], "x": 0})
    );
    Ok(())
}

#[test]
fn test_report_lists_every_failure() {
    let errors = report(&mixin_class(), &json!({"id": [3], "name": "abc"}));
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["numberValue", "id[0]", "name"]);
    assert_eq!(errors.get("id[0]").map(|e| e.message.as_str()), Some("3 is not in [3]"));
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Order {
    id: Vec<i64>,
    name: String,
    number_value: i64,
}

impl Entity for Order {
    fn schema() -> Arc<Schema> {
        static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
        SCHEMA.get_or_init(mixin_class).clone()
    }
}

#[test]
fn test_validate_into_entity() -> Result<(), Box<dyn std::error::Error>> {
    let order: Order = validate_into(
        &json!({"id": "4,5", "name": "360name", "numberValue": "9", "debug": true}),
        &ValidateOptions::default(),
    )?;
    assert_eq!(
        order,
        Order {
            id: vec![4, 5],
            name: "360name".to_string(),
            number_value: 9,
        }
    );

    let rejected = validate_into::<Order>(&json!({"id": [1], "name": "abc"}), &ValidateOptions::default());
    assert!(matches!(rejected, Err(EntityError::Invalid(_))));
    Ok(())
}
