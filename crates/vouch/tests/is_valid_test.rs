//! Integration tests for `is_valid` over the shared fixture schemas

use serde_json::json;
use vouch::prelude::*;
use vouch::IpVersion;
use vouch_test_fixtures::*;

fn field_schema(name: &str, rule: Rule) -> Schema {
    Schema::builder(name)
        .field("field", [rule])
        .build()
        .expect("single-rule schema")
}

fn accepts(rule: Rule, value: serde_json::Value) -> bool {
    is_valid(&field_schema("Leaf", rule), &json!({ "field": value })).is_ok()
}

#[test]
fn test_each() {
    init_tracing();
    let schema = id_class();
    assert!(is_valid(&schema, &json!({"id": [111]})).is_ok());

    let error = is_valid(&schema, &json!({"id": [111, 3]})).unwrap_err();
    assert_eq!(error.message, "3 is not in [3]");
    assert_eq!(error.path, "id[1]");
    assert_eq!(error.rule.as_deref(), Some("in"));
}

#[test]
fn test_each_of_each() {
    let schema = id2_class();
    assert!(is_valid(&schema, &json!({"id": [[1, 3], [4]]})).is_ok());
    assert!(is_valid(&schema, &json!({"id": ["1,3", "4"]})).is_ok());

    let error = is_valid(&schema, &json!({"id": [[1], [3, 2]]})).unwrap_err();
    assert_eq!(error.path, "id[1][1]");
    assert_eq!(error.message, "2 != 2");
}

#[test]
fn test_string_rules() {
    let schema = name_class();
    assert!(is_valid(&schema, &json!({"name": "360sdfsdf"})).is_ok());
    assert!(is_valid(&schema, &json!({"name": "360"})).is_err());
    assert!(is_valid(&schema, &json!({"name": "13602545698"})).is_err());
    assert_eq!(
        is_valid(&schema, &json!({"name": "sdfsdfs"})).unwrap_err().message,
        "sdfsdfs contains 360"
    );
}

#[test]
fn test_nested_class() {
    let schema = nested_class();
    assert!(is_valid(&schema, &json!({"id": {"id": ["122"]}})).is_ok());
    assert_eq!(
        is_valid(&schema, &json!({"id": 111})).unwrap_err().message,
        "id is not type of IdClass"
    );
}

#[test]
fn test_deeply_nested_class() {
    let schema = deeply_nested_class();
    assert!(is_valid(&schema, &json!({"value": {"id": {"id": ["122"]}}})).is_ok());

    let error = is_valid(&schema, &json!({"value": {"id": {"id": ["122", "3"]}}})).unwrap_err();
    assert_eq!(error.message, "3 is not in [3]");
    assert_eq!(error.path, "value.id.id[1]");
}

#[test]
fn test_and_or_logic() {
    let schema = and_or_class();
    for value in [1, 2, 3, 4, 6] {
        assert!(is_valid(&schema, &json!({ "value": value })).is_ok(), "{value} should pass");
    }
    for value in [5, 7] {
        assert!(is_valid(&schema, &json!({ "value": value })).is_err(), "{value} should fail");
    }
}

#[test]
fn test_only_if() {
    let schema = only_if_class();
    assert!(is_valid(&schema, &json!({"status": 4})).is_ok());
    assert!(is_valid(&schema, &json!({"status": 4, "value2": 1})).is_err());
    for status in [1, 2, 3] {
        assert!(is_valid(&schema, &json!({"status": status, "value2": 1})).is_ok());
    }
    assert_eq!(
        is_valid(&schema, &json!({"status": 3, "value2": "sdk"})).unwrap_err().message,
        "sdk is int"
    );
}

#[test]
fn test_customize_message() {
    let schema = customize_message_class();
    assert_eq!(is_valid(&schema, &json!({})).unwrap_err().message, "field is required!!");
    assert_eq!(
        is_valid(&schema, &json!({"field": "other value"})).unwrap_err().message,
        "field must equals to some vlaue!!"
    );
    assert_eq!(
        is_valid(&schema, &json!({"field": "some value"})).unwrap_err().message,
        "field must be 1,2 or 3, just kidding LOL."
    );
}

#[test]
fn test_mixin() {
    let schema = mixin_class();
    let fields: Vec<&str> = schema.fields().map(|f| f.name()).collect();
    assert_eq!(fields, vec!["numberValue", "id", "name"]);

    assert!(is_valid(&schema, &json!({"id": [1], "name": "360name", "numberValue": 1})).is_ok());
    for target in [
        json!({"id": [1, "3"], "name": "360name", "numberValue": 1}),
        json!({"id": [1], "name": "234name", "numberValue": 1}),
        json!({"id": [1], "name": "234namesd too long", "numberValue": 1}),
        json!({"id": [1], "name": "sfa", "numberValue": 1}),
        json!({"id": [1], "name": "360name"}),
    ] {
        assert!(is_valid(&schema, &target).is_err(), "{target} should fail");
    }
}

#[test]
fn test_merge_function_matches_mixins() {
    let own = Schema::builder("MixinClass")
        .field("numberValue", [is().int(), is().required()])
        .build()
        .expect("schema");
    let merged = merge(own, [id_class().as_ref(), name_class().as_ref()]);
    let target = json!({"id": [1], "name": "360name", "numberValue": 1});
    assert_eq!(is_valid(&merged, &target), is_valid(&mixin_class(), &target));
    assert_eq!(merged.len(), mixin_class().len());
}

#[test]
fn test_dates() -> Result<(), Box<dyn std::error::Error>> {
    assert!(accepts(is().after(None)?, json!("2099-12-10 11:11:10")));
    assert!(!accepts(is().after(None)?, json!("2011-12-10 11:11:10")));
    assert!(accepts(is().before(None)?, json!("2011-12-10 11:11:10")));
    assert!(!accepts(is().before(None)?, json!("2099-12-10 11:11:10")));
    assert!(accepts(is().iso8601(), json!("2008-09-15T15:53:00")));
    assert!(!accepts(is().iso8601(), json!("hello")));
    Ok(())
}

#[test]
fn test_character_rules() {
    assert!(accepts(is().alpha(), json!("abcd")));
    assert!(!accepts(is().alpha(), json!("ab-cd")));
    assert!(!accepts(is().alpha(), json!("abcd123")));
    assert!(accepts(is().alphanumeric(), json!("1234")));
    assert!(!accepts(is().alphanumeric(), json!("abcd-123")));
    assert!(accepts(is().ascii(), json!("74")));
    assert!(!accepts(is().ascii(), json!("\u{4f60}\u{597d}")));
    assert!(!accepts(is().base64(), json!("i am not base64")));
    assert!(accepts(is().byte_length(4, Some(12)), json!("\u{4f60}\u{597d}")));
    assert!(!accepts(is().byte_length(4, Some(12)), json!("hi")));
    assert!(accepts(is().length(2, Some(4)), json!("hel")));
    assert!(!accepts(is().length(2, Some(4)), json!("hello")));
    assert!(accepts(is().lowercase(), json!("hello")));
    assert!(!accepts(is().lowercase(), json!("Hello")));
    assert!(accepts(is().multibyte(), json!("\u{4f60}\u{597d}")));
    assert!(accepts(is().whitelisted("abc"), json!("cab")));
}

#[test]
fn test_identifier_rules() {
    assert!(accepts(is().credit_card(), json!("5105105105105100")));
    assert!(!accepts(is().credit_card(), json!("string")));
    assert!(accepts(is().email(), json!("jason@gmail.com")));
    assert!(!accepts(is().email(), json!("jason@gmail")));
    assert!(accepts(is().fqdn(), json!("domain.com")));
    assert!(!accepts(is().fqdn(), json!("domain")));
    assert!(!accepts(is().hash(vouch::HashAlgorithm::Md5), json!("hello")));
    assert!(accepts(is().hex_color(), json!("#f40059")));
    assert!(!accepts(is().hex_color(), json!("rgba(0, 0, 0, .8)")));
    assert!(accepts(is().hexadecimal(), json!("1111")));
    assert!(accepts(is().ip(None), json!("127.0.0.1")));
    assert!(!accepts(is().ip(Some(IpVersion::V6)), json!("127.0.0.1")));
    assert!(accepts(is().json(), json!(r#"{"a": "1"}"#)));
    assert!(!accepts(is().json(), json!("{hello}")));
    assert!(accepts(is().mac_address(), json!("00:0a:95:9d:68:16")));
    assert!(accepts(is().md5(), json!("5d41402abc4b2a76b9719d911017c592")));
    assert!(accepts(is().mongo_id(), json!("507f191e810c19729de860ea")));
    assert!(!accepts(is().mongo_id(), json!("Hello")));
    assert!(accepts(is().url(), json!("https://example.com")));
    assert!(accepts(is().uuid(None).expect("uuid rule"), json!("67e55044-10b1-426f-9247-bb680e5fe0c8")));
}

#[test]
fn test_port() {
    let schema = field_schema("Port", is().port());
    assert!(is_valid(&schema, &json!({"field": "8080"})).is_ok());
    let error = is_valid(&schema, &json!({"field": "65536"})).unwrap_err();
    assert!(error.message.contains("is port"));
}

#[test]
fn test_numbers_checked_as_text() {
    assert!(accepts(is().numeric(), json!(12.5)));
    assert!(accepts(is().int(), json!(12)));
    assert!(!accepts(is().int(), json!(1.5)));
    assert!(accepts(is().float(), json!(1.5)));
    assert!(accepts(is().decimal(), json!("0.1")));
    assert!(accepts(not().empty(), json!("x")));
}
