//! Test fixtures for vouch
//!
//! Shared entity schemas used across the workspace's test suites, plus a
//! tracing setup for tests that want to see engine events
//! (`RUST_LOG=vouch_core=debug`).

use std::sync::{Arc, Once};

use serde_json::Value;
use tracing_subscriber::EnvFilter;
use vouch_core::{and, each, or, FieldKey, Rule, Schema, SchemaBuilder, ValidateOptions};
use vouch_rules::{is, not};

/// Install a test-friendly subscriber once per process.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

fn build(builder: SchemaBuilder) -> Arc<Schema> {
    builder.build_shared().expect("fixture schema is well-formed")
}

fn combine(rule: Result<Rule, vouch_core::ConfigError>) -> Rule {
    rule.expect("fixture combinator has rules")
}

/// `id`: each element an int, not 3, and present.
pub fn id_class() -> Arc<Schema> {
    build(Schema::builder("IdClass").field(
        "id",
        [combine(each([is().int(), not().one_of([3]), is().required()]))],
    ))
}

/// `id`: a sequence of sequences of ints, none equal to 2.
pub fn id2_class() -> Arc<Schema> {
    let inner = combine(each([is().int(), is().required(), not().double_equals(2)]));
    build(Schema::builder("Id2Class").field("id", [combine(each([inner]))]))
}

/// `name`: 4 to 10 characters containing "360".
pub fn name_class() -> Arc<Schema> {
    build(
        Schema::builder("NameClass")
            .field("name", [is().length(4, Some(10)), is().contains("360")]),
    )
}

/// [`name_class`] with a custom length message.
pub fn messaged_name_class() -> Arc<Schema> {
    build(Schema::builder("NameClass").field(
        "name",
        [
            is().length(4, Some(10))
                .message("The length of name must between 4 to 10"),
            is().contains("360"),
        ],
    ))
}

/// `id`: an [`id_class`] record.
pub fn nested_class() -> Arc<Schema> {
    build(Schema::builder("NestedClass").field("id", [is().entity(id_class())]))
}

/// [`nested_class`] with a custom entity message.
pub fn messaged_nested_class() -> Arc<Schema> {
    build(Schema::builder("NestedClass").field(
        "id",
        [is().entity(id_class()).message("id must be type of IdClass")],
    ))
}

/// `value`: a [`nested_class`] record.
pub fn deeply_nested_class() -> Arc<Schema> {
    build(Schema::builder("DeeplyNestedClass").field("value", [is().entity(nested_class())]))
}

/// [`deeply_nested_class`] with custom messages at both levels.
pub fn messaged_deeply_nested_class() -> Arc<Schema> {
    build(Schema::builder("DeeplyNestedClass").field(
        "value",
        [is().entity(messaged_nested_class()).message("value must be of NestedClass")],
    ))
}

/// `value`: in [1, 2, 3], or in [4, 5, 6] and even.
pub fn and_or_class() -> Arc<Schema> {
    let rule = or([
        is().one_of([1, 2, 3]),
        combine(and([
            is().one_of([4, 5, 6]),
            is().divisible_by(2.0).expect("non-zero divisor"),
        ])),
    ]);
    build(Schema::builder("AndOrClass").field("value", [combine(rule)]))
}

/// `status` is only checked when `value2` is present.
pub fn only_if_class() -> Arc<Schema> {
    build(
        Schema::builder("OnlyIfClass")
            .field(
                "status",
                [is().one_of([1, 2, 3]).only_if(|target: &Value| target.get("value2").is_some())],
            )
            .field("value2", [is().int()]),
    )
}

/// `field`: required, equal to `"some value"` and one of 1, 2, 3, each
/// with its own message.
pub fn customize_message_class() -> Arc<Schema> {
    let one_two_three = combine(or([is().one_of([1, 2]), is().equals(3)]))
        .message("field must be 1,2 or 3, just kidding LOL.");
    build(Schema::builder("CustomizeMessageClass").field(
        "field",
        [
            is().required().message("field is required!!"),
            is().equals("some value").message("field must equals to some vlaue!!"),
            one_two_three,
        ],
    ))
}

/// Own `numberValue` plus the fields of [`id_class`] and [`name_class`].
pub fn mixin_class() -> Arc<Schema> {
    build(
        Schema::builder("MixinClass")
            .field("numberValue", [is().int(), is().required()])
            .mixin(&id_class())
            .mixin(&name_class()),
    )
}

/// `value`: a required int.
pub fn parse_int_class() -> Arc<Schema> {
    build(Schema::builder("ParseIntClass").field("value", [is().int(), is().required()]))
}

/// `id`: a sequence of ints.
pub fn each_class() -> Arc<Schema> {
    build(Schema::builder("EachClass").field("id", [combine(each([is().int()]))]))
}

/// `id`: 3 to 6 characters, or an int, or a sequence of ints.
pub fn or_class() -> Arc<Schema> {
    let rule = or([is().length(3, Some(6)), is().int(), combine(each([is().int()]))]);
    build(Schema::builder("OrClass").field("id", [combine(rule)]))
}

/// `id`: an int whose value a later parser replaces with `value`.
pub fn and_class(value: Value) -> Arc<Schema> {
    let replace = Rule::new(|_: &Value, _: &FieldKey| true)
        .with_parser(move |_: Value, _: &ValidateOptions| value.clone());
    build(Schema::builder("AndClass").field("id", [combine(and([is().int(), replace]))]))
}
