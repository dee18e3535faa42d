//! Vouch Core Library
//!
//! Schema-driven validation and coercion of untrusted records:
//!
//! - **Rule**: an atomic check with an optional message, condition and parser
//! - **Combinators**: `and`, `or` and `each` build composite rules
//! - **Schema**: an entity type's ordered field → rules mapping, composable
//!   through the `Merge` trait
//! - **Engine**: `is_valid` decides, `validate_get` decides and coerces
//!
//! # Example
//!
//! ```rust
//! use serde_json::{json, Value};
//! use vouch_core::{each, is_valid, validate_get, FieldKey, Rule, Schema, ValidateOptions};
//!
//! let digits = Rule::new(|t: &Value, k: &FieldKey| {
//!     k.lookup(t).and_then(Value::as_str).map_or(true, |s| s.chars().all(|c| c.is_ascii_digit()))
//! })
//! .with_parser(vouch_core::parsers::parse_int);
//!
//! let schema = Schema::builder("Ids").field("ids", [each([digits])?]).build()?;
//!
//! assert!(is_valid(&schema, &json!({"ids": "1,x"})).is_err());
//!
//! let instance = validate_get(&schema, &json!({"ids": "1,2", "other": true}), &ValidateOptions::default()).unwrap();
//! assert_eq!(Value::Object(instance), json!({"ids": [1, 2]}));
//! # Ok::<(), vouch_core::ConfigError>(())
//! ```

#![warn(missing_docs)]

mod combinators;
mod engine;
mod errors;
mod merge;
mod options;
mod rule;
mod schema;

pub mod parsers;
pub mod value;

pub use combinators::{and, each, each_with, or, DEFAULT_DELIMITER};
pub use engine::{
    is_valid, is_valid_async, report, report_async, validate_get, validate_get_async,
    validate_into, validate_into_async, Entity, Instance,
};
pub use errors::{ConfigError, EntityError, FailureKind, ValidationError, ValidationErrors};
pub use merge::{merge, Merge};
pub use options::ValidateOptions;
pub use rule::{
    AsyncPredicateFn, ConditionFn, Message, MessageFn, Outcome, ParserFn, Predicate, PredicateFn,
    Rule, Verdict,
};
pub use schema::{Field, Schema, SchemaBuilder};
pub use value::FieldKey;
