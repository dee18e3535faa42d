//! Vouch
//!
//! Declare what a record must look like once, then check untrusted input
//! against it and get back a sanitized, type-coerced copy:
//!
//! ```rust
//! use serde_json::json;
//! use vouch::prelude::*;
//!
//! let user = Schema::builder("User")
//!     .field("name", [is().required(), is().length(2, Some(32))])
//!     .field("age", [is().int_range(Some(0), Some(150))])
//!     .field("tags", [each([is().alphanumeric()])?])
//!     .build()?;
//!
//! let input = json!({"name": "ada", "age": "36", "tags": "math,code", "admin": true});
//! let instance = validate_get(&user, &input, &ValidateOptions::default()).unwrap();
//!
//! assert_eq!(
//!     serde_json::Value::Object(instance),
//!     json!({"name": "ada", "age": 36, "tags": ["math", "code"]})
//! );
//! assert_eq!(
//!     is_valid(&user, &json!({"age": 12})).unwrap_err().message,
//!     "undefined is required"
//! );
//! # Ok::<(), vouch::ConfigError>(())
//! ```
//!
//! The engine lives in [`vouch_core`]; the built-in leaf rules and their
//! message catalog in [`vouch_rules`].

pub use vouch_core::*;
pub use vouch_rules::{is, messages, not, validators, HashAlgorithm, IpVersion, RuleCreator, StringPredicate};

/// Everything needed to declare and evaluate schemas.
pub mod prelude {
    pub use vouch_core::{
        and, each, each_with, is_valid, is_valid_async, merge, or, report, validate_get,
        validate_get_async, validate_into, ConfigError, Entity, EntityError, FailureKind, FieldKey, Merge,
        Rule, Schema, ValidateOptions, ValidationError, ValidationErrors,
    };
    pub use vouch_rules::{is, not};
}
