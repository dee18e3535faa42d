//! Built-in leaf rules for vouch.
//!
//! [`is()`] and [`not()`] create affirmative and negated rules from a catalog
//! of string checks, each with a default failure message:
//!
//! ```rust
//! use serde_json::json;
//! use vouch_core::{each, validate_get, Schema, ValidateOptions};
//! use vouch_rules::{is, not};
//!
//! let schema = Schema::builder("IdClass")
//!     .field("id", [each([is().int(), not().one_of([3]), is().required()])?])
//!     .build()?;
//!
//! let error = validate_get(&schema, &json!({"id": "1,2,3"}), &ValidateOptions::default()).unwrap_err();
//! assert_eq!(error.message, "3 is not in [3]");
//! # Ok::<(), vouch_core::ConfigError>(())
//! ```

mod creator;
mod predicate;

pub mod messages;
pub mod validators;

pub use creator::{is, not, RuleCreator};
pub use predicate::StringPredicate;
pub use validators::{HashAlgorithm, IpVersion};
