//! AND / OR / EACH combinators.
//!
//! ```rust
//! use serde_json::{json, Value};
//! use vouch_core::{and, or, FieldKey, Rule};
//!
//! let positive = Rule::new(|t: &Value, k: &FieldKey| k.lookup(t).and_then(Value::as_i64).map_or(false, |n| n > 0));
//! let even = Rule::new(|t: &Value, k: &FieldKey| k.lookup(t).and_then(Value::as_i64).map_or(false, |n| n % 2 == 0));
//! let zero = Rule::new(|t: &Value, k: &FieldKey| k.lookup(t) == Some(&json!(0)));
//!
//! let rule = or([and([positive, even])?, zero])?;
//! assert!(rule.validate(&json!({"n": 4}), "n").is_ok());
//! assert!(rule.validate(&json!({"n": 0}), "n").is_ok());
//! assert!(rule.validate(&json!({"n": 3}), "n").is_err());
//! # Ok::<(), vouch_core::ConfigError>(())
//! ```

use crate::errors::ConfigError;
use crate::rule::{Rule, RuleKind};

/// Delimiter EACH splits string values on.
pub const DEFAULT_DELIMITER: &str = ",";

/// All rules must pass, checked in order; the first failure is returned.
///
/// The coerced value is threaded through every rule's parser in order.
/// A single rule is returned unchanged.
pub fn and<I>(rules: I) -> Result<Rule, ConfigError>
where
    I: IntoIterator<Item = Rule>,
{
    let mut rules: Vec<Rule> = rules.into_iter().collect();
    match rules.len() {
        0 => Err(ConfigError::EmptyCombinator("and")),
        1 => Ok(rules.remove(0)),
        _ => Ok(Rule::from_kind(RuleKind::All(rules))),
    }
}

/// The first passing rule wins. When all fail, their messages are joined
/// with `" or "`.
///
/// Only the winning rule's parser is applied to the value.
pub fn or<I>(rules: I) -> Result<Rule, ConfigError>
where
    I: IntoIterator<Item = Rule>,
{
    let mut rules: Vec<Rule> = rules.into_iter().collect();
    match rules.len() {
        0 => Err(ConfigError::EmptyCombinator("or")),
        1 => Ok(rules.remove(0)),
        _ => Ok(Rule::from_kind(RuleKind::Any(rules))),
    }
}

/// Apply `and(rules)` to every element of a sequence.
///
/// Strings are split on `,` before validation; see [`each_with`].
pub fn each<I>(rules: I) -> Result<Rule, ConfigError>
where
    I: IntoIterator<Item = Rule>,
{
    each_with(DEFAULT_DELIMITER, rules)
}

/// [`each`] with a custom delimiter for string values.
pub fn each_with<I>(delimiter: &str, rules: I) -> Result<Rule, ConfigError>
where
    I: IntoIterator<Item = Rule>,
{
    if delimiter.is_empty() {
        return Err(ConfigError::InvalidArgument {
            rule: "each",
            reason: "delimiter must not be empty".to_string(),
        });
    }
    let rule = and(rules).map_err(|_| ConfigError::EmptyCombinator("each"))?;
    Ok(Rule::from_kind(RuleKind::Each {
        rule,
        delimiter: delimiter.to_string(),
    })
    .named("each"))
}
