//! Built-in value parsers used by numeric rules.
//!
//! Parsers only run after their rule passed, so they see values the rule
//! accepted. Anything they still cannot convert is returned unchanged.

use serde_json::Value;

use crate::options::ValidateOptions;
use crate::value::number_from_f64;

/// Convert to an integer when `parse_number` is enabled.
///
/// Floats are truncated toward zero.
pub fn parse_int(value: Value, options: &ValidateOptions) -> Value {
    if !options.parse_number {
        return value;
    }
    let parsed = match &value {
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
        Value::Number(n) if !n.is_i64() && !n.is_u64() => n
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| Value::from(f.trunc() as i64)),
        _ => None,
    };
    parsed.unwrap_or(value)
}

/// Convert to a number when `parse_number` is enabled. Integral results stay
/// integers.
pub fn parse_float(value: Value, options: &ValidateOptions) -> Value {
    if !options.parse_number {
        return value;
    }
    let parsed = match &value {
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(number_from_f64),
        _ => None,
    };
    parsed.unwrap_or(value)
}
