//! Helpers for reading untyped target records.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

/// Position of a value inside its target: a record field or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// A record field.
    Name(String),
    /// A sequence element, as visited by EACH.
    Index(usize),
}

impl FieldKey {
    /// Read the value this key addresses. Absent keys, and keys that do not
    /// fit the target's shape, yield `None`.
    pub fn lookup<'v>(&self, target: &'v Value) -> Option<&'v Value> {
        match self {
            FieldKey::Name(name) => target.as_object().and_then(|map| map.get(name)),
            FieldKey::Index(index) => target.as_array().and_then(|items| items.get(*index)),
        }
    }

    /// Segment used when building error paths.
    pub fn path_segment(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => write!(f, "{}", name),
            FieldKey::Index(index) => write!(f, "[{}]", index),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Name(name)
    }
}

impl From<usize> for FieldKey {
    fn from(index: usize) -> Self {
        FieldKey::Index(index)
    }
}

/// Render a value the way it is interpolated into failure messages.
///
/// Strings are unquoted, sequences are comma-joined and an absent value
/// renders as `undefined`.
pub fn render(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => render_number(n),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| render(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(object @ Value::Object(_)) => object.to_string(),
    }
}

fn render_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// The text form leaf predicates see: strings as is, numbers in decimal form.
/// Any other shape has no text form.
pub fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(render_number(n))),
        _ => None,
    }
}

/// True when the value is absent or JSON `null`.
pub fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Coerce a field value into a sequence.
///
/// Sequences are returned as is, strings are split on `delimiter`, other
/// scalars (`null` included) become a single-element sequence. Records
/// cannot be coerced and yield `None`.
pub fn to_sequence(value: &Value, delimiter: &str) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::String(s) => Some(
            s.split(delimiter)
                .map(|part| Value::String(part.to_string()))
                .collect(),
        ),
        Value::Object(_) => None,
        scalar => Some(vec![scalar.clone()]),
    }
}

/// Build a JSON number from a float, keeping integral values integral so
/// `"4"` parsed as a float still compares equal to `4`.
pub fn number_from_f64(f: f64) -> Option<Value> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        return Some(Value::from(f as i64));
    }
    serde_json::Number::from_f64(f).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_by_name_and_index() {
        let record = json!({"id": [1, 2]});
        assert_eq!(FieldKey::from("id").lookup(&record), Some(&json!([1, 2])));
        assert_eq!(FieldKey::from("missing").lookup(&record), None);

        let items = json!(["a", "b"]);
        assert_eq!(FieldKey::from(1).lookup(&items), Some(&json!("b")));
        assert_eq!(FieldKey::from(5).lookup(&items), None);
        assert_eq!(FieldKey::from("a").lookup(&items), None);
    }

    #[test]
    fn test_render() {
        assert_eq!(render(None), "undefined");
        assert_eq!(render(Some(&json!(null))), "null");
        assert_eq!(render(Some(&json!("360"))), "360");
        assert_eq!(render(Some(&json!(3))), "3");
        assert_eq!(render(Some(&json!(4.0))), "4");
        assert_eq!(render(Some(&json!(1.5))), "1.5");
        assert_eq!(render(Some(&json!([1, 2, 3]))), "1,2,3");
    }

    #[test]
    fn test_as_text() {
        assert_eq!(as_text(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(as_text(&json!(12)).as_deref(), Some("12"));
        assert_eq!(as_text(&json!(true)), None);
        assert_eq!(as_text(&json!([1])), None);
    }

    #[test]
    fn test_to_sequence() {
        assert_eq!(
            to_sequence(&json!("1,2"), ","),
            Some(vec![json!("1"), json!("2")])
        );
        assert_eq!(
            to_sequence(&json!("1;2"), ";"),
            Some(vec![json!("1"), json!("2")])
        );
        assert_eq!(to_sequence(&json!(7), ","), Some(vec![json!(7)]));
        assert_eq!(to_sequence(&json!(null), ","), Some(vec![json!(null)]));
        assert_eq!(to_sequence(&json!({"a": 1}), ","), None);
    }

    #[test]
    fn test_number_from_f64() {
        assert_eq!(number_from_f64(4.0), Some(json!(4)));
        assert_eq!(number_from_f64(1.25), Some(json!(1.25)));
        assert_eq!(number_from_f64(f64::NAN), None);
    }
}
