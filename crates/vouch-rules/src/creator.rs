//! `is()` / `not()` rule creators.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use serde_json::Value;
use vouch_core::parsers::{parse_float, parse_int};
use vouch_core::value::{as_text, render};
use vouch_core::{
    is_valid, is_valid_async, AsyncPredicateFn, ConfigError, FieldKey, Message, Outcome, Predicate, PredicateFn,
    Rule, Schema,
};

use crate::messages;
use crate::predicate::StringPredicate;
use crate::validators::{self, HashAlgorithm, IpVersion};

/// Builds leaf rules. [`is()`] builds affirmative rules, [`not()`] negated
/// ones.
///
/// Rules that test text (everything except `required`, the equality family,
/// `func` and `entity`) pass vacuously on absent and `null` values, test
/// strings and numbers through their text form, and fail on any other shape
/// whether negated or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleCreator {
    negate: bool,
}

/// Creator of affirmative rules.
pub fn is() -> RuleCreator {
    RuleCreator { negate: false }
}

/// Creator of negated rules.
pub fn not() -> RuleCreator {
    RuleCreator { negate: true }
}

impl RuleCreator {
    /// True for [`not()`].
    pub fn is_negated(&self) -> bool {
        self.negate
    }

    /// A rule from any string predicate, reported under `name`.
    pub fn text<P>(&self, name: &'static str, predicate: P) -> Rule
    where
        P: StringPredicate + 'static,
    {
        self.text_rule(name, String::new(), predicate)
    }

    /// Text containing `seed`.
    pub fn contains(&self, seed: impl Into<String>) -> Rule {
        let seed = seed.into();
        let args = seed.clone();
        self.text_rule("contains", args, move |text: &str| text.contains(seed.as_str()))
    }

    /// Dates strictly after `date`, or after the moment of validation when
    /// `date` is `None`.
    pub fn after(&self, date: Option<&str>) -> Result<Rule, ConfigError> {
        let (reference, args) = reference_date("after", date)?;
        Ok(self.text_rule("after", args, move |text: &str| {
            validators::is_after(text, reference.unwrap_or_else(Utc::now))
        }))
    }

    /// Dates strictly before `date`, or before the moment of validation when
    /// `date` is `None`.
    pub fn before(&self, date: Option<&str>) -> Result<Rule, ConfigError> {
        let (reference, args) = reference_date("before", date)?;
        Ok(self.text_rule("before", args, move |text: &str| {
            validators::is_before(text, reference.unwrap_or_else(Utc::now))
        }))
    }

    /// Letters only.
    pub fn alpha(&self) -> Rule {
        self.text_rule("alpha", String::new(), validators::is_alpha)
    }

    /// Letters and digits only.
    pub fn alphanumeric(&self) -> Rule {
        self.text_rule("alphanumeric", String::new(), validators::is_alphanumeric)
    }

    /// ASCII characters only.
    pub fn ascii(&self) -> Rule {
        self.text_rule("ascii", String::new(), validators::is_ascii)
    }

    /// Base64 encoded text.
    pub fn base64(&self) -> Rule {
        self.text_rule("base64", String::new(), validators::is_base64)
    }

    /// UTF-8 byte length between `min` and `max`, inclusive.
    pub fn byte_length(&self, min: usize, max: Option<usize>) -> Rule {
        self.text_rule("byte_length", range_args(min, max), move |text: &str| {
            validators::is_byte_length(text, min, max)
        })
    }

    /// Card numbers passing the Luhn check.
    pub fn credit_card(&self) -> Rule {
        self.text_rule("credit_card", String::new(), validators::is_credit_card)
    }

    /// Email addresses.
    pub fn email(&self) -> Rule {
        self.text_rule("email", String::new(), validators::is_email)
    }

    /// Fully qualified domain names.
    pub fn fqdn(&self) -> Rule {
        self.text_rule("fqdn", String::new(), validators::is_fqdn)
    }

    /// Hex digests of `algorithm`.
    pub fn hash(&self, algorithm: HashAlgorithm) -> Rule {
        self.text_rule("hash", algorithm.name().to_string(), move |text: &str| {
            validators::is_hash(text, algorithm)
        })
    }

    /// Hex colors, `#` optional.
    pub fn hex_color(&self) -> Rule {
        self.text_rule("hex_color", String::new(), validators::is_hex_color)
    }

    /// Hexadecimal numbers.
    pub fn hexadecimal(&self) -> Rule {
        self.text_rule("hexadecimal", String::new(), validators::is_hexadecimal)
    }

    /// IP addresses, of either version unless `version` is given.
    pub fn ip(&self, version: Option<IpVersion>) -> Rule {
        self.text_rule("ip", String::new(), move |text: &str| validators::is_ip(text, version))
    }

    /// ISO 8601 dates.
    pub fn iso8601(&self) -> Rule {
        self.text_rule("iso8601", String::new(), validators::is_iso8601)
    }

    /// Text that parses as JSON.
    pub fn json(&self) -> Rule {
        self.text_rule("json", String::new(), validators::is_json)
    }

    /// Character count between `min` and `max`, inclusive.
    pub fn length(&self, min: usize, max: Option<usize>) -> Rule {
        self.text_rule("length", range_args(min, max), move |text: &str| {
            validators::is_length(text, min, max)
        })
    }

    pub fn lowercase(&self) -> Rule {
        self.text_rule("lowercase", String::new(), validators::is_lowercase)
    }

    pub fn uppercase(&self) -> Rule {
        self.text_rule("uppercase", String::new(), validators::is_uppercase)
    }

    /// MAC addresses.
    pub fn mac_address(&self) -> Rule {
        self.text_rule("mac_address", String::new(), validators::is_mac_address)
    }

    pub fn md5(&self) -> Rule {
        self.text_rule("md5", String::new(), validators::is_md5)
    }

    /// 24-digit hex object ids.
    pub fn mongo_id(&self) -> Rule {
        self.text_rule("mongo_id", String::new(), validators::is_mongo_id)
    }

    /// Text with at least one multi-byte character.
    pub fn multibyte(&self) -> Rule {
        self.text_rule("multibyte", String::new(), validators::is_multibyte)
    }

    /// Signed digit strings.
    pub fn numeric(&self) -> Rule {
        self.text_rule("numeric", String::new(), validators::is_numeric)
    }

    /// Port numbers, 0 to 65535.
    pub fn port(&self) -> Rule {
        self.text_rule("port", String::new(), validators::is_port)
    }

    /// URLs.
    pub fn url(&self) -> Rule {
        self.text_rule("url", String::new(), validators::is_url)
    }

    /// Hyphenated UUIDs; `version` restricts to one of versions 1 to 8.
    pub fn uuid(&self, version: Option<usize>) -> Result<Rule, ConfigError> {
        if let Some(v) = version {
            if !(1..=8).contains(&v) {
                return Err(ConfigError::InvalidArgument {
                    rule: "uuid",
                    reason: format!("unknown UUID version {}", v),
                });
            }
        }
        Ok(self.text_rule("uuid", String::new(), move |text: &str| {
            validators::is_uuid(text, version)
        }))
    }

    /// Text made only of characters in `chars`.
    pub fn whitelisted(&self, chars: impl Into<String>) -> Rule {
        let chars = chars.into();
        let args = chars.clone();
        self.text_rule("whitelisted", args, move |text: &str| {
            validators::is_whitelisted(text, &chars)
        })
    }

    /// Text matching the regex `pattern`. Fails on an invalid pattern.
    pub fn matches(&self, pattern: &str) -> Result<Rule, ConfigError> {
        let regex = Regex::new(pattern).map_err(|err| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;
        Ok(self.text_rule("matches", pattern.to_string(), move |text: &str| regex.is_match(text)))
    }

    /// Decimal numbers such as `0.1`, `.3` or `4.0`. Coerces to a number.
    pub fn decimal(&self) -> Rule {
        self.numeric_rule(
            self.text_rule("decimal", String::new(), validators::is_decimal),
            parse_float,
        )
    }

    /// Numbers divisible by `divisor`. Coerces to a number.
    ///
    /// Fails on a zero or non-finite divisor.
    pub fn divisible_by(&self, divisor: f64) -> Result<Rule, ConfigError> {
        if divisor == 0.0 || !divisor.is_finite() {
            return Err(ConfigError::InvalidArgument {
                rule: "divisible_by",
                reason: format!("divisor must be finite and non-zero, got {}", divisor),
            });
        }
        let args = render(vouch_core::value::number_from_f64(divisor).as_ref());
        Ok(self.numeric_rule(
            self.text_rule("divisible_by", args, move |text: &str| {
                validators::is_divisible_by(text, divisor)
            }),
            parse_float,
        ))
    }

    /// Floats. Coerces to a number.
    pub fn float(&self) -> Rule {
        self.float_range(None, None)
    }

    /// Floats within `min` and `max`, inclusive.
    pub fn float_range(&self, min: Option<f64>, max: Option<f64>) -> Rule {
        self.numeric_rule(
            self.text_rule("float", String::new(), move |text: &str| {
                validators::is_float(text, min, max)
            }),
            parse_float,
        )
    }

    /// Integers. Coerces to an integer when `parse_number` is enabled.
    pub fn int(&self) -> Rule {
        self.int_range(None, None)
    }

    /// Integers within `min` and `max`, inclusive.
    pub fn int_range(&self, min: Option<i64>, max: Option<i64>) -> Rule {
        self.numeric_rule(
            self.text_rule("int", String::new(), move |text: &str| validators::is_int(text, min, max)),
            parse_int,
        )
    }

    /// Text form equal to the text form of `comparison`.
    pub fn equals(&self, comparison: impl Into<Value>) -> Rule {
        let comparison = comparison.into();
        let args = render(Some(&comparison));
        self.text_rule("equals", args.clone(), move |text: &str| text == args)
    }

    /// Loose equality: numbers compare with numeric strings, booleans compare
    /// as `0`/`1`, and absent equals `null`.
    pub fn double_equals(&self, comparison: impl Into<Value>) -> Rule {
        let comparison = comparison.into();
        let args = render(Some(&comparison));
        self.value_rule("double_equals", args, move |target: &Value, key: &FieldKey| {
            loose_eq(key.lookup(target), &comparison).into()
        })
    }

    /// Strict equality: same type and value. Absent never equals anything.
    pub fn triple_equals(&self, comparison: impl Into<Value>) -> Rule {
        let comparison = comparison.into();
        let args = render(Some(&comparison));
        self.value_rule("triple_equals", args, move |target: &Value, key: &FieldKey| {
            key.lookup(target).map_or(false, |value| strict_eq(value, &comparison)).into()
        })
    }

    /// Empty text.
    pub fn empty(&self) -> Rule {
        self.text_rule("empty", String::new(), validators::is_empty)
    }

    /// Present and not `null`. Unlike the text rules it fails on absent
    /// values.
    pub fn required(&self) -> Rule {
        self.value_rule("required", String::new(), |target: &Value, key: &FieldKey| {
            (!matches!(key.lookup(target), None | Some(Value::Null))).into()
        })
    }

    /// Text form equal to the text form of one of `values`.
    pub fn one_of<I, V>(&self, values: I) -> Rule
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let allowed: Vec<String> = values.into_iter().map(|v| render(Some(&v.into()))).collect();
        let args = allowed.join(",");
        self.text_rule("in", args, move |text: &str| allowed.iter().any(|a| a == text))
    }

    /// A custom predicate over the whole target.
    pub fn func<F, O>(&self, predicate: F) -> Rule
    where
        F: Fn(&Value, &FieldKey) -> O + Send + Sync + 'static,
        O: Into<Outcome>,
    {
        self.value_rule("func", String::new(), move |target: &Value, key: &FieldKey| {
            predicate(target, key).into()
        })
    }

    /// A custom asynchronous predicate, awaited by the async entry points.
    pub fn func_async<F, Fut, O>(&self, predicate: F) -> Rule
    where
        F: Fn(Value, FieldKey) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
        O: Into<Outcome>,
    {
        let negate = self.negate;
        let check: Arc<AsyncPredicateFn> =
            Arc::new(move |target: Value, key: FieldKey| -> BoxFuture<'static, Outcome> {
                let pending = predicate(target, key);
                async move {
                    let outcome: Outcome = pending.await.into();
                    apply_negation(outcome, negate)
                }
                .boxed()
            });
        Rule::leaf("func", Predicate::Async(check), self.catalog("func", String::new()))
    }

    /// The value must be a valid record of `schema`; absent and `null`
    /// values pass.
    ///
    /// Negated, the value must not be a valid record of `schema`: records
    /// failing it pass, and so do scalars and sequences, which are never
    /// records. Absent and `null` values still pass. The negated rule is
    /// asynchronous only when `schema` is.
    pub fn entity(&self, schema: Arc<Schema>) -> Rule {
        if !self.negate {
            return Rule::entity(schema);
        }
        let args = schema.name().to_string();
        if !schema.is_async() {
            let check: Arc<PredicateFn> = Arc::new(move |target: &Value, key: &FieldKey| -> Outcome {
                match key.lookup(target) {
                    Some(nested @ Value::Object(_)) => is_valid(&schema, nested).is_err().into(),
                    _ => Outcome::Pass,
                }
            });
            return Rule::leaf("entity", Predicate::Sync(check), self.catalog("entity", args));
        }
        let check: Arc<AsyncPredicateFn> =
            Arc::new(move |target: Value, key: FieldKey| -> BoxFuture<'static, Outcome> {
                let schema = schema.clone();
                async move {
                    match key.lookup(&target) {
                        Some(nested @ Value::Object(_)) => {
                            is_valid_async(&schema, nested).await.is_err().into()
                        }
                        _ => Outcome::Pass,
                    }
                }
                .boxed()
            });
        Rule::leaf("entity", Predicate::Async(check), self.catalog("entity", args))
    }

    fn catalog(&self, rule: &'static str, args: String) -> Message {
        let negate = self.negate;
        Message::Dynamic(Arc::new(move |target: &Value, key: &FieldKey| -> String {
            messages::render(rule, negate, key.lookup(target), key, &args)
        }))
    }

    fn text_rule<P>(&self, rule: &'static str, args: String, predicate: P) -> Rule
    where
        P: StringPredicate + 'static,
    {
        let negate = self.negate;
        let check: Arc<PredicateFn> = Arc::new(move |target: &Value, key: &FieldKey| -> Outcome {
            match key.lookup(target) {
                None | Some(Value::Null) => Outcome::Pass,
                Some(value) => match as_text(value) {
                    Some(text) => (predicate.test(&text) != negate).into(),
                    None => Outcome::Fail,
                },
            }
        });
        Rule::leaf(rule, Predicate::Sync(check), self.catalog(rule, args))
    }

    fn value_rule<F>(&self, rule: &'static str, args: String, predicate: F) -> Rule
    where
        F: Fn(&Value, &FieldKey) -> Outcome + Send + Sync + 'static,
    {
        let negate = self.negate;
        let check: Arc<PredicateFn> = Arc::new(move |target: &Value, key: &FieldKey| -> Outcome {
            apply_negation(predicate(target, key), negate)
        });
        Rule::leaf(rule, Predicate::Sync(check), self.catalog(rule, args))
    }

    /// Numeric rules coerce only when affirmative.
    fn numeric_rule<F>(&self, rule: Rule, parser: F) -> Rule
    where
        F: Fn(Value, &vouch_core::ValidateOptions) -> Value + Send + Sync + 'static,
    {
        if self.negate {
            rule
        } else {
            rule.with_parser(parser)
        }
    }
}

/// A negated predicate passes exactly when the original did not. Any
/// message the original produced is dropped in favour of the negated
/// catalog text.
fn apply_negation(outcome: Outcome, negate: bool) -> Outcome {
    match (outcome, negate) {
        (outcome, false) => outcome,
        (Outcome::Pass, true) => Outcome::Fail,
        (Outcome::Fail, true) | (Outcome::Message(_), true) => Outcome::Pass,
    }
}

fn range_args(min: usize, max: Option<usize>) -> String {
    match max {
        Some(max) => format!("{}, {}", min, max),
        None => min.to_string(),
    }
}

fn reference_date(
    rule: &'static str,
    date: Option<&str>,
) -> Result<(Option<DateTime<Utc>>, String), ConfigError> {
    match date {
        None => Ok((None, "now".to_string())),
        Some(text) => validators::parse_date(text)
            .map(|parsed| (Some(parsed), text.to_string()))
            .ok_or_else(|| ConfigError::InvalidArgument {
                rule,
                reason: format!("'{}' is not a date", text),
            }),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn loose_eq(value: Option<&Value>, comparison: &Value) -> bool {
    match (value, comparison) {
        (None | Some(Value::Null), Value::Null) => true,
        (None | Some(Value::Null), _) | (Some(_), Value::Null) => false,
        (Some(Value::String(a)), Value::String(b)) => a == b,
        (Some(a @ (Value::Number(_) | Value::String(_) | Value::Bool(_))), b @ (Value::Number(_) | Value::String(_) | Value::Bool(_))) => {
            match (as_number(a), as_number(b)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (Some(a), b) => a == b,
    }
}

fn strict_eq(value: &Value, comparison: &Value) -> bool {
    match (value, comparison) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}
