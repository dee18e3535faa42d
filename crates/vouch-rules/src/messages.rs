//! Default failure messages for the built-in rules.
//!
//! Each rule has an affirmative template, used by [`is()`](crate::is), and a
//! negated one, used by [`not()`](crate::not). Templates interpolate:
//!
//! - `{value}`: the offending value (`undefined` when absent)
//! - `{key}`: the field key
//! - `{args}`: the rule's arguments, pre-formatted by the rule

use serde_json::Value;
use vouch_core::value::render as render_value;
use vouch_core::FieldKey;

/// Message templates of one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub rule: &'static str,
    pub is: &'static str,
    pub not: &'static str,
}

const fn template(rule: &'static str, is: &'static str, not: &'static str) -> Template {
    Template { rule, is, not }
}

/// Templates of every built-in rule.
pub const CATALOG: &[Template] = &[
    template("contains", "{value} contains {args}", "{value} not contains {args}"),
    template("after", "{value} date is after {args}", "{value} date is not after {args}"),
    template("before", "{value} date is before {args}", "{value} date is not before {args}"),
    template("alpha", "{value} is alpha", "{value} is not alpha"),
    template("alphanumeric", "{value} is alphanumeric", "{value} is not alphanumeric"),
    template("ascii", "{value} is ascii", "{value} is not ascii"),
    template("base64", "{value} is base64", "{value} is not base64"),
    template("byte_length", "{value} byte length is {args}", "{value} byte length is not {args}"),
    template("credit_card", "{value} is credit card", "{value} is not credit card"),
    template("email", "{value} is email", "{value} is not email"),
    template("fqdn", "{value} is FQDN", "{value} is not FQDN"),
    template("hash", "{value} is hash {args}", "{value} is not hash {args}"),
    template("hex_color", "{value} is hex color", "{value} is not hex color"),
    template("hexadecimal", "{value} is hexadecimal", "{value} is not hexadecimal"),
    template("ip", "{value} is IP", "{value} is not IP"),
    template("iso8601", "{value} is ISO8601", "{value} is not ISO8601"),
    template("json", "{value} is JSON", "{value} is not JSON"),
    template("length", "{value} is length of {args}", "{value} is not length of {args}"),
    template("lowercase", "{value} is lowercase", "{value} is not lowercase"),
    template("uppercase", "{value} is uppercase", "{value} is not uppercase"),
    template("mac_address", "{value} is MAC address", "{value} is not MAC address"),
    template("md5", "{value} is MD5", "{value} is not MD5"),
    template("mongo_id", "{value} is mongoId", "{value} is not mongoId"),
    template("multibyte", "{value} is multi-byte", "{value} is not multi-byte"),
    template("numeric", "{value} is numeric", "{value} is not numeric"),
    template("port", "{value} is port", "{value} is not port"),
    template("url", "{value} is URL", "{value} is not URL"),
    template("uuid", "{value} is UUID", "{value} is not UUID"),
    template("whitelisted", "{value} characters are whitelisted ({args})", "{value} characters are not whitelisted ({args})"),
    template("matches", "{value} matches {args}", "{value} not matches {args}"),
    template("decimal", "{value} is decimal", "{value} is not decimal"),
    template("divisible_by", "{value} is divisible by {args}", "{value} is not divisible by {args}"),
    template("float", "{value} is float", "{value} is not float"),
    template("int", "{value} is int", "{value} is not int"),
    template("equals", "{value} equals {args}", "{value} not equals {args}"),
    template("double_equals", "{value} == {args}", "{value} != {args}"),
    template("triple_equals", "{value} === {args}", "{value} !== {args}"),
    template("empty", "{value} is empty", "{value} is not empty"),
    template("required", "{value} is required", "{value} is not required"),
    template("in", "{value} is in [{args}]", "{value} is not in [{args}]"),
    template("func", "{value} is func()", "{value} is not func()"),
    template("entity", "{key} is type of {args}", "{key} is not type of {args}"),
];

/// The templates of `rule`, if it is built in.
pub fn lookup(rule: &str) -> Option<&'static Template> {
    CATALOG.iter().find(|t| t.rule == rule)
}

/// Render the failure message of `rule` for the value under `key`.
///
/// Rules missing from the catalog fall back to `"{value} is <rule>"`.
pub fn render(rule: &str, negate: bool, value: Option<&Value>, key: &FieldKey, args: &str) -> String {
    let fallback;
    let text = match lookup(rule) {
        Some(template) if negate => template.not,
        Some(template) => template.is,
        None => {
            fallback = if negate {
                format!("{{value}} is not {}", rule)
            } else {
                format!("{{value}} is {}", rule)
            };
            fallback.as_str()
        }
    };
    text.replace("{value}", &render_value(value))
        .replace("{key}", &key.to_string())
        .replace("{args}", args)
}
