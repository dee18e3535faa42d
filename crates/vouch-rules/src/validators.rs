//! Leaf string predicates.
//!
//! Every function here takes the text form of a value and answers a single
//! yes/no question about it. They know nothing about records, keys or
//! messages; [`crate::RuleCreator`] wraps them into rules.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use tracing::warn;

/// A regular expression compiled on first use.
pub(crate) struct Pattern {
    source: &'static str,
    compiled: OnceLock<Option<Regex>>,
}

impl Pattern {
    pub(crate) const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    fn regex(&self) -> Option<&Regex> {
        self.compiled
            .get_or_init(|| match Regex::new(self.source) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    warn!(pattern = self.source, error = %err, "built-in pattern failed to compile");
                    None
                }
            })
            .as_ref()
    }

    pub(crate) fn is_match(&self, text: &str) -> bool {
        self.regex().map_or(false, |regex| regex.is_match(text))
    }
}

static BASE64: Pattern = Pattern::new(r"^[A-Za-z0-9+/]+={0,2}$");
static EMAIL: Pattern = Pattern::new(
    r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
);
static HEX_COLOR: Pattern = Pattern::new(r"^#?(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{4}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$");
static HEXADECIMAL: Pattern = Pattern::new(r"^(?i:0x|0h)?[0-9A-Fa-f]+$");
static MAC_ADDRESS: Pattern =
    Pattern::new(r"^[0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5}$|^[0-9A-Fa-f]{2}(?:-[0-9A-Fa-f]{2}){5}$");
static NUMERIC: Pattern = Pattern::new(r"^[+-]?(?:[0-9]*\.)?[0-9]+$");
static DECIMAL: Pattern = Pattern::new(r"^[+-]?(?:[0-9]+|[0-9]*\.[0-9]+)$");
static FLOAT: Pattern = Pattern::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$");
static INT: Pattern = Pattern::new(r"^[+-]?[0-9]+$");
static URL: Pattern = Pattern::new(
    r"^(?:(?:https?|ftp)://)?(?:[^\s:@/]+(?::[^\s:@/]*)?@)?(?:localhost|[0-9]{1,3}(?:\.[0-9]{1,3}){3}|(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,})(?::[0-9]{1,5})?(?:[/?#]\S*)?$",
);

#[cfg(test)]
pub(crate) fn builtin_patterns() -> Vec<&'static Pattern> {
    vec![
        &BASE64, &EMAIL, &HEX_COLOR, &HEXADECIMAL, &MAC_ADDRESS, &NUMERIC, &DECIMAL, &FLOAT, &INT, &URL,
    ]
}

/// Hash algorithms recognised by [`is_hash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md4,
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Ripemd128,
    Ripemd160,
    Tiger128,
    Tiger160,
    Tiger192,
    Crc32,
    Crc32b,
}

impl HashAlgorithm {
    /// Length of the hex digest.
    pub fn hex_len(self) -> usize {
        match self {
            HashAlgorithm::Crc32 | HashAlgorithm::Crc32b => 8,
            HashAlgorithm::Md4
            | HashAlgorithm::Md5
            | HashAlgorithm::Ripemd128
            | HashAlgorithm::Tiger128 => 32,
            HashAlgorithm::Sha1 | HashAlgorithm::Ripemd160 | HashAlgorithm::Tiger160 => 40,
            HashAlgorithm::Tiger192 => 48,
            HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha384 => 96,
            HashAlgorithm::Sha512 => 128,
        }
    }

    /// Lowercase name, as shown in messages.
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md4 => "md4",
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Ripemd128 => "ripemd128",
            HashAlgorithm::Ripemd160 => "ripemd160",
            HashAlgorithm::Tiger128 => "tiger128",
            HashAlgorithm::Tiger160 => "tiger160",
            HashAlgorithm::Tiger192 => "tiger192",
            HashAlgorithm::Crc32 => "crc32",
            HashAlgorithm::Crc32b => "crc32b",
        }
    }
}

/// IP address family accepted by [`is_ip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

pub fn is_alpha(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn is_alphanumeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn is_ascii(text: &str) -> bool {
    !text.is_empty() && text.is_ascii()
}

pub fn is_base64(text: &str) -> bool {
    text.len() % 4 == 0 && BASE64.is_match(text)
}

/// UTF-8 byte length within `min..=max`.
pub fn is_byte_length(text: &str, min: usize, max: Option<usize>) -> bool {
    let len = text.len();
    len >= min && max.map_or(true, |max| len <= max)
}

/// Luhn checksum over 12 to 19 digits; spaces and dashes are ignored.
pub fn is_credit_card(text: &str) -> bool {
    let digits: Vec<u32> = match text
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
    {
        Some(digits) => digits,
        None => return false,
    };
    if !(12..=19).contains(&digits.len()) {
        return false;
    }
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                *d
            }
        })
        .sum();
    sum % 10 == 0
}

pub fn is_email(text: &str) -> bool {
    text.len() <= 254 && EMAIL.is_match(text)
}

/// Fully qualified domain name with an alphabetic top-level label.
pub fn is_fqdn(text: &str) -> bool {
    let text = text.strip_suffix('.').unwrap_or(text);
    let labels: Vec<&str> = text.split('.').collect();
    if labels.len() < 2 || text.len() > 253 {
        return false;
    }
    let valid_label = |label: &&str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    let tld = labels[labels.len() - 1];
    labels.iter().all(valid_label) && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn is_hash(text: &str, algorithm: HashAlgorithm) -> bool {
    text.len() == algorithm.hex_len() && text.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn is_hex_color(text: &str) -> bool {
    HEX_COLOR.is_match(text)
}

pub fn is_hexadecimal(text: &str) -> bool {
    HEXADECIMAL.is_match(text)
}

pub fn is_ip(text: &str, version: Option<IpVersion>) -> bool {
    match version {
        Some(IpVersion::V4) => text.parse::<Ipv4Addr>().is_ok(),
        Some(IpVersion::V6) => text.parse::<Ipv6Addr>().is_ok(),
        None => text.parse::<Ipv4Addr>().is_ok() || text.parse::<Ipv6Addr>().is_ok(),
    }
}

pub fn is_iso8601(text: &str) -> bool {
    parse_date(text).is_some()
}

/// A JSON object or array.
pub fn is_json(text: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(text),
        Ok(serde_json::Value::Object(_) | serde_json::Value::Array(_))
    )
}

/// Character count within `min..=max`.
pub fn is_length(text: &str, min: usize, max: Option<usize>) -> bool {
    let len = text.chars().count();
    len >= min && max.map_or(true, |max| len <= max)
}

pub fn is_lowercase(text: &str) -> bool {
    text == text.to_lowercase()
}

pub fn is_uppercase(text: &str) -> bool {
    text == text.to_uppercase()
}

pub fn is_mac_address(text: &str) -> bool {
    MAC_ADDRESS.is_match(text)
}

pub fn is_md5(text: &str) -> bool {
    is_hash(text, HashAlgorithm::Md5)
}

pub fn is_mongo_id(text: &str) -> bool {
    text.len() == 24 && text.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn is_multibyte(text: &str) -> bool {
    !text.is_ascii()
}

pub fn is_numeric(text: &str) -> bool {
    NUMERIC.is_match(text)
}

pub fn is_port(text: &str) -> bool {
    is_int(text, Some(0), Some(65535))
}

pub fn is_url(text: &str) -> bool {
    text.len() <= 2083 && URL.is_match(text)
}

/// Hyphenated UUID, optionally of a specific version.
pub fn is_uuid(text: &str, version: Option<usize>) -> bool {
    if text.len() != 36 {
        return false;
    }
    match uuid::Uuid::parse_str(text) {
        Ok(id) => version.map_or(true, |v| id.get_version_num() == v),
        Err(_) => false,
    }
}

pub fn is_whitelisted(text: &str, chars: &str) -> bool {
    text.chars().all(|c| chars.contains(c))
}

pub fn is_decimal(text: &str) -> bool {
    DECIMAL.is_match(text)
}

pub fn is_divisible_by(text: &str, divisor: f64) -> bool {
    text.trim()
        .parse::<f64>()
        .map_or(false, |n| n.is_finite() && n % divisor == 0.0)
}

pub fn is_float(text: &str, min: Option<f64>, max: Option<f64>) -> bool {
    if !FLOAT.is_match(text) {
        return false;
    }
    match text.parse::<f64>() {
        Ok(n) => min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max),
        Err(_) => false,
    }
}

pub fn is_int(text: &str, min: Option<i64>, max: Option<i64>) -> bool {
    if !INT.is_match(text) {
        return false;
    }
    match text.parse::<i64>() {
        Ok(n) => min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max),
        Err(_) => false,
    }
}

pub fn is_empty(text: &str) -> bool {
    text.is_empty()
}

pub fn is_after(text: &str, reference: DateTime<Utc>) -> bool {
    parse_date(text).map_or(false, |date| date > reference)
}

pub fn is_before(text: &str, reference: DateTime<Utc>) -> bool {
    parse_date(text).map_or(false, |date| date < reference)
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Parse a date or date-time. Values without an offset are taken as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Some(date) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(date.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}
