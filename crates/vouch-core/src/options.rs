//! Options controlling coercion.
//!
//! Options can be built in code or deserialized from a configuration
//! document. Both snake_case and the camelCase names used by request
//! configuration files are accepted. Flags for custom parsers live under
//! `extensions`:
//!
//! ```rust
//! use vouch_core::ValidateOptions;
//!
//! let options: ValidateOptions = serde_json::from_str(
//!     r#"{ "filterUnvalidateFields": false, "parseArray": false, "extensions": { "trimStrings": true } }"#,
//! ).unwrap();
//!
//! assert!(!options.filter_unvalidated_fields);
//! assert!(options.parse_number);
//! assert_eq!(options.flag("trimStrings"), Some(true));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Strip input fields that have no schema entry from the instance.
    #[serde(alias = "filterUnvalidateFields", alias = "filterUnvalidatedFields")]
    pub filter_unvalidated_fields: bool,

    /// Numeric rules convert numeric strings to numbers.
    #[serde(alias = "parseNumber")]
    pub parse_number: bool,

    /// EACH rules split strings into sequences and coerce every element.
    #[serde(alias = "parseArray")]
    pub parse_array: bool,

    /// Additional flags read by custom parsers.
    pub extensions: Map<String, Value>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            filter_unvalidated_fields: true,
            parse_number: true,
            parse_array: true,
            extensions: Map::new(),
        }
    }
}

impl ValidateOptions {
    /// Options with every flag on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop (or keep) fields the schema does not declare.
    pub fn filter_unvalidated_fields(mut self, enabled: bool) -> Self {
        self.filter_unvalidated_fields = enabled;
        self
    }

    /// Let numeric rules turn numeric strings into numbers.
    pub fn parse_number(mut self, enabled: bool) -> Self {
        self.parse_number = enabled;
        self
    }

    /// Let `each` rules turn strings into sequences.
    pub fn parse_array(mut self, enabled: bool) -> Self {
        self.parse_array = enabled;
        self
    }

    /// Set an extension value for custom parsers.
    pub fn with_extension(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(name.into(), value.into());
        self
    }

    /// A custom parser setting, if present.
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions.get(name)
    }

    /// Read a boolean extension flag.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.extension(name).and_then(Value::as_bool)
    }
}
