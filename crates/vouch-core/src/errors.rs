//! Error types for vouch.
//!
//! Two classes of error exist and they never mix:
//!
//! - [`ConfigError`]: a rule or schema was built incorrectly. Returned at
//!   construction time, never while validating a record.
//! - [`ValidationError`]: a record did not satisfy a schema. This is an
//!   ordinary result value carrying a single human-readable message plus the
//!   path of the field that produced it. Its [`FailureKind`] separates real
//!   rule failures from records a blocking entry point refused to check.

use std::fmt;

use thiserror::Error;

/// A rule or schema was declared incorrectly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `and`, `or` or `each` was given no rules.
    #[error("{0} must accept at least one rule")]
    EmptyCombinator(&'static str),

    /// A declared field ended up without rules.
    #[error("field '{field}' of schema '{schema}' has no rules")]
    EmptyField {
        /// Schema being built.
        schema: String,
        /// The empty field.
        field: String,
    },

    /// A `matches` pattern did not compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Compiler error.
        reason: String,
    },

    /// A rule argument is out of its domain.
    #[error("invalid rule argument for '{rule}': {reason}")]
    InvalidArgument {
        /// Rule being built.
        rule: &'static str,
        /// What is wrong with the argument.
        reason: String,
    },
}

/// Failure while validating a record into a typed entity.
#[derive(Error, Debug)]
pub enum EntityError {
    /// The record failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The sanitized instance could not be deserialized into the entity type.
    #[error("sanitized instance does not match entity type: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Why a [`ValidationError`] was produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureKind {
    /// The record did not satisfy a rule.
    #[default]
    Invalid,

    /// A blocking entry point was handed a rule that awaits an asynchronous
    /// predicate. The record was not checked; use the `_async` entry point.
    RequiresAsync,
}

/// A single validation failure.
///
/// `Display` renders only the message, which is the text callers surface to
/// users. The path and rule tag are available for programmatic use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path to the failing field.
    ///
    /// Examples:
    /// - `"name"` - top-level field
    /// - `"id[1]"` - array element
    /// - `"value.id[0]"` - element inside a nested entity
    pub path: String,

    /// Human-readable failure message.
    pub message: String,

    /// Name of the rule that failed (if known), e.g. `"in"` or `"int"`.
    pub rule: Option<String>,

    /// Rule failure or refusal to evaluate.
    pub kind: FailureKind,
}

impl ValidationError {
    /// A rule failure at `path`.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            rule: None,
            kind: FailureKind::Invalid,
        }
    }

    /// The refusal returned by blocking entry points for asynchronous
    /// rules. `subject` names the schema or field that needs awaiting.
    pub fn requires_async(path: impl Into<String>, subject: &str) -> Self {
        Self {
            path: path.into(),
            message: format!("{} awaits asynchronous rules; use the async entry point", subject),
            rule: None,
            kind: FailureKind::RequiresAsync,
        }
    }

    /// True when the record was not checked because it needs awaiting.
    pub fn requires_async_evaluation(&self) -> bool {
        self.kind == FailureKind::RequiresAsync
    }

    /// Tag the failure with the name of the rule that produced it.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Replace the message, keeping path and rule.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The human-readable failure text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prefix the path with a parent segment.
    ///
    /// Index segments (`[0]`) attach directly, names attach with a dot.
    pub fn with_path_prefix(mut self, prefix: &str) -> Self {
        if prefix.is_empty() {
            return self;
        }
        if self.path.is_empty() {
            self.path = prefix.to_string();
        } else if self.path.starts_with('[') {
            self.path = format!("{}{}", prefix, self.path);
        } else {
            self.path = format!("{}.{}", prefix, self.path);
        }
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// All failures of a record, one per failing field.
///
/// Only produced by [`crate::report`]; the regular entry points stop at the
/// first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Failures in field order.
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more failure.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// True when the record passed every field.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Failures in field order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// The failure recorded for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "No validation errors"),
            [single] => write!(f, "{}: {}", single.path, single.message),
            errors => {
                writeln!(f, "{} validation errors:", errors.len())?;
                for (i, error) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}: {}", i + 1, error.path, error.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
