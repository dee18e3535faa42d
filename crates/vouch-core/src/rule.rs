//! The `Rule` value type.
//!
//! A rule validates one value of a target record, addressed by a
//! [`FieldKey`], and optionally coerces it. Rules are immutable: decorating
//! a rule with [`Rule::message`] or [`Rule::only_if`] returns a new rule, so a
//! rule declared once can be reused across many schemas.
//!
//! Every rule runs through a single asynchronous evaluation path. Rules built
//! only from synchronous predicates complete on first poll, which is what the
//! blocking entry points ([`Rule::validate`], [`Rule::coerce`]) rely on: they
//! poll once and refuse rules that await an asynchronous predicate with a
//! [`FailureKind::RequiresAsync`](crate::FailureKind::RequiresAsync) error.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::engine;
use crate::errors::ValidationError;
use crate::options::ValidateOptions;
use crate::schema::Schema;
use crate::value::{self, FieldKey};

/// Result of validating a value: `Ok(())` or the failure.
pub type Verdict = Result<(), ValidationError>;

/// Raw result of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The value is acceptable.
    Pass,
    /// Failed; the rule's fallback message describes the failure.
    Fail,
    /// Failed with an instance-specific message.
    Message(String),
}

impl From<bool> for Outcome {
    fn from(passed: bool) -> Self {
        if passed {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }
}

impl From<String> for Outcome {
    fn from(message: String) -> Self {
        Outcome::Message(message)
    }
}

impl From<&str> for Outcome {
    fn from(message: &str) -> Self {
        Outcome::Message(message.to_string())
    }
}

impl From<Result<(), String>> for Outcome {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Outcome::Pass,
            Err(message) => Outcome::Message(message),
        }
    }
}

/// Synchronous predicate over the target and the key under validation.
pub type PredicateFn = dyn Fn(&Value, &FieldKey) -> Outcome + Send + Sync;
/// Asynchronous predicate; owns its inputs.
pub type AsyncPredicateFn = dyn Fn(Value, FieldKey) -> BoxFuture<'static, Outcome> + Send + Sync;
/// Computes a failure message.
pub type MessageFn = dyn Fn(&Value, &FieldKey) -> String + Send + Sync;
/// Decides whether a rule applies to a target.
pub type ConditionFn = dyn Fn(&Value) -> bool + Send + Sync;
/// Transforms a value once its rule passed.
pub type ParserFn = dyn Fn(Value, &ValidateOptions) -> Value + Send + Sync;

/// The check a leaf rule performs.
#[derive(Clone)]
pub enum Predicate {
    /// Evaluated in place.
    Sync(Arc<PredicateFn>),
    /// Receives owned copies of the target and key so the future can outlive
    /// the borrow of the record.
    Async(Arc<AsyncPredicateFn>),
}

/// Failure text: fixed, or computed from the target and key.
#[derive(Clone)]
pub enum Message {
    /// Used verbatim.
    Text(String),
    /// Computed for each failure.
    Dynamic(Arc<MessageFn>),
}

impl Message {
    /// The text for a failure of `key` in `target`.
    pub fn resolve(&self, target: &Value, key: &FieldKey) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Dynamic(f) => f(target, key),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

pub(crate) enum RuleKind {
    Leaf {
        predicate: Predicate,
        fallback: Option<Message>,
    },
    All(Vec<Rule>),
    Any(Vec<Rule>),
    Each {
        rule: Rule,
        delimiter: String,
    },
    Entity(Arc<Schema>),
}

/// A validation rule over one value of a record.
#[derive(Clone)]
pub struct Rule {
    kind: Arc<RuleKind>,
    name: Option<Arc<str>>,
    message: Option<Message>,
    condition: Option<Arc<ConditionFn>>,
    parser: Option<Arc<ParserFn>>,
}

impl Rule {
    /// A rule from a synchronous predicate.
    ///
    /// The predicate receives the whole target and the key of the value under
    /// validation. Returning `false` fails with `"<key> is invalid"` unless a
    /// message is attached.
    pub fn new<F, O>(predicate: F) -> Self
    where
        F: Fn(&Value, &FieldKey) -> O + Send + Sync + 'static,
        O: Into<Outcome>,
    {
        let predicate: Arc<PredicateFn> =
            Arc::new(move |target: &Value, key: &FieldKey| -> Outcome { predicate(target, key).into() });
        Self::from_kind(RuleKind::Leaf {
            predicate: Predicate::Sync(predicate),
            fallback: None,
        })
    }

    /// A rule from an asynchronous predicate.
    pub fn new_async<F, Fut, O>(predicate: F) -> Self
    where
        F: Fn(Value, FieldKey) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
        O: Into<Outcome>,
    {
        let predicate: Arc<AsyncPredicateFn> =
            Arc::new(move |target: Value, key: FieldKey| -> BoxFuture<'static, Outcome> {
                let pending = predicate(target, key);
                async move {
                    let outcome: Outcome = pending.await.into();
                    outcome
                }
                .boxed()
            });
        Self::from_kind(RuleKind::Leaf {
            predicate: Predicate::Async(predicate),
            fallback: None,
        })
    }

    /// A named leaf rule with a fallback message, used when the predicate
    /// fails without a message of its own. Rule libraries build on this.
    pub fn leaf(name: &str, predicate: Predicate, fallback: impl Into<Message>) -> Self {
        Self::from_kind(RuleKind::Leaf {
            predicate,
            fallback: Some(fallback.into()),
        })
        .named(name)
    }

    /// Validate the value as a record of `schema`.
    ///
    /// Absent and `null` values pass. Nested failures propagate with their
    /// own message unless this rule carries one.
    pub fn entity(schema: Arc<Schema>) -> Self {
        Self::from_kind(RuleKind::Entity(schema)).named("entity")
    }

    pub(crate) fn from_kind(kind: RuleKind) -> Self {
        Self {
            kind: Arc::new(kind),
            name: None,
            message: None,
            condition: None,
            parser: None,
        }
    }

    /// Name the rule. Failures carry it as [`ValidationError::rule`].
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(Arc::from(name));
        self
    }

    /// Replace any failure of this rule with `message`.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Like [`Rule::message`], computing the text from the field's target
    /// and key.
    pub fn message_with<F>(self, message: F) -> Self
    where
        F: Fn(&Value, &FieldKey) -> String + Send + Sync + 'static,
    {
        self.message(Message::Dynamic(Arc::new(message)))
    }

    /// Apply the rule only when `condition` holds for the target. When it
    /// does not, the rule passes and its parser is not applied.
    pub fn only_if<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Attach a parser, applied to the value once the rule passes.
    pub fn with_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(Value, &ValidateOptions) -> Value + Send + Sync + 'static,
    {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// The rule's name, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True when a parser is attached to this rule itself.
    pub fn has_parser(&self) -> bool {
        self.parser.is_some()
    }

    /// True when evaluating this rule may await an asynchronous predicate.
    pub fn is_async(&self) -> bool {
        match self.kind.as_ref() {
            RuleKind::Leaf { predicate, .. } => matches!(predicate, Predicate::Async(_)),
            RuleKind::All(rules) | RuleKind::Any(rules) => rules.iter().any(Rule::is_async),
            RuleKind::Each { rule, .. } => rule.is_async(),
            RuleKind::Entity(schema) => schema.is_async(),
        }
    }

    /// Validate `key` of `target` without awaiting.
    ///
    /// Rules that await an asynchronous predicate are not evaluated; they
    /// fail with [`ValidationError::requires_async`]. Use
    /// [`Rule::validate_async`] for those.
    pub fn validate(&self, target: &Value, key: impl Into<FieldKey>) -> Verdict {
        let key = key.into();
        if self.is_async() {
            return Err(self.requires_async(&key));
        }
        resolve_now(self.check(target, &key), || self.requires_async(&key))
    }

    /// Validate `key` of `target`, awaiting asynchronous predicates.
    pub fn validate_async<'a>(&'a self, target: &'a Value, key: &'a FieldKey) -> BoxFuture<'a, Verdict> {
        self.check(target, key)
    }

    /// Validate `key` of `target` and return its coerced value. Refuses
    /// asynchronous rules like [`Rule::validate`].
    pub fn coerce(
        &self,
        target: &Value,
        key: impl Into<FieldKey>,
        options: &ValidateOptions,
    ) -> Result<Value, ValidationError> {
        let key = key.into();
        if self.is_async() {
            return Err(self.requires_async(&key));
        }
        let value = key.lookup(target).cloned().unwrap_or(Value::Null);
        resolve_now(self.coerce_value(target, &key, value, options), || {
            self.requires_async(&key)
        })
    }

    /// Validate `key` of `target` and return its coerced value, awaiting
    /// asynchronous predicates.
    pub async fn coerce_async(
        &self,
        target: &Value,
        key: &FieldKey,
        options: &ValidateOptions,
    ) -> Result<Value, ValidationError> {
        let value = key.lookup(target).cloned().unwrap_or(Value::Null);
        self.coerce_value(target, key, value, options).await
    }

    fn applies(&self, target: &Value) -> bool {
        self.condition.as_ref().map_or(true, |condition| condition(target))
    }

    /// An explicit message wins over whatever the rule produced.
    fn resolve_failure(&self, error: ValidationError, target: &Value, key: &FieldKey) -> ValidationError {
        match &self.message {
            Some(message) => error.with_message(message.resolve(target, key)),
            None => error,
        }
    }

    fn requires_async(&self, key: &FieldKey) -> ValidationError {
        ValidationError::requires_async(key.path_segment(), &format!("field {}", key))
    }

    fn failure(&self, key: &FieldKey, message: String) -> ValidationError {
        let error = ValidationError::new(key.path_segment(), message);
        match &self.name {
            Some(name) => error.with_rule(name.as_ref()),
            None => error,
        }
    }

    pub(crate) fn check<'a>(&'a self, target: &'a Value, key: &'a FieldKey) -> BoxFuture<'a, Verdict> {
        async move {
            if !self.applies(target) {
                return Ok(());
            }
            self.check_kind(target, key)
                .await
                .map_err(|error| self.resolve_failure(error, target, key))
        }
        .boxed()
    }

    async fn check_kind(&self, target: &Value, key: &FieldKey) -> Verdict {
        match self.kind.as_ref() {
            RuleKind::Leaf { predicate, fallback } => {
                self.check_leaf(predicate, fallback.as_ref(), target, key).await
            }
            RuleKind::All(rules) => {
                for rule in rules {
                    rule.check(target, key).await?;
                }
                Ok(())
            }
            RuleKind::Any(rules) => {
                let mut messages = Vec::with_capacity(rules.len());
                for rule in rules {
                    match rule.check(target, key).await {
                        Ok(()) => return Ok(()),
                        Err(error) => messages.push(error.message),
                    }
                }
                Err(self.failure(key, messages.join(" or ")))
            }
            RuleKind::Each { rule, delimiter } => {
                let (items, len) = self.sequence(target, key, delimiter)?;
                check_elements(rule, &items, 0..len, &key.path_segment()).await
            }
            RuleKind::Entity(schema) => match key.lookup(target) {
                None | Some(Value::Null) => Ok(()),
                Some(nested @ Value::Object(_)) => engine::check_record(schema, nested)
                    .await
                    .map_err(|error| error.with_path_prefix(&key.path_segment())),
                Some(_) => Err(self.not_entity(schema, key)),
            },
        }
    }

    async fn check_leaf(
        &self,
        predicate: &Predicate,
        fallback: Option<&Message>,
        target: &Value,
        key: &FieldKey,
    ) -> Verdict {
        let outcome = match predicate {
            Predicate::Sync(f) => f(target, key),
            Predicate::Async(f) => f(target.clone(), key.clone()).await,
        };
        match outcome {
            Outcome::Pass => Ok(()),
            Outcome::Fail => {
                let message = fallback
                    .map(|message| message.resolve(target, key))
                    .unwrap_or_else(|| format!("{} is invalid", key));
                Err(self.failure(key, message))
            }
            Outcome::Message(message) => Err(self.failure(key, message)),
        }
    }

    /// Validate `key` of `target` and thread `value` through the parsers of
    /// the rules that passed. For OR rules only the first passing branch
    /// contributes, so each predicate runs once per coercion.
    pub(crate) fn coerce_value<'a>(
        &'a self,
        target: &'a Value,
        key: &'a FieldKey,
        value: Value,
        options: &'a ValidateOptions,
    ) -> BoxFuture<'a, Result<Value, ValidationError>> {
        async move {
            if !self.applies(target) {
                return Ok(value);
            }
            let coerced = self
                .coerce_kind(target, key, value, options)
                .await
                .map_err(|error| self.resolve_failure(error, target, key))?;
            Ok(match &self.parser {
                Some(parser) => parser(coerced, options),
                None => coerced,
            })
        }
        .boxed()
    }

    async fn coerce_kind(
        &self,
        target: &Value,
        key: &FieldKey,
        value: Value,
        options: &ValidateOptions,
    ) -> Result<Value, ValidationError> {
        match self.kind.as_ref() {
            RuleKind::Leaf { predicate, fallback } => {
                self.check_leaf(predicate, fallback.as_ref(), target, key).await?;
                Ok(value)
            }
            RuleKind::All(rules) => {
                let mut value = value;
                for rule in rules {
                    value = rule.coerce_value(target, key, value, options).await?;
                }
                Ok(value)
            }
            RuleKind::Any(rules) => {
                let mut messages = Vec::with_capacity(rules.len());
                for rule in rules {
                    match rule.coerce_value(target, key, value.clone(), options).await {
                        Ok(coerced) => return Ok(coerced),
                        Err(error) => messages.push(error.message),
                    }
                }
                Err(self.failure(key, messages.join(" or ")))
            }
            RuleKind::Each { rule, delimiter } => {
                self.coerce_each(rule, delimiter, target, key, value, options).await
            }
            RuleKind::Entity(schema) => match key.lookup(target) {
                None | Some(Value::Null) => Ok(value),
                Some(nested @ Value::Object(_)) => engine::coerce_record(schema, nested, options)
                    .await
                    .map(Value::Object)
                    .map_err(|error| error.with_path_prefix(&key.path_segment())),
                Some(_) => Err(self.not_entity(schema, key)),
            },
        }
    }

    async fn coerce_each(
        &self,
        rule: &Rule,
        delimiter: &str,
        target: &Value,
        key: &FieldKey,
        value: Value,
        options: &ValidateOptions,
    ) -> Result<Value, ValidationError> {
        let (items, len) = self.sequence(target, key, delimiter)?;
        let segment = key.path_segment();

        // Without array parsing the field keeps its input shape.
        if !options.parse_array || value.is_null() {
            check_elements(rule, &items, 0..len, &segment).await?;
            return Ok(value);
        }

        // The output follows the value threaded from earlier parsers, which
        // need not match the raw field in length.
        let source = match value {
            Value::Array(elements) => elements,
            other => value::to_sequence(&other, delimiter).unwrap_or_else(|| vec![other]),
        };
        let present = items.as_array().map_or(0, Vec::len);
        let threaded = Value::Array(source.clone());
        let mut coerced = Vec::with_capacity(source.len());
        for (index, element) in source.into_iter().enumerate() {
            let scope = if index < present { &items } else { &threaded };
            let element = rule
                .coerce_value(scope, &FieldKey::Index(index), element, options)
                .await
                .map_err(|error| error.with_path_prefix(&segment))?;
            coerced.push(element);
        }
        // Raw elements not visited above still have to pass.
        check_elements(rule, &items, coerced.len().min(present)..len, &segment).await?;
        Ok(Value::Array(coerced))
    }

    /// The elements an EACH rule visits and how many there are. An absent
    /// field is a single missing element.
    fn sequence(
        &self,
        target: &Value,
        key: &FieldKey,
        delimiter: &str,
    ) -> Result<(Value, usize), ValidationError> {
        let Some(field) = key.lookup(target) else {
            return Ok((Value::Array(Vec::new()), 1));
        };
        value::to_sequence(field, delimiter)
            .map(|items| {
                let len = items.len();
                (Value::Array(items), len)
            })
            .ok_or_else(|| self.failure(key, format!("target.{} is not array", key)))
    }

    fn not_entity(&self, schema: &Schema, key: &FieldKey) -> ValidationError {
        self.failure(key, format!("{} is not type of {}", key, schema.name()))
    }
}

async fn check_elements(
    rule: &Rule,
    items: &Value,
    indices: std::ops::Range<usize>,
    segment: &str,
) -> Verdict {
    for index in indices {
        rule.check(items, &FieldKey::Index(index))
            .await
            .map_err(|error| error.with_path_prefix(segment))?;
    }
    Ok(())
}

/// Drive a future that is expected to be ready on first poll. A pending
/// future means an asynchronous predicate slipped through; it is reported
/// with `pending` instead of blocking the thread.
pub(crate) fn resolve_now<T, F>(
    future: F,
    pending: impl FnOnce() -> ValidationError,
) -> Result<T, ValidationError>
where
    F: Future<Output = Result<T, ValidationError>>,
{
    future.now_or_never().unwrap_or_else(|| Err(pending()))
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind.as_ref() {
            RuleKind::Leaf { .. } => "leaf".to_string(),
            RuleKind::All(rules) => format!("and({})", rules.len()),
            RuleKind::Any(rules) => format!("or({})", rules.len()),
            RuleKind::Each { delimiter, .. } => format!("each({:?})", delimiter),
            RuleKind::Entity(schema) => format!("entity({})", schema.name()),
        };
        f.debug_struct("Rule")
            .field("kind", &kind)
            .field("name", &self.name)
            .field("message", &self.message)
            .field("conditional", &self.condition.is_some())
            .field("parser", &self.parser.is_some())
            .finish()
    }
}
