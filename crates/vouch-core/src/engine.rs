//! Evaluation and coercion engines.
//!
//! [`is_valid`] walks a schema's fields in declaration order and stops at the
//! first failure. [`validate_get`] does the same walk and additionally threads
//! every field value through its rules' parsers, producing a fresh sanitized
//! instance. Both have async twins that await asynchronous predicates one at a
//! time. The blocking versions drive the same futures on the calling thread
//! and only accept schemas without asynchronous rules: any other schema is
//! refused up front with a [`FailureKind::RequiresAsync`] error, so they never
//! block on a runtime the caller may not have.
//!
//! [`FailureKind::RequiresAsync`]: crate::FailureKind::RequiresAsync
//!
//! The input record is never mutated.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use futures::FutureExt;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::errors::{EntityError, ValidationError, ValidationErrors};
use crate::options::ValidateOptions;
use crate::rule::{resolve_now, Verdict};
use crate::schema::Schema;

/// Sanitized output of a successful coercion.
pub type Instance = Map<String, Value>;

/// Check `target` against every field of `schema`.
///
/// Fails with [`ValidationError::requires_async`] when the schema has
/// asynchronous rules; use [`is_valid_async`] for those.
pub fn is_valid(schema: &Schema, target: &Value) -> Verdict {
    blocking(schema, is_valid_async(schema, target))
}

/// Check `target` against every field of `schema`, awaiting asynchronous
/// predicates.
#[instrument(level = "debug", skip_all, fields(schema = %schema.name()))]
pub async fn is_valid_async(schema: &Schema, target: &Value) -> Verdict {
    check_record(schema, target).await
}

/// Validate `target` and build the sanitized instance.
pub fn validate_get(
    schema: &Schema,
    target: &Value,
    options: &ValidateOptions,
) -> Result<Instance, ValidationError> {
    blocking(schema, validate_get_async(schema, target, options))
}

/// Validate `target` and build the sanitized instance, awaiting
/// asynchronous predicates.
#[instrument(level = "debug", skip_all, fields(schema = %schema.name()))]
pub async fn validate_get_async(
    schema: &Schema,
    target: &Value,
    options: &ValidateOptions,
) -> Result<Instance, ValidationError> {
    let instance = coerce_record(schema, target, options).await?;
    debug!(fields = instance.len(), "coerced instance");
    Ok(instance)
}

/// Run every field and collect all failures instead of stopping at the first.
///
/// A schema with asynchronous rules yields its single refusal error.
pub fn report(schema: &Schema, target: &Value) -> ValidationErrors {
    match blocking(schema, report_async(schema, target).map(Ok)) {
        Ok(errors) => errors,
        Err(refused) => refused.into(),
    }
}

#[instrument(level = "debug", skip_all, fields(schema = %schema.name()))]
pub async fn report_async(schema: &Schema, target: &Value) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in schema.fields() {
        if let Err(error) = field.rule().check(target, field.key()).await {
            errors.push(error);
        }
    }
    errors
}

/// A type with a schema, produced from untrusted records by
/// [`validate_into`].
pub trait Entity: DeserializeOwned {
    /// The schema records of this type are validated against.
    fn schema() -> Arc<Schema>;
}

/// Validate and coerce `target`, then deserialize the instance into `T`.
pub fn validate_into<T: Entity>(target: &Value, options: &ValidateOptions) -> Result<T, EntityError> {
    let instance = validate_get(&T::schema(), target, options)?;
    Ok(serde_json::from_value(Value::Object(instance))?)
}

/// Like [`validate_into`], awaiting asynchronous predicates.
pub async fn validate_into_async<T: Entity>(
    target: &Value,
    options: &ValidateOptions,
) -> Result<T, EntityError> {
    let schema = T::schema();
    let instance = validate_get_async(&schema, target, options).await?;
    Ok(serde_json::from_value(Value::Object(instance))?)
}

fn blocking<T>(
    schema: &Schema,
    evaluation: impl std::future::Future<Output = Result<T, ValidationError>>,
) -> Result<T, ValidationError> {
    let refuse = || {
        debug!(schema = %schema.name(), "blocking evaluation refused");
        ValidationError::requires_async("", &format!("schema {}", schema.name()))
    };
    if schema.is_async() {
        return Err(refuse());
    }
    resolve_now(evaluation, refuse)
}

pub(crate) async fn check_record(schema: &Schema, target: &Value) -> Verdict {
    for field in schema.fields() {
        if let Err(error) = field.rule().check(target, field.key()).await {
            debug!(
                schema = %schema.name(),
                field = %field.name(),
                rule = error.rule.as_deref().unwrap_or("-"),
                message = %error.message,
                "field failed validation"
            );
            return Err(error);
        }
    }
    Ok(())
}

pub(crate) async fn coerce_record(
    schema: &Schema,
    target: &Value,
    options: &ValidateOptions,
) -> Result<Instance, ValidationError> {
    let mut instance = Map::new();
    for field in schema.fields() {
        let raw = field.key().lookup(target);
        let start = raw.cloned().unwrap_or(Value::Null);
        let value = field
            .rule()
            .coerce_value(target, field.key(), start, options)
            .await
            .map_err(|error| {
                debug!(
                    schema = %schema.name(),
                    field = %field.name(),
                    message = %error.message,
                    "field failed coercion"
                );
                error
            })?;

        // Absent inputs are only materialized when a parser produced a value.
        if raw.is_none() && value.is_null() {
            continue;
        }
        instance.insert(field.name().to_string(), value);
    }

    if !options.filter_unvalidated_fields {
        if let Some(record) = target.as_object() {
            for (key, value) in record {
                if !schema.contains(key) {
                    instance.insert(key.clone(), value.clone());
                }
            }
        }
    }
    Ok(instance)
}
