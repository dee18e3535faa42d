//! Schema composition.
//!
//! The `Merge` trait combines a schema with the fields of other schemas
//! (mixins). Composition is a non-destructive union:
//!
//! - **Own fields win**: a field already declared by `self` is never replaced.
//! - **First source wins**: among several sources, the first one to introduce
//!   a field decides its rules.
//! - **Order**: imported fields follow the existing ones, in the order they
//!   are introduced.
//!
//! # Example
//!
//! ```rust
//! use serde_json::{json, Value};
//! use vouch_core::{merge, FieldKey, Rule, Schema};
//!
//! let any = Rule::new(|_: &Value, _: &FieldKey| true);
//! let id = Schema::builder("Id").field("id", [any.clone()]).build()?;
//! let name = Schema::builder("Name").field("name", [any.clone()]).build()?;
//! let user = Schema::builder("User").field("email", [any]).build()?;
//!
//! let user = merge(user, [&id, &name]);
//! assert_eq!(user.name(), "User");
//! assert_eq!(user.len(), 3);
//! # Ok::<(), vouch_core::ConfigError>(())
//! ```

use tracing::debug;

use crate::schema::Schema;

/// Trait for composing values out of other values.
pub trait Merge: Sized {
    /// Merge `other` into `self`, with `self` taking precedence.
    fn merge(self, other: Self) -> Self;

    /// Merge multiple sources in sequence.
    ///
    /// Earlier sources take precedence over later ones.
    fn merge_all<I>(self, sources: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        sources.into_iter().fold(self, |acc, source| acc.merge(source))
    }
}

impl Merge for Schema {
    fn merge(mut self, other: Self) -> Self {
        for field in other.fields() {
            if self.contains(field.name()) {
                debug!(
                    schema = %self.name(),
                    source = %other.name(),
                    field = %field.name(),
                    "keeping existing field over imported one"
                );
                continue;
            }
            self.insert_field(field.clone());
        }
        self
    }
}

/// Copy into `target` every field of `sources` it does not already declare.
pub fn merge<'a, I>(target: Schema, sources: I) -> Schema
where
    I: IntoIterator<Item = &'a Schema>,
{
    target.merge_all(sources.into_iter().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use crate::value::FieldKey;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn tagged(message: &'static str) -> Rule {
        Rule::new(move |_: &Value, _: &FieldKey| message)
    }

    fn schema(name: &str, fields: &[(&str, &'static str)]) -> Schema {
        fields
            .iter()
            .fold(Schema::builder(name), |builder, (field, tag)| {
                builder.field(*field, [tagged(tag)])
            })
            .build()
            .unwrap()
    }

    fn message_of(schema: &Schema, field: &str) -> String {
        schema
            .field(field)
            .unwrap()
            .rule()
            .validate(&json!({}), field)
            .unwrap_err()
            .message
    }

    #[test]
    fn test_merge_keeps_own_fields() {
        let base = schema("Base", &[("id", "base id")]);
        let other = schema("Other", &[("id", "other id"), ("name", "other name")]);

        let merged = base.merge(other);
        assert_eq!(merged.name(), "Base");
        assert_eq!(message_of(&merged, "id"), "base id");
        assert_eq!(message_of(&merged, "name"), "other name");
    }

    #[test]
    fn test_merge_all_first_source_wins() {
        let base = schema("Base", &[("a", "base a")]);
        let first = schema("First", &[("b", "first b"), ("c", "first c")]);
        let second = schema("Second", &[("c", "second c"), ("d", "second d")]);

        let merged = base.merge_all(vec![first, second]);
        let fields: Vec<&str> = merged.fields().map(|f| f.name()).collect();
        assert_eq!(fields, vec!["a", "b", "c", "d"]);
        assert_eq!(message_of(&merged, "c"), "first c");
    }

    #[test]
    fn test_merge_function_leaves_sources_untouched() {
        let target = schema("Target", &[]);
        let source = schema("Source", &[("id", "source id")]);

        let merged = merge(target, [&source]);
        assert_eq!(merged.len(), 1);
        assert_eq!(source.len(), 1);
        assert_eq!(message_of(&source, "id"), "source id");
    }
}
