//! Schema registry: an entity type's ordered field → rules mapping.
//!
//! Schemas are declared once per entity type through [`SchemaBuilder`] and
//! shared (usually behind an `Arc`) by every validation of that type.
//!
//! ```rust
//! use serde_json::{json, Value};
//! use vouch_core::{FieldKey, Rule, Schema};
//!
//! let present = Rule::new(|t: &Value, k: &FieldKey| k.lookup(t).is_some());
//!
//! let id = Schema::builder("Id").field("id", [present.clone()]).build()?;
//! let named = Schema::builder("Named")
//!     .field("name", [present])
//!     .mixin(&id)
//!     .build()?;
//!
//! let fields: Vec<&str> = named.fields().map(|f| f.name()).collect();
//! assert_eq!(fields, ["name", "id"]);
//! # Ok::<(), vouch_core::ConfigError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::combinators::and;
use crate::errors::ConfigError;
use crate::merge::Merge;
use crate::rule::Rule;
use crate::value::FieldKey;

/// One declared field of a schema.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    key: FieldKey,
    rules: Vec<Rule>,
    rule: Rule,
}

impl Field {
    fn new(schema: &str, name: String, rules: Vec<Rule>) -> Result<Self, ConfigError> {
        let rule = and(rules.iter().cloned()).map_err(|_| ConfigError::EmptyField {
            schema: schema.to_string(),
            field: name.clone(),
        })?;
        Ok(Self {
            key: FieldKey::Name(name.clone()),
            name,
            rules,
            rule,
        })
    }

    /// The field name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key the field's value is looked up by.
    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The AND of all rules, which is what the engine evaluates.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// True when any of the field's rules awaits an asynchronous predicate.
    pub fn is_async(&self) -> bool {
        self.rule.is_async()
    }
}

/// A named, ordered set of fields with their rules.
///
/// Built with [`Schema::builder`]; immutable once built.
#[derive(Clone)]
pub struct Schema {
    name: String,
    fields: IndexMap<String, Field>,
}

impl Schema {
    /// Start declaring a schema called `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// The schema name, used in entity failure messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in evaluation order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// The field declared as `name`, own or imported.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// True when `name` is a declared field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields, imported ones included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for a schema without fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when any field awaits an asynchronous predicate.
    pub fn is_async(&self) -> bool {
        self.fields().any(Field::is_async)
    }

    pub(crate) fn insert_field(&mut self, field: Field) {
        self.fields.insert(field.name.clone(), field);
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Declares a schema field by field.
///
/// Declaring the same field twice appends to its rule list. Mixins are
/// applied after the schema's own fields, in the order they were added.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: IndexMap<String, Vec<Rule>>,
    mixins: Vec<Schema>,
}

impl SchemaBuilder {
    /// An empty builder for a schema called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            mixins: Vec::new(),
        }
    }

    /// Append `rules` to field `name`. Repeated declarations accumulate
    /// and the field keeps its first position.
    pub fn field<I>(mut self, name: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        self.fields.entry(name.into()).or_default().extend(rules);
        self
    }

    /// Import the fields of `other` that this schema does not declare.
    pub fn mixin(mut self, other: &Schema) -> Self {
        self.mixins.push(other.clone());
        self
    }

    /// Finish the schema. Own fields come first, then the fields of each
    /// mixin not declared before it. Fails when a field has no rules.
    pub fn build(self) -> Result<Schema, ConfigError> {
        let mut schema = Schema {
            name: self.name,
            fields: IndexMap::with_capacity(self.fields.len()),
        };
        for (name, rules) in self.fields {
            let field = Field::new(&schema.name, name, rules)?;
            schema.insert_field(field);
        }
        Ok(schema.merge_all(self.mixins))
    }

    /// [`build`](Self::build) into an `Arc`, ready for [`Rule::entity`].
    pub fn build_shared(self) -> Result<Arc<Schema>, ConfigError> {
        self.build().map(Arc::new)
    }
}
