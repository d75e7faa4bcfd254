use crate::key::{COUNTERS_SUFFIX, INDEX_MEMO_SUFFIX, KeySpace, UNIQUE_MEMO_SUFFIX};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// Schema
///
/// Immutable per-model registry: attribute names, indexed fields, unique
/// fields, counters, declared collections, references, and tracked key
/// suffixes. Built once through [`SchemaBuilder`] and shared as
/// `&'static Schema` (typically via `LazyLock`).
///

#[derive(Debug)]
pub struct Schema {
    name: String,
    attributes: BTreeSet<String>,
    indices: BTreeSet<String>,
    uniques: BTreeSet<String>,
    counters: BTreeSet<String>,
    sets: BTreeMap<String, String>,
    lists: BTreeMap<String, String>,
    references: BTreeMap<String, String>,
    collections: BTreeMap<String, (String, String)>,
    tracked: BTreeSet<String>,
}

impl Schema {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn keys(&self) -> KeySpace<'_> {
        KeySpace::new(&self.name)
    }

    #[must_use]
    pub fn is_attribute(&self, field: &str) -> bool {
        self.attributes.contains(field)
    }

    #[must_use]
    pub fn is_index(&self, field: &str) -> bool {
        self.indices.contains(field)
    }

    #[must_use]
    pub fn is_unique(&self, field: &str) -> bool {
        self.uniques.contains(field)
    }

    #[must_use]
    pub fn has_counter(&self, name: &str) -> bool {
        self.counters.contains(name)
    }

    #[must_use]
    pub fn is_tracked(&self, suffix: &str) -> bool {
        self.tracked.contains(suffix)
    }

    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.indices.iter().map(String::as_str)
    }

    pub fn uniques(&self) -> impl Iterator<Item = &str> {
        self.uniques.iter().map(String::as_str)
    }

    pub fn tracked(&self) -> impl Iterator<Item = &str> {
        self.tracked.iter().map(String::as_str)
    }

    /// Target model name of a declared set.
    #[must_use]
    pub fn set_target(&self, name: &str) -> Option<&str> {
        self.sets.get(name).map(String::as_str)
    }

    /// Target model name of a declared list.
    #[must_use]
    pub fn list_target(&self, name: &str) -> Option<&str> {
        self.lists.get(name).map(String::as_str)
    }

    /// Target model name of a declared reference attribute.
    #[must_use]
    pub fn reference_target(&self, field: &str) -> Option<&str> {
        self.references.get(field).map(String::as_str)
    }

    /// `(target model, foreign key field)` of a declared inverse collection.
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<(&str, &str)> {
        self.collections
            .get(name)
            .map(|(target, fk)| (target.as_str(), fk.as_str()))
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

///
/// SchemaError
/// Declaration failures surfaced by [`SchemaBuilder::build`].
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    /// An index, unique, or collection foreign key names a field that is
    /// not a declared attribute.
    #[error("field is not a declared attribute: {field}")]
    UnknownField { field: String },

    /// A counter, set, list, or tracked suffix collides with a suffix the
    /// engine owns.
    #[error("suffix is reserved by the engine: {suffix}")]
    ReservedSuffix { suffix: String },

    /// Two declarations claim the same instance-scoped suffix.
    #[error("suffix declared twice: {suffix}")]
    DuplicateSuffix { suffix: String },
}

///
/// SchemaBuilder
///

#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    attributes: BTreeSet<String>,
    indices: BTreeSet<String>,
    uniques: BTreeSet<String>,
    counters: BTreeSet<String>,
    sets: BTreeMap<String, String>,
    lists: BTreeMap<String, String>,
    references: BTreeMap<String, String>,
    collections: BTreeMap<String, (String, String)>,
    tracked: BTreeSet<String>,
}

impl SchemaBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeSet::new(),
            indices: BTreeSet::new(),
            uniques: BTreeSet::new(),
            counters: BTreeSet::new(),
            sets: BTreeMap::new(),
            lists: BTreeMap::new(),
            references: BTreeMap::new(),
            collections: BTreeMap::new(),
            tracked: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, field: impl Into<String>) -> Self {
        self.attributes.insert(field.into());
        self
    }

    /// Maintain a secondary lookup set for this attribute.
    #[must_use]
    pub fn index(mut self, field: impl Into<String>) -> Self {
        self.indices.insert(field.into());
        self
    }

    /// Enforce a 1:1 value → id mapping for this attribute.
    #[must_use]
    pub fn unique(mut self, field: impl Into<String>) -> Self {
        self.uniques.insert(field.into());
        self
    }

    #[must_use]
    pub fn counter(mut self, name: impl Into<String>) -> Self {
        self.counters.insert(name.into());
        self
    }

    /// Declare an unordered model-typed set stored under the instance.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.sets.insert(name.into(), target.into());
        self
    }

    /// Declare an ordered model-typed list stored under the instance.
    #[must_use]
    pub fn list(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.lists.insert(name.into(), target.into());
        self
    }

    /// Declare a foreign-key attribute; the attribute and an index on it
    /// are registered automatically.
    #[must_use]
    pub fn reference(mut self, field: impl Into<String>, target: impl Into<String>) -> Self {
        let field = field.into();

        self.attributes.insert(field.clone());
        self.indices.insert(field.clone());
        self.references.insert(field, target.into());
        self
    }

    /// Declare the inverse of a reference on another model: a derived
    /// finder over `target` filtered by `foreign_key = self.id`.
    #[must_use]
    pub fn collection(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.collections
            .insert(name.into(), (target.into(), foreign_key.into()));
        self
    }

    /// Track an instance-scoped key suffix: its content is caller-managed,
    /// its lifetime ends with the instance.
    #[must_use]
    pub fn track(mut self, suffix: impl Into<String>) -> Self {
        self.tracked.insert(suffix.into());
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        for field in self.indices.iter().chain(&self.uniques) {
            if !self.attributes.contains(field) {
                return Err(SchemaError::UnknownField {
                    field: field.clone(),
                });
            }
        }

        // Counters, sets, lists, and explicitly tracked suffixes all live at
        // `<Model>:<id>:<suffix>` and are released on delete, so they share
        // one suffix namespace with the engine's memo keys.
        let mut tracked = self.tracked;
        if !self.counters.is_empty() {
            tracked.insert(COUNTERS_SUFFIX.to_string());
        }

        for suffix in self.sets.keys().chain(self.lists.keys()) {
            if !tracked.insert(suffix.clone()) {
                return Err(SchemaError::DuplicateSuffix {
                    suffix: suffix.clone(),
                });
            }
        }

        for suffix in &tracked {
            if suffix == INDEX_MEMO_SUFFIX || suffix == UNIQUE_MEMO_SUFFIX {
                return Err(SchemaError::ReservedSuffix {
                    suffix: suffix.clone(),
                });
            }
        }

        Ok(Schema {
            name: self.name,
            attributes: self.attributes,
            indices: self.indices,
            uniques: self.uniques,
            counters: self.counters,
            sets: self.sets,
            lists: self.lists,
            references: self.references,
            collections: self.collections,
            tracked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_must_be_an_attribute() {
        let err = Schema::builder("Foo")
            .attribute("a")
            .index("b")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { field } if field == "b"));
    }

    #[test]
    fn unique_must_be_an_attribute() {
        let err = Schema::builder("Foo").unique("d").build().unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { field } if field == "d"));
    }

    #[test]
    fn reference_registers_attribute_and_index() {
        let schema = Schema::builder("Post")
            .reference("user_id", "User")
            .build()
            .expect("valid schema");

        assert!(schema.is_attribute("user_id"));
        assert!(schema.is_index("user_id"));
        assert_eq!(schema.reference_target("user_id"), Some("User"));
    }

    #[test]
    fn declared_collections_are_tracked() {
        let schema = Schema::builder("User")
            .counter("votes")
            .set("followers", "User")
            .list("queue", "Post")
            .track("views")
            .build()
            .expect("valid schema");

        let tracked: Vec<&str> = schema.tracked().collect();
        assert_eq!(tracked, vec!["counters", "followers", "queue", "views"]);
    }

    #[test]
    fn memo_suffixes_are_reserved() {
        let err = Schema::builder("User")
            .track("_indices")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::ReservedSuffix { .. }));
    }

    #[test]
    fn suffixes_cannot_collide() {
        let err = Schema::builder("User")
            .set("queue", "Post")
            .list("queue", "Post")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateSuffix { suffix } if suffix == "queue"));
    }
}
