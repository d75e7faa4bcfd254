use crate::{error::Error, model::Schema};
use std::collections::BTreeMap;

///
/// Object
///
/// One in-memory instance of a model: the optional id and the declared
/// attributes. The id is assigned by the first successful save and never
/// changes afterwards; deleting leaves the handle valid but orphaned.
/// Only declared attribute names are retained; unknown keys handed to
/// constructors or merges are silently dropped.
///

#[derive(Clone, Debug)]
pub struct Object {
    schema: &'static Schema,
    id: Option<String>,
    attributes: BTreeMap<String, String>,
}

impl Object {
    #[must_use]
    pub const fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            id: None,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with<I, K, V>(schema: &'static Schema, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut object = Self::new(schema);
        object.merge(attrs);
        object
    }

    /// Rebuild an instance from stored state.
    pub(crate) fn hydrated<I, K, V>(schema: &'static Schema, id: String, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut object = Self::with(schema, attrs);
        object.id = Some(id);
        object
    }

    #[must_use]
    pub const fn schema(&self) -> &'static Schema {
        self.schema
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn set_id(&mut self, id: String) {
        debug_assert!(self.id.is_none(), "id is immutable once assigned");
        self.id = Some(id);
    }

    /// Fully-qualified primary key, available once an id is assigned.
    pub fn key(&self) -> Result<String, Error> {
        let id = self.id.as_deref().ok_or(Error::MissingId)?;

        Ok(self.schema.keys().record(id))
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.attributes.get(field).map(String::as_str)
    }

    /// Set one attribute. Returns false (and stores nothing) when the field
    /// is not declared on the schema.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) -> bool {
        let field = field.into();

        if !self.schema.is_attribute(&field) {
            return false;
        }
        self.attributes.insert(field, value.into());
        true
    }

    /// Merge attributes, dropping unknown keys.
    pub fn merge<I, K, V>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (field, value) in attrs {
            let _ = self.set(field, value);
        }
    }

    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

/// Equality is key equality: same model, same assigned id. An instance with
/// no id compares unequal to everything, itself included.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self.id.as_deref(), other.id.as_deref()) {
            (Some(a), Some(b)) => self.schema.name() == other.schema.name() && a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    static FOO: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("Foo")
            .attribute("a")
            .attribute("b")
            .build()
            .expect("valid schema")
    });

    #[test]
    fn unknown_attributes_are_dropped() {
        let object = Object::with(&FOO, [("a", "1"), ("nope", "2")]);

        assert_eq!(object.get("a"), Some("1"));
        assert_eq!(object.get("nope"), None);
    }

    #[test]
    fn key_requires_an_id() {
        let mut object = Object::new(&FOO);
        assert!(matches!(object.key(), Err(Error::MissingId)));

        object.set_id("7".into());
        assert_eq!(object.key().expect("id assigned"), "Foo:7");
    }

    #[test]
    fn unsaved_instances_never_compare_equal() {
        let a = Object::new(&FOO);
        let b = a.clone();
        assert_ne!(a, b);

        let saved = Object::hydrated(&FOO, "1".into(), [("a", "1")]);
        let loaded = Object::hydrated(&FOO, "1".into(), [("a", "2")]);
        assert_eq!(saved, loaded);
    }
}
