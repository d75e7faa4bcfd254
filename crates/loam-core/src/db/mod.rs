//! Engine entry point and executors.
//!
//! [`Db`] binds a [`Store`] implementation to the persistence engine, the
//! finder, and the collection accessors. It holds no cached state beyond
//! the two program hashes, so sharing it by reference across tasks is safe
//! and every read is a fresh round trip.

pub mod collections;
pub mod query;

mod delete;
mod load;
mod save;

pub use collections::{Counter, ModelList, ModelSet};

use crate::{
    error::Error,
    key::COUNTERS_SUFFIX,
    model::{self, Object, Schema},
    script::{self, ScriptCache},
    store::Store,
};
use delete::DeleteExecutor;
use load::LoadExecutor;
use query::{Filter, Finder};
use save::SaveExecutor;

///
/// Db
///

pub struct Db<S> {
    store: S,
    save_program: ScriptCache,
    delete_program: ScriptCache,
}

impl<S: Store> Db<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            save_program: ScriptCache::new(script::SAVE),
            delete_program: ScriptCache::new(script::DELETE),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // ======================================================================
    // Direct lookup
    // ======================================================================

    /// Load one instance by id. `None` when the id is not a member of the
    /// model's membership set.
    pub fn get(&self, schema: &'static Schema, id: &str) -> Result<Option<Object>, Error> {
        LoadExecutor::new(self).get(schema, id)
    }

    /// Load one instance through a unique field. `IndexNotFound` when the
    /// field is not declared unique.
    pub fn with(
        &self,
        schema: &'static Schema,
        field: &str,
        value: &str,
    ) -> Result<Option<Object>, Error> {
        LoadExecutor::new(self).with(schema, field, value)
    }

    /// Membership check only; no attribute read.
    pub fn exists(&self, schema: &'static Schema, id: &str) -> Result<bool, Error> {
        LoadExecutor::new(self).exists(schema, id)
    }

    // ======================================================================
    // Persistence
    // ======================================================================

    /// Construct and save in one call. Unknown attribute keys are dropped.
    pub fn create<I, K, V>(&self, schema: &'static Schema, attrs: I) -> Result<Object, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        SaveExecutor::new(self).create(schema, attrs)
    }

    /// Persist the instance atomically: id assignment on first save,
    /// attribute writes, index maintenance, unique claims. On a uniqueness
    /// conflict nothing is written and a first save leaves the id unset.
    pub fn save(&self, object: &mut Object) -> Result<(), Error> {
        SaveExecutor::new(self).save(object)
    }

    /// Merge attributes (unknown keys dropped) and save.
    pub fn update<I, K, V>(&self, object: &mut Object, attrs: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        SaveExecutor::new(self).update(object, attrs)
    }

    /// Release all persisted state atomically: membership, attributes,
    /// index memberships, unique claims, tracked keys. Idempotent.
    pub fn delete(&self, object: &Object) -> Result<(), Error> {
        DeleteExecutor::new(self).delete(object)
    }

    // ======================================================================
    // Queries
    // ======================================================================

    /// The identity finder: its expression is exactly the membership set.
    #[must_use]
    pub fn all(&self, schema: &'static Schema) -> Finder<'_, S> {
        Finder::all(self, schema)
    }

    /// Finder over the intersection of the filter's index sets.
    pub fn find(
        &self,
        schema: &'static Schema,
        filter: impl Into<Filter>,
    ) -> Result<Finder<'_, S>, Error> {
        Finder::filtered(self, schema, &filter.into())
    }

    // ======================================================================
    // Collection accessors (persisted instances only)
    // ======================================================================

    pub fn counter(&self, object: &Object, name: &str) -> Result<Counter<'_, S>, Error> {
        let schema = object.schema();
        if !schema.has_counter(name) {
            return Err(undeclared(schema, name));
        }
        let id = object.id().ok_or(Error::MissingId)?;

        Ok(Counter::new(
            self,
            schema.keys().sub(id, COUNTERS_SUFFIX),
            name.to_string(),
        ))
    }

    pub fn set_of(&self, object: &Object, name: &str) -> Result<ModelSet<'_, S>, Error> {
        let schema = object.schema();
        let target = schema
            .set_target(name)
            .ok_or_else(|| undeclared(schema, name))?;
        let target = resolve(target)?;
        let id = object.id().ok_or(Error::MissingId)?;

        Ok(ModelSet::new(self, schema.keys().sub(id, name), target))
    }

    pub fn list_of(&self, object: &Object, name: &str) -> Result<ModelList<'_, S>, Error> {
        let schema = object.schema();
        let target = schema
            .list_target(name)
            .ok_or_else(|| undeclared(schema, name))?;
        let target = resolve(target)?;
        let id = object.id().ok_or(Error::MissingId)?;

        Ok(ModelList::new(self, schema.keys().sub(id, name), target))
    }

    /// Follow a reference attribute. `None` when the attribute is unset or
    /// the referenced instance is gone; never an error.
    pub fn get_ref(&self, object: &Object, field: &str) -> Result<Option<Object>, Error> {
        let schema = object.schema();
        let target = schema
            .reference_target(field)
            .ok_or_else(|| undeclared(schema, field))?;

        let Some(id) = object.get(field) else {
            return Ok(None);
        };

        self.get(resolve(target)?, id)
    }

    /// Point a reference attribute at a persisted instance. In-memory only;
    /// `save` persists it.
    pub fn set_ref(&self, object: &mut Object, field: &str, target: &Object) -> Result<(), Error> {
        let schema = object.schema();
        if schema.reference_target(field).is_none() {
            return Err(undeclared(schema, field));
        }
        let id = target.id().ok_or(Error::MissingId)?.to_string();

        let _ = object.set(field, id);
        Ok(())
    }

    /// Derived finder over the inverse of a reference:
    /// `target.find(foreign_key = self.id)`.
    pub fn collection(&self, object: &Object, name: &str) -> Result<Finder<'_, S>, Error> {
        let schema = object.schema();
        let (target, foreign_key) = schema
            .collection(name)
            .ok_or_else(|| undeclared(schema, name))?;
        let id = object.id().ok_or(Error::MissingId)?;

        Finder::filtered(
            self,
            resolve(target)?,
            &Filter::new().eq(foreign_key, id),
        )
    }

    /// Resolve a tracked key. Content is caller-managed; the engine only
    /// guarantees deletion when the instance is deleted.
    pub fn tracked_key(&self, object: &Object, suffix: &str) -> Result<String, Error> {
        let schema = object.schema();
        if !schema.is_tracked(suffix) {
            return Err(undeclared(schema, suffix));
        }
        let id = object.id().ok_or(Error::MissingId)?;

        Ok(schema.keys().sub(id, suffix))
    }
}

fn undeclared(schema: &Schema, field: &str) -> Error {
    Error::Undeclared {
        model: schema.name().to_string(),
        field: field.to_string(),
    }
}

fn resolve(name: &str) -> Result<&'static Schema, Error> {
    model::lookup(name).ok_or_else(|| Error::UnknownModel {
        name: name.to_string(),
    })
}
