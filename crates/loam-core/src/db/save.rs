use crate::{
    db::Db,
    error::Error,
    model::{Object, Schema},
    script,
    store::Store,
};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// SaveFeatures
/// Feature payload of the save program; `id` is omitted until assigned so
/// the program knows to draw one from the model's counter.
///

#[derive(Serialize)]
struct SaveFeatures<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

///
/// SaveExecutor
///
/// Builds the four JSON arguments of the save program from the instance and
/// its schema, invokes the program, and records the assigned id. Only
/// attributes present on the instance are shipped; absent attributes stay
/// untouched in the store.
///

pub(crate) struct SaveExecutor<'db, S> {
    db: &'db Db<S>,
}

impl<'db, S: Store> SaveExecutor<'db, S> {
    pub(crate) const fn new(db: &'db Db<S>) -> Self {
        Self { db }
    }

    pub(crate) fn create<I, K, V>(
        &self,
        schema: &'static Schema,
        attrs: I,
    ) -> Result<Object, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut object = Object::with(schema, attrs);
        self.save(&mut object)?;

        Ok(object)
    }

    pub(crate) fn update<I, K, V>(&self, object: &mut Object, attrs: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        object.merge(attrs);
        self.save(object)
    }

    pub(crate) fn save(&self, object: &mut Object) -> Result<(), Error> {
        let schema = object.schema();

        let features = SaveFeatures {
            name: schema.name(),
            id: object.id(),
        };

        let mut attrs: Vec<&str> = Vec::with_capacity(object.attributes().len() * 2);
        for (field, value) in object.attributes() {
            attrs.push(field);
            attrs.push(value);
        }

        let mut indices: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for field in schema.indices() {
            if let Some(value) = object.get(field) {
                indices.insert(field, vec![value]);
            }
        }

        let mut uniques: BTreeMap<&str, &str> = BTreeMap::new();
        for field in schema.uniques() {
            if let Some(value) = object.get(field) {
                uniques.insert(field, value);
            }
        }

        let argv = vec![
            script::encode(&features)?,
            script::encode(&attrs)?,
            script::encode(&indices)?,
            script::encode(&uniques)?,
        ];

        let reply = self
            .db
            .save_program
            .invoke(self.db.store(), argv)
            .map_err(Error::from_store)?;

        let id = reply
            .into_bulk()
            .ok_or_else(|| script::malformed_reply("save"))?;

        debug!("saved {}:{id}", schema.name());

        if !object.is_persisted() {
            object.set_id(id);
        }

        Ok(())
    }
}
