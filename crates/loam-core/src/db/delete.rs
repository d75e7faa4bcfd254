use crate::{db::Db, error::Error, model::Object, script, store::Store};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// DeleteFeatures
///

#[derive(Serialize)]
struct DeleteFeatures<'a> {
    name: &'a str,
    id: &'a str,
    key: &'a str,
}

///
/// DeleteExecutor
///
/// Ships the instance's unique claims and the schema's tracked suffixes to
/// the delete program so every piece of persisted state is released in one
/// atomic unit. Requires an assigned id; deleting an id with no stored
/// data is a no-op.
///

pub(crate) struct DeleteExecutor<'db, S> {
    db: &'db Db<S>,
}

impl<'db, S: Store> DeleteExecutor<'db, S> {
    pub(crate) const fn new(db: &'db Db<S>) -> Self {
        Self { db }
    }

    pub(crate) fn delete(&self, object: &Object) -> Result<(), Error> {
        let schema = object.schema();
        let id = object.id().ok_or(Error::MissingId)?;
        let key = object.key()?;

        let features = DeleteFeatures {
            name: schema.name(),
            id,
            key: &key,
        };

        let mut uniques: BTreeMap<&str, &str> = BTreeMap::new();
        for field in schema.uniques() {
            if let Some(value) = object.get(field) {
                uniques.insert(field, value);
            }
        }

        let tracked: Vec<&str> = schema.tracked().collect();

        let argv = vec![
            script::encode(&features)?,
            script::encode(&uniques)?,
            script::encode(&tracked)?,
        ];

        self.db
            .delete_program
            .invoke(self.db.store(), argv)
            .map_err(Error::from_store)?;

        debug!("deleted {}:{id}", schema.name());

        Ok(())
    }
}
