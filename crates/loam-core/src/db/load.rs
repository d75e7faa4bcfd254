use crate::{
    db::Db,
    error::Error,
    model::{Object, Schema},
    store::{Command, Pipeline, Store},
};

///
/// LoadExecutor
/// Read path: membership-checked single loads, unique lookups, and the
/// pipelined batch hydration behind `fetch` and the collection accessors.
///

pub(crate) struct LoadExecutor<'db, S> {
    db: &'db Db<S>,
}

impl<'db, S: Store> LoadExecutor<'db, S> {
    pub(crate) const fn new(db: &'db Db<S>) -> Self {
        Self { db }
    }

    pub(crate) fn exists(&self, schema: &'static Schema, id: &str) -> Result<bool, Error> {
        let reply = self
            .db
            .store()
            .call(Command::new("SISMEMBER", [schema.keys().all(), id.to_string()]))?;

        Ok(reply.as_int() == Some(1))
    }

    pub(crate) fn get(&self, schema: &'static Schema, id: &str) -> Result<Option<Object>, Error> {
        if !self.exists(schema, id)? {
            return Ok(None);
        }

        let reply = self
            .db
            .store()
            .call(Command::new("HGETALL", [schema.keys().record(id)]))?;

        Ok(Some(Object::hydrated(
            schema,
            id.to_string(),
            reply.into_pairs(),
        )))
    }

    pub(crate) fn with(
        &self,
        schema: &'static Schema,
        field: &str,
        value: &str,
    ) -> Result<Option<Object>, Error> {
        if !schema.is_unique(field) {
            return Err(Error::IndexNotFound {
                field: field.to_string(),
            });
        }

        let reply = self
            .db
            .store()
            .call(Command::new("HGET", [schema.keys().unique(field), value.to_string()]))?;

        match reply.into_bulk() {
            Some(id) => self.get(schema, &id),
            None => Ok(None),
        }
    }

    /// Hydrate a list of ids in one batch round trip, preserving order.
    /// Ids whose attribute hash is empty (stale or deleted) are omitted
    /// rather than failing the batch.
    pub(crate) fn fetch_ids(
        &self,
        schema: &'static Schema,
        ids: &[String],
    ) -> Result<Vec<Object>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys = schema.keys();
        let mut pipeline = Pipeline::new();
        for id in ids {
            pipeline.queue(Command::new("HGETALL", [keys.record(id)]));
        }

        let replies = pipeline.commit(self.db.store())?;

        let mut out = Vec::with_capacity(ids.len());
        for (id, reply) in ids.iter().zip(replies) {
            let pairs: Vec<(String, String)> = reply.into_pairs();
            if pairs.is_empty() {
                continue;
            }
            out.push(Object::hydrated(schema, id.clone(), pairs));
        }

        Ok(out)
    }
}
