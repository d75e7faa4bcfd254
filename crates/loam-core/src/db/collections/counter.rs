use crate::{
    db::Db,
    error::Error,
    store::{Command, Store, StoreError},
};

///
/// Counter
///
/// Signed-delta counter scoped to one persisted instance. Distinct from
/// attributes: mutated only by atomic increments, never set directly, and
/// a counter that was never incremented reads 0.
///

pub struct Counter<'db, S> {
    db: &'db Db<S>,
    key: String,
    name: String,
}

impl<S> core::fmt::Debug for Counter<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Counter")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<'db, S: Store> Counter<'db, S> {
    pub(crate) const fn new(db: &'db Db<S>, key: String, name: String) -> Self {
        Self { db, key, name }
    }

    /// Apply a signed delta atomically, returning the new value.
    pub fn incr(&self, delta: i64) -> Result<i64, Error> {
        let reply = self.db.store().call(Command::new(
            "HINCRBY",
            [self.key.clone(), self.name.clone(), delta.to_string()],
        ))?;

        reply
            .as_int()
            .ok_or_else(|| malformed(&self.name).into())
    }

    pub fn decr(&self, delta: i64) -> Result<i64, Error> {
        self.incr(-delta)
    }

    pub fn get(&self) -> Result<i64, Error> {
        let reply = self
            .db
            .store()
            .call(Command::new("HGET", [self.key.clone(), self.name.clone()]))?;

        match reply.into_bulk() {
            Some(raw) => raw.parse().map_err(|_| malformed(&self.name).into()),
            None => Ok(0),
        }
    }
}

fn malformed(name: &str) -> StoreError {
    StoreError::new(format!("ERR counter '{name}' holds a non-integer value"))
}
