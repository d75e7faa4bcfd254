use crate::{
    db::{Db, load::LoadExecutor},
    error::Error,
    model::{Object, Schema},
    store::{Command, Store},
};

///
/// ModelSet
/// Unordered set of instances of one target model, keyed under the owning
/// instance. Stores ids; hydration goes through the target schema.
///

pub struct ModelSet<'db, S> {
    db: &'db Db<S>,
    key: String,
    target: &'static Schema,
}

impl<'db, S: Store> ModelSet<'db, S> {
    pub(crate) const fn new(db: &'db Db<S>, key: String, target: &'static Schema) -> Self {
        Self { db, key, target }
    }

    pub fn add(&self, member: &Object) -> Result<(), Error> {
        let id = member.id().ok_or(Error::MissingId)?;

        self.db
            .store()
            .call(Command::new("SADD", [self.key.as_str(), id]))?;
        Ok(())
    }

    pub fn remove(&self, member: &Object) -> Result<(), Error> {
        let id = member.id().ok_or(Error::MissingId)?;

        self.db
            .store()
            .call(Command::new("SREM", [self.key.as_str(), id]))?;
        Ok(())
    }

    /// Membership test; an instance with no id is never a member.
    pub fn includes(&self, member: &Object) -> Result<bool, Error> {
        let Some(id) = member.id() else {
            return Ok(false);
        };

        let reply = self
            .db
            .store()
            .call(Command::new("SISMEMBER", [self.key.as_str(), id]))?;

        Ok(reply.as_int() == Some(1))
    }

    pub fn size(&self) -> Result<u64, Error> {
        let reply = self
            .db
            .store()
            .call(Command::new("SCARD", [self.key.as_str()]))?;

        Ok(reply.as_int().and_then(|n| u64::try_from(n).ok()).unwrap_or(0))
    }

    pub fn ids(&self) -> Result<Vec<String>, Error> {
        let reply = self
            .db
            .store()
            .call(Command::new("SMEMBERS", [self.key.as_str()]))?;

        Ok(reply.into_strings())
    }

    /// Hydrate every member through the target schema in one batch read.
    pub fn fetch(&self) -> Result<Vec<Object>, Error> {
        let ids = self.ids()?;

        LoadExecutor::new(self.db).fetch_ids(self.target, &ids)
    }
}
