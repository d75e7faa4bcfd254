use crate::{
    db::{Db, load::LoadExecutor},
    error::Error,
    model::{Object, Schema},
    store::{Command, Store},
};

///
/// ModelList
/// Ordered list of instances of one target model, keyed under the owning
/// instance. Membership is a linear scan over the full id list; there is
/// no index on list contents.
///

pub struct ModelList<'db, S> {
    db: &'db Db<S>,
    key: String,
    target: &'static Schema,
}

impl<'db, S: Store> ModelList<'db, S> {
    pub(crate) const fn new(db: &'db Db<S>, key: String, target: &'static Schema) -> Self {
        Self { db, key, target }
    }

    /// Append to the tail.
    pub fn push(&self, member: &Object) -> Result<(), Error> {
        let id = member.id().ok_or(Error::MissingId)?;

        self.db
            .store()
            .call(Command::new("RPUSH", [self.key.as_str(), id]))?;
        Ok(())
    }

    /// Prepend to the head.
    pub fn unshift(&self, member: &Object) -> Result<(), Error> {
        let id = member.id().ok_or(Error::MissingId)?;

        self.db
            .store()
            .call(Command::new("LPUSH", [self.key.as_str(), id]))?;
        Ok(())
    }

    /// Remove every occurrence of the member's id.
    pub fn remove(&self, member: &Object) -> Result<(), Error> {
        let id = member.id().ok_or(Error::MissingId)?;

        self.db
            .store()
            .call(Command::new("LREM", [self.key.as_str(), "0", id]))?;
        Ok(())
    }

    pub fn size(&self) -> Result<u64, Error> {
        let reply = self
            .db
            .store()
            .call(Command::new("LLEN", [self.key.as_str()]))?;

        Ok(reply.as_int().and_then(|n| u64::try_from(n).ok()).unwrap_or(0))
    }

    /// All member ids, head to tail.
    pub fn ids(&self) -> Result<Vec<String>, Error> {
        let reply = self
            .db
            .store()
            .call(Command::new("LRANGE", [self.key.as_str(), "0", "-1"]))?;

        Ok(reply.into_strings())
    }

    /// Linear scan over the full id list.
    pub fn includes(&self, member: &Object) -> Result<bool, Error> {
        let Some(id) = member.id() else {
            return Ok(false);
        };

        Ok(self.ids()?.iter().any(|member_id| member_id == id))
    }

    /// Hydrate every member in list order in one batch read.
    pub fn fetch(&self) -> Result<Vec<Object>, Error> {
        let ids = self.ids()?;

        LoadExecutor::new(self.db).fetch_ids(self.target, &ids)
    }
}
