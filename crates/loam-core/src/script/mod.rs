//! Embedded server-side programs and the per-program script cache.
//!
//! Programs are identified by the hash the store hands back from
//! `SCRIPT LOAD`; the store is the hash authority, the client never digests
//! program text itself.

use crate::store::{Command, Reply, Store, StoreError};
use log::debug;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// Atomic save program.
pub const SAVE: &str = include_str!("../../lua/save.lua");

/// Atomic delete program.
pub const DELETE: &str = include_str!("../../lua/delete.lua");

/// JSON-encode one program argument.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value)
        .map_err(|err| StoreError::new(format!("ERR could not encode program argument: {err}")))
}

/// A program replied with something other than the expected bulk string.
pub(crate) fn malformed_reply(program: &str) -> crate::error::Error {
    crate::error::Error::Store(StoreError::new(format!(
        "ERR {program} program returned a non-bulk reply"
    )))
}

///
/// ScriptCache
///
/// One per program. State machine: `Unloaded` → `Loaded(sha)` on the first
/// successful `SCRIPT LOAD`; a NOSCRIPT reply (script flushed, store
/// restarted, replica switch) re-registers the program and retries the call
/// exactly once. A second failure propagates unchanged; every other store
/// error is fatal to the calling operation.
///

#[derive(Debug)]
pub struct ScriptCache {
    body: &'static str,
    sha: Mutex<Option<String>>,
}

impl ScriptCache {
    #[must_use]
    pub const fn new(body: &'static str) -> Self {
        Self {
            body,
            sha: Mutex::new(None),
        }
    }

    /// Run the program with `argv` (no key arguments; every key is derived
    /// inside the program from the JSON payloads).
    pub fn invoke<S: Store>(&self, store: &S, argv: Vec<String>) -> Result<Reply, StoreError> {
        let sha = match self.cached() {
            Some(sha) => sha,
            None => self.load(store)?,
        };

        match self.eval(store, &sha, &argv) {
            Err(err) if err.is_noscript() => {
                debug!("program {sha} unknown to store, re-registering");
                let sha = self.load(store)?;
                self.eval(store, &sha, &argv)
            }
            other => other,
        }
    }

    fn eval<S: Store>(&self, store: &S, sha: &str, argv: &[String]) -> Result<Reply, StoreError> {
        let mut args = Vec::with_capacity(argv.len() + 2);
        args.push(sha.to_string());
        args.push("0".to_string());
        args.extend_from_slice(argv);

        store.call(Command::new("EVALSHA", args))
    }

    fn load<S: Store>(&self, store: &S) -> Result<String, StoreError> {
        let reply = store.call(Command::new("SCRIPT", ["LOAD", self.body]))?;

        let sha = reply
            .into_bulk()
            .ok_or_else(|| StoreError::new("ERR SCRIPT LOAD returned a non-bulk reply"))?;

        debug!("registered program as {sha}");
        *self.slot() = Some(sha.clone());

        Ok(sha)
    }

    fn cached(&self) -> Option<String> {
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.sha.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
