//! In-memory reference backend.
//!
//! Implements the command subset the engine consumes. The two registered
//! programs are executed natively: a host process cannot run the store's
//! scripting language, so program bodies are recognized by identity after
//! `SCRIPT LOAD` and dispatched to Rust implementations with the same
//! semantics, including the all-verification-before-any-write rule of the
//! save program. Batch commits hold the lock for the whole batch, which
//! models the store's single command thread.

use crate::{
    key::{INDEX_MEMO_SUFFIX, KeySpace, UNIQUE_MEMO_SUFFIX},
    script,
    store::{Command, Reply, Store, StoreError},
};
use log::trace;
use serde_json::Value;
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{Mutex, PoisonError},
};

///
/// Entry
/// One keyed value. Commands that hit a key holding the wrong kind fail
/// with a WRONGTYPE message, like the real store.
///

#[derive(Clone, Debug)]
enum Entry {
    Str(String),
    Set(BTreeSet<String>),
    List(Vec<String>),
    Hash(BTreeMap<String, String>),
}

///
/// MemoryStore
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    data: HashMap<String, Entry>,
    scripts: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys (test observability).
    pub fn key_count(&self) -> usize {
        self.lock().data.len()
    }

    /// Keys currently live under a prefix (test observability).
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .data
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn call(&self, command: Command) -> Result<Reply, StoreError> {
        trace!("memory call: {} {:?}", command.name, command.args);
        self.lock().execute(&command)
    }

    fn commit(&self, batch: &[Command]) -> Result<Vec<Reply>, StoreError> {
        trace!("memory commit: {} commands", batch.len());
        let mut inner = self.lock();

        // One failing command fails the batch; the engine only batches
        // commands that cannot conflict on type.
        batch.iter().map(|command| inner.execute(command)).collect()
    }
}

fn wrong_type() -> StoreError {
    StoreError::new("WRONGTYPE Operation against a key holding the wrong kind of value")
}

fn bad_arity(name: &str) -> StoreError {
    StoreError::new(format!("ERR wrong number of arguments for '{name}'"))
}

fn bad_int() -> StoreError {
    StoreError::new("ERR value is not an integer or out of range")
}

/// Process-local script token. The contract only requires `EVALSHA` to echo
/// what `SCRIPT LOAD` returned, so no wire-compatible digest is needed.
fn script_sha(body: &str) -> String {
    use std::hash::{DefaultHasher, Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

impl Inner {
    #[expect(clippy::too_many_lines)]
    fn execute(&mut self, command: &Command) -> Result<Reply, StoreError> {
        let args = &command.args;

        match command.name {
            "INCR" => {
                let [key] = args.as_slice() else {
                    return Err(bad_arity("INCR"));
                };
                self.incr(key, 1).map(Reply::Int)
            }
            "DEL" => {
                if args.is_empty() {
                    return Err(bad_arity("DEL"));
                }
                let removed = args.iter().filter(|k| self.data.remove(*k).is_some()).count();
                Ok(Reply::Int(removed as i64))
            }
            "EXISTS" => {
                let [key] = args.as_slice() else {
                    return Err(bad_arity("EXISTS"));
                };
                Ok(Reply::Int(i64::from(self.data.contains_key(key))))
            }
            "SADD" => {
                let [key, members @ ..] = args.as_slice() else {
                    return Err(bad_arity("SADD"));
                };
                if members.is_empty() {
                    return Err(bad_arity("SADD"));
                }
                let mut added = 0;
                for member in members {
                    if self.set_add(key, member)? {
                        added += 1;
                    }
                }
                Ok(Reply::Int(added))
            }
            "SREM" => {
                let [key, members @ ..] = args.as_slice() else {
                    return Err(bad_arity("SREM"));
                };
                let mut removed = 0;
                for member in members {
                    if self.set_remove(key, member)? {
                        removed += 1;
                    }
                }
                Ok(Reply::Int(removed))
            }
            "SMEMBERS" => {
                let [key] = args.as_slice() else {
                    return Err(bad_arity("SMEMBERS"));
                };
                let members = self.set_members(key)?;
                Ok(Reply::Array(members.into_iter().map(Reply::Bulk).collect()))
            }
            "SISMEMBER" => {
                let [key, member] = args.as_slice() else {
                    return Err(bad_arity("SISMEMBER"));
                };
                let found = match self.set_ref(key)? {
                    Some(set) => set.contains(member),
                    None => false,
                };
                Ok(Reply::Int(i64::from(found)))
            }
            "SCARD" => {
                let [key] = args.as_slice() else {
                    return Err(bad_arity("SCARD"));
                };
                let len = self.set_ref(key)?.map_or(0, BTreeSet::len);
                Ok(Reply::Int(len as i64))
            }
            "SINTERSTORE" | "SUNIONSTORE" | "SDIFFSTORE" => {
                let [dst, srcs @ ..] = args.as_slice() else {
                    return Err(bad_arity(command.name));
                };
                if srcs.is_empty() {
                    return Err(bad_arity(command.name));
                }

                let mut sets = Vec::with_capacity(srcs.len());
                for src in srcs {
                    sets.push(self.set_ref(src)?.cloned().unwrap_or_default());
                }

                let mut result = sets[0].clone();
                for set in &sets[1..] {
                    match command.name {
                        "SINTERSTORE" => result.retain(|m| set.contains(m)),
                        "SUNIONSTORE" => result.extend(set.iter().cloned()),
                        _ => result.retain(|m| !set.contains(m)),
                    }
                }

                let len = result.len();
                if result.is_empty() {
                    self.data.remove(dst);
                } else {
                    self.data.insert(dst.clone(), Entry::Set(result));
                }
                Ok(Reply::Int(len as i64))
            }
            "HSET" => {
                let [key, pairs @ ..] = args.as_slice() else {
                    return Err(bad_arity("HSET"));
                };
                if pairs.is_empty() || pairs.len() % 2 != 0 {
                    return Err(bad_arity("HSET"));
                }
                let mut created = 0;
                for pair in pairs.chunks_exact(2) {
                    if self.hash_set(key, &pair[0], &pair[1])? {
                        created += 1;
                    }
                }
                Ok(Reply::Int(created))
            }
            "HGET" => {
                let [key, field] = args.as_slice() else {
                    return Err(bad_arity("HGET"));
                };
                Ok(self
                    .hash_get(key, field)?
                    .map_or(Reply::Nil, |v| Reply::Bulk(v.to_string())))
            }
            "HDEL" => {
                let [key, fields @ ..] = args.as_slice() else {
                    return Err(bad_arity("HDEL"));
                };
                let mut removed = 0;
                for field in fields {
                    if self.hash_del(key, field)? {
                        removed += 1;
                    }
                }
                Ok(Reply::Int(removed))
            }
            "HGETALL" => {
                let [key] = args.as_slice() else {
                    return Err(bad_arity("HGETALL"));
                };
                let pairs = self.hash_pairs(key)?;
                let mut flat = Vec::with_capacity(pairs.len() * 2);
                for (field, value) in pairs {
                    flat.push(Reply::Bulk(field));
                    flat.push(Reply::Bulk(value));
                }
                Ok(Reply::Array(flat))
            }
            "HINCRBY" => {
                let [key, field, delta] = args.as_slice() else {
                    return Err(bad_arity("HINCRBY"));
                };
                let delta: i64 = delta.parse().map_err(|_| bad_int())?;
                let current: i64 = match self.hash_get(key, field)? {
                    Some(v) => v.parse().map_err(|_| bad_int())?,
                    None => 0,
                };
                let next = current + delta;
                self.hash_set(key, field, &next.to_string())?;
                Ok(Reply::Int(next))
            }
            "RPUSH" | "LPUSH" => {
                let [key, values @ ..] = args.as_slice() else {
                    return Err(bad_arity(command.name));
                };
                if values.is_empty() {
                    return Err(bad_arity(command.name));
                }
                let list = self.list_mut(key)?;
                for value in values {
                    if command.name == "RPUSH" {
                        list.push(value.clone());
                    } else {
                        list.insert(0, value.clone());
                    }
                }
                Ok(Reply::Int(list.len() as i64))
            }
            "LLEN" => {
                let [key] = args.as_slice() else {
                    return Err(bad_arity("LLEN"));
                };
                let len = self.list_ref(key)?.map_or(0, Vec::len);
                Ok(Reply::Int(len as i64))
            }
            "LRANGE" => {
                let [key, start, stop] = args.as_slice() else {
                    return Err(bad_arity("LRANGE"));
                };
                let start: i64 = start.parse().map_err(|_| bad_int())?;
                let stop: i64 = stop.parse().map_err(|_| bad_int())?;
                let items = self.list_ref(key)?.map_or_else(Vec::new, |list| {
                    let len = list.len() as i64;
                    let lo = normalize_bound(start, len).max(0);
                    let hi = normalize_bound(stop, len).min(len - 1);
                    if lo > hi {
                        Vec::new()
                    } else {
                        list[lo as usize..=hi as usize].to_vec()
                    }
                });
                Ok(Reply::Array(items.into_iter().map(Reply::Bulk).collect()))
            }
            "LREM" => {
                let [key, count, value] = args.as_slice() else {
                    return Err(bad_arity("LREM"));
                };
                let count: i64 = count.parse().map_err(|_| bad_int())?;
                Ok(Reply::Int(self.list_remove(key, count, value)?))
            }
            "SCRIPT" => {
                let [sub, rest @ ..] = args.as_slice() else {
                    return Err(bad_arity("SCRIPT"));
                };
                match sub.to_ascii_uppercase().as_str() {
                    "LOAD" => {
                        let [body] = rest else {
                            return Err(bad_arity("SCRIPT"));
                        };
                        let sha = script_sha(body);
                        self.scripts.insert(sha.clone(), body.clone());
                        Ok(Reply::Bulk(sha))
                    }
                    "FLUSH" => {
                        self.scripts.clear();
                        Ok(Reply::Status("OK".into()))
                    }
                    _ => Err(StoreError::new(format!("ERR unknown SCRIPT subcommand '{sub}'"))),
                }
            }
            "EVALSHA" => {
                let [sha, numkeys, rest @ ..] = args.as_slice() else {
                    return Err(bad_arity("EVALSHA"));
                };
                let numkeys: usize = numkeys.parse().map_err(|_| bad_int())?;
                if rest.len() < numkeys {
                    return Err(bad_arity("EVALSHA"));
                }
                let argv = &rest[numkeys..];

                let Some(body) = self.scripts.get(sha).cloned() else {
                    return Err(StoreError::new(
                        "NOSCRIPT No matching script. Please use EVAL.",
                    ));
                };

                if body == script::SAVE {
                    self.run_save(argv)
                } else if body == script::DELETE {
                    self.run_delete(argv)
                } else {
                    Err(StoreError::new("ERR unrecognized program body"))
                }
            }
            other => Err(StoreError::new(format!("ERR unknown command '{other}'"))),
        }
    }

    // ======================================================================
    // Registered programs, executed natively
    // ======================================================================

    /// Native rendition of `lua/save.lua`. Verification of every unique
    /// claim precedes every write, so a conflict aborts with no side
    /// effects at all.
    fn run_save(&mut self, argv: &[String]) -> Result<Reply, StoreError> {
        let [features, attrs, indices, uniques] = argv else {
            return Err(bad_arity("EVALSHA"));
        };

        let features: Value = decode_json(features)?;
        let attrs: Vec<String> = serde_json::from_str(attrs).map_err(|_| bad_json())?;
        let indices: BTreeMap<String, Vec<String>> =
            serde_json::from_str(indices).map_err(|_| bad_json())?;
        let uniques: BTreeMap<String, String> =
            serde_json::from_str(uniques).map_err(|_| bad_json())?;

        let name = feature_str(&features, "name")?;
        let id = features.get("id").and_then(Value::as_str).map(String::from);
        let keys = KeySpace::new(&name);

        // verify every unique claim
        for (field, value) in &uniques {
            let holder = self.hash_get(&keys.unique(field), value)?.map(String::from);

            if let Some(holder) = holder
                && id.as_deref() != Some(holder.as_str())
            {
                return Err(StoreError::new(format!("UniqueIndexViolation: {field}")));
            }
        }

        // assign an id on first save and join the membership set
        let id = match id {
            Some(id) => id,
            None => self.incr(&keys.id_counter(), 1)?.to_string(),
        };

        self.set_add(&keys.all(), &id)?;

        // write the present attributes
        let record = keys.record(&id);
        for pair in attrs.chunks_exact(2) {
            self.hash_set(&record, &pair[0], &pair[1])?;
        }

        // refresh index memberships through the membership memo
        let memo = keys.sub(&id, INDEX_MEMO_SUFFIX);
        for index_key in self.set_members(&memo)? {
            self.set_remove(&index_key, &id)?;
        }
        self.data.remove(&memo);

        for (field, values) in &indices {
            for value in values {
                let index_key = keys.index(field, value);

                self.set_add(&index_key, &id)?;
                self.set_add(&memo, &index_key)?;
            }
        }

        // refresh unique claims through the claim memo
        let claims = keys.sub(&id, UNIQUE_MEMO_SUFFIX);
        for (unique_key, value) in self.hash_pairs(&claims)? {
            self.hash_del(&unique_key, &value)?;
        }
        self.data.remove(&claims);

        for (field, value) in &uniques {
            let unique_key = keys.unique(field);

            self.hash_set(&unique_key, value, &id)?;
            self.hash_set(&claims, &unique_key, value)?;
        }

        Ok(Reply::Bulk(id))
    }

    /// Native rendition of `lua/delete.lua`. Idempotent.
    fn run_delete(&mut self, argv: &[String]) -> Result<Reply, StoreError> {
        let [features, uniques, tracked] = argv else {
            return Err(bad_arity("EVALSHA"));
        };

        let features: Value = decode_json(features)?;
        let uniques: BTreeMap<String, String> =
            serde_json::from_str(uniques).map_err(|_| bad_json())?;
        let tracked: Vec<String> = serde_json::from_str(tracked).map_err(|_| bad_json())?;

        let name = feature_str(&features, "name")?;
        let id = feature_str(&features, "id")?;
        let key = feature_str(&features, "key")?;
        let keys = KeySpace::new(&name);

        // release unique claims, preferring the memo over supplied values
        let claims = format!("{key}:{UNIQUE_MEMO_SUFFIX}");
        for (field, value) in &uniques {
            let unique_key = keys.unique(field);
            let held = self
                .hash_get(&claims, &unique_key)?
                .map_or_else(|| value.clone(), String::from);

            self.hash_del(&unique_key, &held)?;
        }
        self.data.remove(&claims);

        // release index memberships recorded by save
        let memo = format!("{key}:{INDEX_MEMO_SUFFIX}");
        for index_key in self.set_members(&memo)? {
            self.set_remove(&index_key, &id)?;
        }
        self.data.remove(&memo);

        for suffix in &tracked {
            self.data.remove(&format!("{key}:{suffix}"));
        }

        self.set_remove(&keys.all(), &id)?;
        self.data.remove(&key);

        Ok(Reply::Bulk(id))
    }

    // ======================================================================
    // Keyed-value primitives shared by commands and programs
    // ======================================================================

    fn incr(&mut self, key: &str, delta: i64) -> Result<i64, StoreError> {
        let current = match self.data.get(key) {
            Some(Entry::Str(s)) => s.parse::<i64>().map_err(|_| bad_int())?,
            Some(_) => return Err(wrong_type()),
            None => 0,
        };
        let next = current + delta;
        self.data.insert(key.to_string(), Entry::Str(next.to_string()));
        Ok(next)
    }

    fn set_ref(&self, key: &str) -> Result<Option<&BTreeSet<String>>, StoreError> {
        match self.data.get(key) {
            Some(Entry::Set(set)) => Ok(Some(set)),
            Some(_) => Err(wrong_type()),
            None => Ok(None),
        }
    }

    fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .set_ref(key)?
            .map_or_else(Vec::new, |set| set.iter().cloned().collect()))
    }

    fn set_add(&mut self, key: &str, member: &str) -> Result<bool, StoreError> {
        match self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(BTreeSet::new()))
        {
            Entry::Set(set) => Ok(set.insert(member.to_string())),
            _ => Err(wrong_type()),
        }
    }

    fn set_remove(&mut self, key: &str, member: &str) -> Result<bool, StoreError> {
        let (removed, emptied) = match self.data.get_mut(key) {
            Some(Entry::Set(set)) => (set.remove(member), set.is_empty()),
            Some(_) => return Err(wrong_type()),
            None => (false, false),
        };
        if emptied {
            self.data.remove(key);
        }
        Ok(removed)
    }

    fn hash_get(&self, key: &str, field: &str) -> Result<Option<&str>, StoreError> {
        match self.data.get(key) {
            Some(Entry::Hash(hash)) => Ok(hash.get(field).map(String::as_str)),
            Some(_) => Err(wrong_type()),
            None => Ok(None),
        }
    }

    fn hash_pairs(&self, key: &str) -> Result<Vec<(String, String)>, StoreError> {
        match self.data.get(key) {
            Some(Entry::Hash(hash)) => Ok(hash
                .iter()
                .map(|(f, v)| (f.clone(), v.clone()))
                .collect()),
            Some(_) => Err(wrong_type()),
            None => Ok(Vec::new()),
        }
    }

    fn hash_set(&mut self, key: &str, field: &str, value: &str) -> Result<bool, StoreError> {
        match self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(BTreeMap::new()))
        {
            Entry::Hash(hash) => Ok(hash.insert(field.to_string(), value.to_string()).is_none()),
            _ => Err(wrong_type()),
        }
    }

    fn hash_del(&mut self, key: &str, field: &str) -> Result<bool, StoreError> {
        let (removed, emptied) = match self.data.get_mut(key) {
            Some(Entry::Hash(hash)) => (hash.remove(field).is_some(), hash.is_empty()),
            Some(_) => return Err(wrong_type()),
            None => (false, false),
        };
        if emptied {
            self.data.remove(key);
        }
        Ok(removed)
    }

    fn list_ref(&self, key: &str) -> Result<Option<&Vec<String>>, StoreError> {
        match self.data.get(key) {
            Some(Entry::List(list)) => Ok(Some(list)),
            Some(_) => Err(wrong_type()),
            None => Ok(None),
        }
    }

    fn list_mut(&mut self, key: &str) -> Result<&mut Vec<String>, StoreError> {
        match self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()))
        {
            Entry::List(list) => Ok(list),
            _ => Err(wrong_type()),
        }
    }

    fn list_remove(&mut self, key: &str, count: i64, value: &str) -> Result<i64, StoreError> {
        match self.data.get(key) {
            Some(Entry::List(_)) => {}
            Some(_) => return Err(wrong_type()),
            None => return Ok(0),
        }
        let Some(Entry::List(list)) = self.data.get_mut(key) else {
            return Ok(0);
        };

        let limit = if count == 0 {
            usize::MAX
        } else {
            count.unsigned_abs() as usize
        };
        let mut removed = 0;

        if count >= 0 {
            list.retain(|item| {
                if removed < limit && item == value {
                    removed += 1;
                    false
                } else {
                    true
                }
            });
        } else {
            let mut keep: Vec<String> = Vec::with_capacity(list.len());
            for item in list.drain(..).rev() {
                if removed < limit && item == value {
                    removed += 1;
                } else {
                    keep.push(item);
                }
            }
            keep.reverse();
            *list = keep;
        }

        let emptied = list.is_empty();
        if emptied {
            self.data.remove(key);
        }
        Ok(removed as i64)
    }
}

fn normalize_bound(index: i64, len: i64) -> i64 {
    if index < 0 { len + index } else { index }
}

fn bad_json() -> StoreError {
    StoreError::new("ERR program argument is not valid JSON")
}

fn decode_json(raw: &str) -> Result<Value, StoreError> {
    serde_json::from_str(raw).map_err(|_| bad_json())
}

fn feature_str(features: &Value, field: &str) -> Result<String, StoreError> {
    features
        .get(field)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| StoreError::new(format!("ERR program features missing '{field}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(store: &MemoryStore, name: &'static str, args: &[&str]) -> Reply {
        store
            .call(Command::new(name, args.iter().copied()))
            .expect("command failed")
    }

    #[test]
    fn incr_counts_from_zero() {
        let store = MemoryStore::new();
        assert_eq!(call(&store, "INCR", &["User:id"]), Reply::Int(1));
        assert_eq!(call(&store, "INCR", &["User:id"]), Reply::Int(2));
    }

    #[test]
    fn set_commands_round_trip() {
        let store = MemoryStore::new();
        call(&store, "SADD", &["k", "b", "a", "a"]);

        assert_eq!(call(&store, "SCARD", &["k"]), Reply::Int(2));
        assert_eq!(call(&store, "SISMEMBER", &["k", "a"]), Reply::Int(1));
        assert_eq!(
            call(&store, "SMEMBERS", &["k"]),
            Reply::Array(vec![Reply::Bulk("a".into()), Reply::Bulk("b".into())])
        );
    }

    #[test]
    fn emptied_keys_are_removed() {
        let store = MemoryStore::new();
        call(&store, "SADD", &["k", "a"]);
        call(&store, "SREM", &["k", "a"]);
        assert_eq!(call(&store, "EXISTS", &["k"]), Reply::Int(0));

        call(&store, "HSET", &["h", "f", "v"]);
        call(&store, "HDEL", &["h", "f"]);
        assert_eq!(call(&store, "EXISTS", &["h"]), Reply::Int(0));
    }

    #[test]
    fn store_operations_treat_missing_keys_as_empty() {
        let store = MemoryStore::new();
        call(&store, "SADD", &["a", "1", "2"]);

        assert_eq!(
            call(&store, "SINTERSTORE", &["dst", "a", "missing"]),
            Reply::Int(0)
        );
        assert_eq!(call(&store, "EXISTS", &["dst"]), Reply::Int(0));

        assert_eq!(
            call(&store, "SUNIONSTORE", &["dst", "a", "missing"]),
            Reply::Int(2)
        );
        assert_eq!(
            call(&store, "SDIFFSTORE", &["dst", "a", "missing"]),
            Reply::Int(2)
        );
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let store = MemoryStore::new();
        call(&store, "SADD", &["k", "a"]);

        let err = store
            .call(Command::new("INCR", ["k"]))
            .expect_err("INCR on a set must fail");
        assert!(err.message.contains("WRONGTYPE"));
    }

    #[test]
    fn lrange_supports_negative_bounds() {
        let store = MemoryStore::new();
        call(&store, "RPUSH", &["l", "a", "b", "c"]);

        assert_eq!(
            call(&store, "LRANGE", &["l", "0", "-1"]),
            Reply::Array(vec![
                Reply::Bulk("a".into()),
                Reply::Bulk("b".into()),
                Reply::Bulk("c".into()),
            ])
        );
        assert_eq!(
            call(&store, "LRANGE", &["l", "-2", "-1"]),
            Reply::Array(vec![Reply::Bulk("b".into()), Reply::Bulk("c".into())])
        );
        assert_eq!(call(&store, "LRANGE", &["l", "5", "9"]), Reply::Array(vec![]));
    }

    #[test]
    fn lrem_removes_all_occurrences_when_count_is_zero() {
        let store = MemoryStore::new();
        call(&store, "RPUSH", &["l", "x", "y", "x", "x"]);

        assert_eq!(call(&store, "LREM", &["l", "0", "x"]), Reply::Int(3));
        assert_eq!(call(&store, "LLEN", &["l"]), Reply::Int(1));
    }

    #[test]
    fn lpush_prepends_each_value() {
        let store = MemoryStore::new();
        call(&store, "LPUSH", &["l", "a", "b"]);

        assert_eq!(
            call(&store, "LRANGE", &["l", "0", "-1"]),
            Reply::Array(vec![Reply::Bulk("b".into()), Reply::Bulk("a".into())])
        );
    }

    #[test]
    fn evalsha_of_unknown_sha_reports_noscript() {
        let store = MemoryStore::new();
        let err = store
            .call(Command::new("EVALSHA", ["feedbeef", "0"]))
            .expect_err("unknown sha must fail");
        assert!(err.is_noscript());
    }

    #[test]
    fn script_load_is_echoed_by_evalsha() {
        let store = MemoryStore::new();
        let sha = call(&store, "SCRIPT", &["LOAD", script::DELETE])
            .into_bulk()
            .expect("sha");

        let reply = store
            .call(Command::new(
                "EVALSHA",
                [
                    sha.as_str(),
                    "0",
                    r#"{"name":"User","id":"9","key":"User:9"}"#,
                    "{}",
                    "[]",
                ],
            ))
            .expect("delete program runs");
        assert_eq!(reply, Reply::Bulk("9".into()));
    }
}
