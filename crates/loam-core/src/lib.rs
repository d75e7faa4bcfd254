//! Core runtime for Loam: the model registry, the store contract, the atomic
//! persistence engine, the finder algebra, and the collection accessors.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod error;
pub mod key;
pub mod model;
pub mod script;
pub mod store;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No plans, caches, or wire-level helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{
            Db,
            query::{Filter, Finder},
        },
        error::Error,
        model::{Object, Schema, register},
        store::{MemoryStore, Store},
    };
}
