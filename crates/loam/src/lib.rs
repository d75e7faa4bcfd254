//! Loam: an object mapping layer for script-capable key-value stores.
//!
//! Models are declared once as immutable [`core::model::Schema`] values,
//! registered, and persisted through a [`Db`] bound to any
//! [`core::store::Store`] implementation. Saves and deletes run as single
//! atomic server-side program invocations; queries are lazily-built set
//! expressions evaluated only when materialized.
//!
//! ```
//! use loam::prelude::*;
//! use std::sync::LazyLock;
//!
//! static USER: LazyLock<Schema> = LazyLock::new(|| {
//!     Schema::builder("User")
//!         .attribute("name")
//!         .attribute("email")
//!         .index("name")
//!         .unique("email")
//!         .build()
//!         .expect("valid schema")
//! });
//!
//! fn main() -> Result<(), Error> {
//!     register(&USER);
//!
//!     let db = Db::new(MemoryStore::new());
//!     let alice = db.create(&USER, [("name", "alice"), ("email", "alice@example.com")])?;
//!
//!     assert!(alice.id().is_some());
//!     assert!(db.find(&USER, ("name", "alice"))?.includes(&alice)?);
//!
//!     Ok(())
//! }
//! ```

pub use loam_core as core;

pub use loam_core::{
    Error,
    db::{self, Counter, Db, ModelList, ModelSet},
    key,
    model::{self, Object, Schema, register},
    store,
};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use loam_core::{
        db::{
            Counter, Db, ModelList, ModelSet,
            query::{Filter, Finder},
        },
        error::Error,
        model::{Object, Schema, register},
        store::{MemoryStore, Pipeline, Store},
    };
}
