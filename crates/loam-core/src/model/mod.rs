//! Runtime model definitions.
//!
//! Schemas are the *runtime representation* of a model declaration: built
//! once at startup, immutable afterwards, and consulted by the persistence
//! engine, the finder, and every collection accessor. Objects are the
//! in-memory instances that flow through those paths.

mod object;
mod registry;
mod schema;

pub use object::Object;
pub use registry::{lookup, register};
pub use schema::{Schema, SchemaBuilder, SchemaError};
