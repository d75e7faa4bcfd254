//! Process-wide model registry.
//!
//! References and inverse collections name their target model; the registry
//! resolves those names back to schemas at runtime. Registration happens
//! once at startup, next to schema construction.

use crate::model::Schema;
use log::warn;
use std::{
    collections::BTreeMap,
    sync::{LazyLock, PoisonError, RwLock},
};

static REGISTRY: LazyLock<RwLock<BTreeMap<&'static str, &'static Schema>>> =
    LazyLock::new(|| RwLock::new(BTreeMap::new()));

/// Register a schema under its model name. Re-registering the same schema
/// is a no-op; a different schema under an existing name replaces it with
/// a warning (two models must not share a name).
pub fn register(schema: &'static Schema) {
    let mut map = REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(existing) = map.insert(schema.name(), schema)
        && !std::ptr::eq(existing, schema)
    {
        warn!("model '{}' registered twice", schema.name());
    }
}

/// Resolve a model name, or None when nothing is registered under it.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Schema> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .copied()
}
