//! Shared fixtures: schemas in the shape the scenario suites expect.
#![allow(dead_code)]

use loam_core::{
    db::Db,
    model::{self, Schema},
    store::MemoryStore,
};
use std::sync::LazyLock;

pub static FOO: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Foo")
        .attribute("a")
        .attribute("b")
        .attribute("c")
        .attribute("d")
        .index("a")
        .index("b")
        .unique("d")
        .build()
        .expect("valid schema")
});

pub static BAZ: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Baz")
        .attribute("a")
        .attribute("b")
        .index("a")
        .index("b")
        .build()
        .expect("valid schema")
});

pub static USER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("User")
        .attribute("name")
        .index("name")
        .counter("votes")
        .set("followers", "User")
        .list("queue", "Post")
        .collection("posts", "Post", "user_id")
        .track("views")
        .build()
        .expect("valid schema")
});

pub static POST: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Post")
        .attribute("title")
        .reference("user_id", "User")
        .build()
        .expect("valid schema")
});

pub fn db() -> Db<MemoryStore> {
    model::register(&FOO);
    model::register(&BAZ);
    model::register(&USER);
    model::register(&POST);

    Db::new(MemoryStore::new())
}
