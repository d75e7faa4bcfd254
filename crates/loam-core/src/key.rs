//! Key namespace for model-scoped store keys.
//!
//! Every persisted key is rooted at the model name; this module is the only
//! place key shapes are spelled out.

/// Suffix of the per-instance counters hash.
pub const COUNTERS_SUFFIX: &str = "counters";

/// Suffix of the per-instance index membership memo set.
pub const INDEX_MEMO_SUFFIX: &str = "_indices";

/// Suffix of the per-instance unique claim memo hash.
pub const UNIQUE_MEMO_SUFFIX: &str = "_uniques";

///
/// KeySpace
/// Builds every store key owned by one model's namespace.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeySpace<'a> {
    name: &'a str,
}

impl<'a> KeySpace<'a> {
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self { name }
    }

    /// `<Model>:id`: atomic counter, source of new ids.
    #[must_use]
    pub fn id_counter(&self) -> String {
        format!("{}:id", self.name)
    }

    /// `<Model>:all`: membership set of live ids.
    #[must_use]
    pub fn all(&self) -> String {
        format!("{}:all", self.name)
    }

    /// `<Model>:<id>`: the attribute hash of one instance.
    #[must_use]
    pub fn record(&self, id: &str) -> String {
        format!("{}:{id}", self.name)
    }

    /// `<Model>:indices:<field>:<value>`: ids sharing one indexed value.
    #[must_use]
    pub fn index(&self, field: &str, value: &str) -> String {
        format!("{}:indices:{field}:{value}", self.name)
    }

    /// `<Model>:uniques:<field>`: value-to-id hash for one unique field.
    #[must_use]
    pub fn unique(&self, field: &str) -> String {
        format!("{}:uniques:{field}", self.name)
    }

    /// `<Model>:<id>:<suffix>`: instance-scoped subkey (tracked keys,
    /// counters, declared sets and lists, script memos).
    #[must_use]
    pub fn sub(&self, id: &str, suffix: &str) -> String {
        format!("{}:{id}:{suffix}", self.name)
    }

    /// `<Model>:~:<n>`: short-lived query temporary. Written and deleted
    /// inside a single atomic batch, so deterministic names cannot collide
    /// across callers.
    #[must_use]
    pub fn temp(&self, n: usize) -> String {
        format!("{}:~:{n}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_shapes() {
        let keys = KeySpace::new("User");

        assert_eq!(keys.id_counter(), "User:id");
        assert_eq!(keys.all(), "User:all");
        assert_eq!(keys.record("42"), "User:42");
        assert_eq!(keys.index("name", "alice"), "User:indices:name:alice");
        assert_eq!(keys.unique("email"), "User:uniques:email");
        assert_eq!(keys.sub("42", "counters"), "User:42:counters");
        assert_eq!(keys.temp(0), "User:~:0");
    }
}
