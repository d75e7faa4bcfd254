///
/// Reply
/// Store reply values, mirroring the wire protocol's reply kinds.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reply {
    Nil,
    Int(i64),
    Bulk(String),
    Status(String),
    Array(Vec<Reply>),
}

impl Reply {
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bulk(&self) -> Option<&str> {
        match self {
            Self::Bulk(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_bulk(self) -> Option<String> {
        match self {
            Self::Bulk(s) => Some(s),
            _ => None,
        }
    }

    /// Flatten an array reply into its bulk elements. Non-bulk elements are
    /// dropped; a non-array reply yields nothing.
    #[must_use]
    pub fn into_strings(self) -> Vec<String> {
        match self {
            Self::Array(items) => items.into_iter().filter_map(Self::into_bulk).collect(),
            _ => Vec::new(),
        }
    }

    /// Interpret a flat field/value array reply (the hash read shape) as
    /// pairs. An odd trailing element is dropped.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        let mut flat = self.into_strings().into_iter();
        let mut out = Vec::new();

        while let (Some(field), Some(value)) = (flat.next(), flat.next()) {
            out.push((field, value));
        }

        out
    }
}
