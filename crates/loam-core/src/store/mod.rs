//! Store boundary: the minimum synchronous contract the engine consumes.
//!
//! A wire-level client is an integrator concern; [`MemoryStore`] is the
//! reference implementation and the test backend.

pub mod memory;
mod reply;

pub use memory::MemoryStore;
pub use reply::Reply;

use thiserror::Error as ThisError;

///
/// Command
/// One store command: verb plus string arguments.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    pub name: &'static str,
    pub args: Vec<String>,
}

impl Command {
    #[must_use]
    pub fn new<I, A>(name: &'static str, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            name,
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

///
/// StoreError
///
/// Generic failure carrying the store's message text. The engine inspects
/// exactly two substrings: `NOSCRIPT` (unknown script hash) and
/// `UniqueIndexViolation:` (conflict raised by the save program). Every
/// other message is opaque and fatal to the calling operation.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_noscript(&self) -> bool {
        self.message.contains("NOSCRIPT")
    }

    /// The offending field of a uniqueness conflict, if this failure is one.
    /// The store may wrap the script error in its own prefix, so only the
    /// text after the marker is trusted.
    #[must_use]
    pub fn unique_violation_field(&self) -> Option<&str> {
        let rest = self.message.split("UniqueIndexViolation:").nth(1)?;

        match rest.trim().split_whitespace().next() {
            Some(field) if !field.is_empty() => Some(field),
            _ => None,
        }
    }
}

///
/// Store
///
/// Synchronous store contract. `commit` executes the batch as one atomic
/// unit with respect to other callers, with replies in submission order;
/// a wire client is expected to wrap the batch in the store's transaction
/// primitive, the memory backend holds its lock for the whole batch.
///

pub trait Store {
    fn call(&self, command: Command) -> Result<Reply, StoreError>;

    fn commit(&self, batch: &[Command]) -> Result<Vec<Reply>, StoreError>;
}

///
/// Pipeline
/// Queue/commit surface over [`Store::commit`], used for batch hydration
/// and finder evaluation.
///

#[derive(Debug, Default)]
pub struct Pipeline {
    queued: Vec<Command>,
}

impl Pipeline {
    #[must_use]
    pub const fn new() -> Self {
        Self { queued: Vec::new() }
    }

    pub fn queue(&mut self, command: Command) {
        self.queued.push(command);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Execute the queued batch. Replies preserve submission order.
    pub fn commit<S: Store>(self, store: &S) -> Result<Vec<Reply>, StoreError> {
        if self.queued.is_empty() {
            return Ok(Vec::new());
        }

        store.commit(&self.queued)
    }
}
