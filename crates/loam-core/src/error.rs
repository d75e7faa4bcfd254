use crate::{model::SchemaError, store::StoreError};
use thiserror::Error as ThisError;

///
/// Error
///
/// Caller-visible failure taxonomy. Recoverability is part of the contract:
/// `UniqueIndexViolation` may be resolved and retried with different data,
/// everything else is either a caller bug or a fatal store failure.
///

#[derive(Debug, ThisError)]
pub enum Error {
    /// A key-dependent operation ran against an instance with no assigned id.
    #[error("instance has no id; save it first")]
    MissingId,

    /// A filter or unique lookup referenced a field that is not declared as
    /// indexed (or unique, for `with`). Raised at expression-build time,
    /// before any store round trip.
    #[error("index not found: {field}")]
    IndexNotFound { field: String },

    /// An accessor referenced a counter, set, list, collection, or tracked
    /// suffix the schema does not declare.
    #[error("not declared on model '{model}': {field}")]
    Undeclared { model: String, field: String },

    /// A referenced model name has no registered schema.
    #[error("no schema registered for model: {name}")]
    UnknownModel { name: String },

    /// Save aborted because the value of a unique field is already claimed
    /// by a different id. The offending field is named; no partial writes
    /// were made.
    #[error("unique index violation: {field}")]
    UniqueIndexViolation { field: String },

    /// The schema builder rejected a declaration.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Any other backing-store failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    #[must_use]
    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueIndexViolation { .. })
    }

    /// Classify a raw store failure: a uniqueness conflict surfaced by the
    /// save program becomes the typed violation, anything else stays opaque.
    pub(crate) fn from_store(err: StoreError) -> Self {
        match err.unique_violation_field() {
            Some(field) => Self::UniqueIndexViolation {
                field: field.to_string(),
            },
            None => Self::Store(err),
        }
    }
}
