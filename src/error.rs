use thiserror::Error;

use crate::saga::SagaId;

/// Broad classification of a [`SagaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Another writer got there first. The caller may reload and retry.
    Concurrency,
    /// Caller misuse or a broken internal invariant. Retrying will not help.
    State,
}

/// Error type for saga store operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SagaError {
    #[error("saga {saga_type}:{id} already exists")]
    DuplicateId { saga_type: &'static str, id: SagaId },

    #[error("saga {saga_type}:{id} not found")]
    NotFound { saga_type: &'static str, id: SagaId },

    #[error(
        "concurrent write detected for saga {saga_type}:{id} (expected revision {expected}, actual {actual})"
    )]
    RevisionMismatch {
        saga_type: &'static str,
        id: SagaId,
        expected: u64,
        actual: u64,
    },

    #[error(
        "correlation property {property} = '{value}' of saga {saga_type} is already used by {existing}"
    )]
    CorrelationCollision {
        saga_type: &'static str,
        property: String,
        value: String,
        existing: SagaId,
    },

    #[error("saga {saga_type} has no id assigned")]
    MissingId { saga_type: &'static str },

    #[error("saga {saga_type}:{id} must be inserted with revision 0, got {revision}")]
    NonZeroRevision {
        saga_type: &'static str,
        id: SagaId,
        revision: u64,
    },

    #[error("no previous version recorded for saga {saga_type}:{id}")]
    NoPreviousVersion { saga_type: &'static str, id: SagaId },

    #[error("revision of saga {saga_type}:{id} cannot be advanced past {revision}")]
    RevisionOverflow {
        saga_type: &'static str,
        id: SagaId,
        revision: u64,
    },

    #[error("saga type {saga_type} has no property named {property}")]
    UnknownProperty {
        saga_type: &'static str,
        property: String,
    },

    #[error("saga store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl SagaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SagaError::DuplicateId { .. }
            | SagaError::NotFound { .. }
            | SagaError::RevisionMismatch { .. }
            | SagaError::CorrelationCollision { .. } => ErrorKind::Concurrency,
            SagaError::MissingId { .. }
            | SagaError::NonZeroRevision { .. }
            | SagaError::NoPreviousVersion { .. }
            | SagaError::RevisionOverflow { .. }
            | SagaError::UnknownProperty { .. }
            | SagaError::LockPoisoned(_) => ErrorKind::State,
        }
    }

    pub fn is_concurrency_violation(&self) -> bool {
        self.kind() == ErrorKind::Concurrency
    }
}
