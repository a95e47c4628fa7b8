//! # Structured Error Handling
//!
//! Central error taxonomy for the quorum core. Every public operation returns
//! [`Result`] so callers always receive a tagged, human-readable failure.
//!
//! Evaluator defects never appear here: the panel coordinator converts them
//! into degraded responses before they can reach a caller. Collaborator
//! (store) failures pass through unchanged so the caller can treat them like
//! any other I/O fault.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by core operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuorumError {
    /// Missing or malformed required input. Reported, never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist. Distinct from a store failure.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An illegal state transition or an operation against the wrong state.
    #[error("State conflict: {0}")]
    StateConflict(String),

    /// A step start was refused because dependency steps are not complete.
    /// Carries the unmet sequence numbers so the caller can see exactly
    /// which steps still gate execution.
    #[error("Step {step_id} has unmet dependencies on steps {unmet:?}")]
    UnmetDependencies { step_id: Uuid, unmet: Vec<i32> },

    /// A persistence collaborator failed. Propagated unchanged, not retried.
    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

impl QuorumError {
    /// Build a `NotFound` error for the given entity kind and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable tag for the error kind.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::StateConflict(_) => "state_conflict",
            Self::UnmetDependencies { .. } => "unmet_dependencies",
            Self::Collaborator(_) => "collaborator",
        }
    }

    /// Check whether this error represents a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check whether this error represents an illegal transition or gate
    /// refusal (both are state conflicts from the caller's perspective).
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            Self::StateConflict(_) | Self::UnmetDependencies { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, QuorumError>;
