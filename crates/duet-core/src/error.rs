//! Error types for the count/assignment/kernel core.

use thiserror::Error;

/// Errors the sampling core can raise.
///
/// Per the error taxonomy, these are the only two kinds the core itself can
/// surface: malformed input and character-length skips are handled entirely
/// in `duet-io` before any of this crate's types exist.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// An invariant (nonnegative counts, conserved column sums, audit
    /// reconstruction) was violated. Always fatal.
    #[error("invariant violation: {detail}")]
    InvariantViolation { detail: String },

    /// A worker thread panicked or returned an error mid-sweep.
    #[error("worker failed for shard {shard}: {detail}")]
    WorkerFailure { shard: usize, detail: String },
}

impl CoreError {
    pub fn invariant(detail: impl Into<String>) -> Self {
        CoreError::InvariantViolation {
            detail: detail.into(),
        }
    }

    pub fn worker(shard: usize, detail: impl Into<String>) -> Self {
        CoreError::WorkerFailure {
            shard,
            detail: detail.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
