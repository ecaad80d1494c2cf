use thiserror::Error;

use crate::models::MatchStatus;

/// Failure taxonomy of the disciplinary core.
///
/// Every variant is terminal: nothing in the core retries internally,
/// because retrying a non-idempotent create would duplicate disciplinary
/// records. Callers render messages from the variant alone.
#[derive(Error, Debug)]
pub enum DisciplineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("eligibility denied: {0}")]
    EligibilityDenied(String),

    #[error("invalid transition: {from:?} -> {to:?}")]
    InvalidTransition { from: MatchStatus, to: MatchStatus },
}

impl DisciplineError {
    /// Conflict-class failures mean the operation already took effect;
    /// re-driving a crashed workflow can treat them as success.
    pub fn is_retry_safe(&self) -> bool {
        matches!(self, DisciplineError::Conflict(_))
    }
}

pub type Result<T> = std::result::Result<T, DisciplineError>;
