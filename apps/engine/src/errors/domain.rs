//! Engine-level error type.
//!
//! Transport-agnostic: the protocol layer maps these onto [`ErrorCode`]s
//! through [`DomainError::code`].
//!
//! [`ErrorCode`]: super::ErrorCode

use thiserror::Error;

use super::ErrorCode;

/// Why a player action was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Operation not accepted in the current game state.
    PhaseMismatch,
    CardNotInHand,
    /// A response arrived for a decision that is not pending.
    NoPendingDecision,
    /// The chosen option is not one of the offered ones.
    InvalidChoice,
    MonthMismatch,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Rejected player action; engine state is untouched.
    #[error("validation error ({0:?}): {1}")]
    Validation(ValidationKind, String),
    /// The engine reached a state that should be impossible.
    #[error("invariant violated: {0}")]
    Invariant(String),
    /// Rules document could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant(detail.into())
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                ValidationKind::CardNotInHand => ErrorCode::CardNotInHand,
                ValidationKind::NoPendingDecision => ErrorCode::NoPendingDecision,
                ValidationKind::InvalidChoice => ErrorCode::InvalidChoice,
                ValidationKind::MonthMismatch => ErrorCode::MonthMismatch,
                ValidationKind::Other(_) => ErrorCode::ValidationError,
            },
            DomainError::Invariant(_) => ErrorCode::Internal,
            DomainError::Config(_) => ErrorCode::ConfigError,
        }
    }
}
