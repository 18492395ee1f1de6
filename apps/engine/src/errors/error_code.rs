//! Stable error codes reported on the wire.
//!
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the `code` field of an
//! error response. Add new codes here; never pass ad-hoc strings.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Player actions
    PhaseMismatch,
    CardNotInHand,
    NoPendingDecision,
    InvalidChoice,
    MonthMismatch,
    /// General validation error
    ValidationError,

    // Transport
    /// Request line is not a JSON object with an `action` string
    BadRequest,
    UnknownAction,
    /// `data` did not match the action's payload shape
    MalformedPayload,

    // System
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::NoPendingDecision => "NO_PENDING_DECISION",
            Self::InvalidChoice => "INVALID_CHOICE",
            Self::MonthMismatch => "MONTH_MISMATCH",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::BadRequest => "BAD_REQUEST",
            Self::UnknownAction => "UNKNOWN_ACTION",
            Self::MalformedPayload => "MALFORMED_PAYLOAD",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
