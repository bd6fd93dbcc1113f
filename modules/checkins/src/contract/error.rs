use chrono::NaiveDate;
use thiserror::Error;

/// Errors that are safe to expose to callers of the public API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckInsError {
    #[error("Already checked in on {date}")]
    AlreadyCheckedIn { date: NaiveDate },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Backend or auth provider failed; the caller may retry.
    #[error("Service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Internal error")]
    Internal,
}

impl CheckInsError {
    pub fn already_checked_in(date: NaiveDate) -> Self {
        Self::AlreadyCheckedIn { date }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }

    /// True when repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl From<crate::domain::error::DomainError> for CheckInsError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            DuplicateCheckIn { date, .. } => Self::already_checked_in(date),
            InvalidDate { value } => Self::validation(format!("Invalid date: '{}'", value)),
            // A signed-in user without a record is a broken invariant, not a caller mistake.
            UserNotFound { .. } => Self::internal(),
            Storage { message } => Self::unavailable(message),
            Auth { message } => Self::unavailable(message),
        }
    }
}
