use chrono::NaiveDate;
use thiserror::Error;

use crate::contract::model::UserId;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid date literal '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("User {user_id} already checked in on {date}")]
    DuplicateCheckIn { user_id: UserId, date: NaiveDate },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: UserId },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Auth provider error: {message}")]
    Auth { message: String },
}

impl DomainError {
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    pub fn duplicate_check_in(user_id: UserId, date: NaiveDate) -> Self {
        Self::DuplicateCheckIn { user_id, date }
    }

    pub fn user_not_found(user_id: UserId) -> Self {
        Self::UserNotFound { user_id }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }
}
