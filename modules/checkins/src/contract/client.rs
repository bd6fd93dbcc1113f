use async_trait::async_trait;

use crate::contract::{
    error::CheckInsError,
    model::{CheckInOutcome, Identity, TimelineDay, User, UserId, UserStatus},
};

/// Public API trait for the check-ins module
#[async_trait]
pub trait CheckInsApi: Send + Sync {
    /// Load the user for an identity, creating the record on first sign-in
    async fn ensure_user(&self, identity: Identity) -> Result<User, CheckInsError>;

    /// Get a user by ID
    async fn get_user(&self, id: &UserId) -> Result<User, CheckInsError>;

    /// Current counters, today's state and power tier
    async fn status(&self, id: &UserId) -> Result<UserStatus, CheckInsError>;

    /// Whether a check-in exists for today
    async fn has_checked_in_today(&self, id: &UserId) -> Result<bool, CheckInsError>;

    /// Record today's check-in and advance the user's counters
    async fn check_in(&self, id: &UserId) -> Result<CheckInOutcome, CheckInsError>;

    /// Day-by-day history from account creation to today, most recent first
    async fn timeline(&self, id: &UserId) -> Result<Vec<TimelineDay>, CheckInsError>;
}
