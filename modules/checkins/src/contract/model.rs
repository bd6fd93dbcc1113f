use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// Opaque, stable user identifier issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identity reported by the auth provider after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: Option<String>,
}

/// Aggregate counters kept on the user record.
///
/// Mutated only by the check-in ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    pub current_streak: u32,
    pub max_streak: u32,
    pub power: u32,
    pub last_check_in_date: Option<NaiveDate>,
}

/// Pure user model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub stats: UserStats,
}

/// One immutable record per (user, calendar day).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIn {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful check-in: the new record and the updated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub check_in: CheckIn,
    pub user: User,
}

/// One day of the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineDay {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Named band of power values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PowerTier {
    Beginner,
    Novice,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

/// Snapshot shown on the home view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStatus {
    pub user: User,
    pub today: NaiveDate,
    pub checked_in_today: bool,
    pub tier: PowerTier,
}
