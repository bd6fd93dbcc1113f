use chrono::{DateTime, NaiveDate, Utc};

use crate::contract::model::UserId;

/// Transport-agnostic domain event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInDomainEvent {
    UserCreated {
        user_id: UserId,
        at: DateTime<Utc>,
    },
    CheckedIn {
        user_id: UserId,
        date: NaiveDate,
        current_streak: u32,
        power: u32,
        at: DateTime<Utc>,
    },
}
