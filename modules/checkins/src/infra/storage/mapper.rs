use anyhow::Context;

use crate::contract::model::{CheckIn, User, UserId, UserStats};
use crate::infra::storage::entity::{check_in, user};

fn counter(value: i32, column: &str) -> anyhow::Result<u32> {
    u32::try_from(value).with_context(|| format!("negative {column} in storage: {value}"))
}

/// Counter columns are signed; values past `i32::MAX` clamp.
pub fn to_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl TryFrom<user::Model> for User {
    type Error = anyhow::Error;

    fn try_from(m: user::Model) -> anyhow::Result<Self> {
        Ok(User {
            id: UserId::new(m.id),
            email: m.email,
            created_at: m.created_at,
            stats: UserStats {
                current_streak: counter(m.current_streak, "current_streak")?,
                max_streak: counter(m.max_streak, "max_streak")?,
                power: counter(m.power, "power")?,
                last_check_in_date: m.last_check_in_date,
            },
        })
    }
}

impl From<check_in::Model> for CheckIn {
    fn from(m: check_in::Model) -> Self {
        CheckIn {
            user_id: UserId::new(m.user_id),
            date: m.date,
            completed: m.completed,
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn row(power: i32) -> user::Model {
        user::Model {
            id: "u-1".to_string(),
            email: None,
            created_at: Utc::now(),
            current_streak: 1,
            max_streak: 2,
            power,
            last_check_in_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        }
    }

    #[test]
    fn user_row_maps_to_domain() {
        let user = User::try_from(row(3)).unwrap();
        assert_eq!(user.id, UserId::from("u-1"));
        assert_eq!(user.stats.current_streak, 1);
        assert_eq!(user.stats.max_streak, 2);
        assert_eq!(user.stats.power, 3);
    }

    #[test]
    fn negative_counter_is_rejected() {
        let err = User::try_from(row(-1)).unwrap_err();
        assert!(err.to_string().contains("power"));
    }

    #[test]
    fn large_counters_clamp_when_stored() {
        assert_eq!(to_column(7), 7);
        assert_eq!(to_column(u32::MAX), i32::MAX);
    }
}
