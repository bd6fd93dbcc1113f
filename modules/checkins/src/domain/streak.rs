use chrono::NaiveDate;

use crate::contract::model::UserStats;
use crate::domain::dates::yesterday;

/// Streak value after checking in on `today`.
///
/// - last check-in yesterday: the run continues (`current + 1`)
/// - last check-in today: unchanged; the ledger never gets here for a duplicate
/// - anything else (none, a gap, a date in the future): a new run starts at 1
pub fn next_streak(last_check_in_date: Option<NaiveDate>, current_streak: u32, today: NaiveDate) -> u32 {
    match last_check_in_date {
        Some(last) if Some(last) == yesterday(today) => current_streak.saturating_add(1),
        Some(last) if last == today => current_streak,
        _ => 1,
    }
}

impl UserStats {
    /// Counters after one more check-in on `today`.
    pub fn after_check_in(&self, today: NaiveDate) -> UserStats {
        let current_streak = next_streak(self.last_check_in_date, self.current_streak, today);
        UserStats {
            current_streak,
            max_streak: self.max_streak.max(current_streak),
            power: self.power.saturating_add(1),
            last_check_in_date: Some(today),
        }
    }
}
