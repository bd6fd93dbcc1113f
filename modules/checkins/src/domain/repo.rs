use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::contract::model::{CheckIn, User, UserId, UserStats};

/// Port for the domain layer: persistence operations the ledger needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait CheckInsRepository: Send + Sync {
    /// Load a user by id.
    async fn find_user(&self, id: &UserId) -> anyhow::Result<Option<User>>;

    /// Insert a fully-formed user. Returns false if a user with that id already exists.
    async fn insert_user(&self, user: User) -> anyhow::Result<bool>;

    /// Overwrite the aggregate counters of an existing user.
    async fn update_user_stats(&self, id: &UserId, stats: &UserStats) -> anyhow::Result<()>;

    /// Load the check-in for `(id, date)`.
    async fn find_check_in(&self, id: &UserId, date: NaiveDate) -> anyhow::Result<Option<CheckIn>>;

    /// Insert a check-in. Returns false if `(user_id, date)` is already taken;
    /// this is the point where same-day uniqueness is enforced.
    async fn insert_check_in(&self, check_in: &CheckIn) -> anyhow::Result<bool>;

    /// All check-in dates for a user.
    async fn list_check_in_dates(&self, id: &UserId) -> anyhow::Result<BTreeSet<NaiveDate>>;

    /// Insert the check-in, then store `stats` only if the insert succeeded.
    ///
    /// The default runs two separate writes: if the second one fails the
    /// check-in exists while the counters still hold their old values.
    /// Backends with transactions override this to make both writes atomic.
    async fn record_check_in(&self, check_in: &CheckIn, stats: &UserStats) -> anyhow::Result<bool> {
        if !self.insert_check_in(check_in).await? {
            return Ok(false);
        }
        self.update_user_stats(&check_in.user_id, stats).await?;
        Ok(true)
    }
}
