//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so it works with a
//! `DatabaseConnection` against SQLite or Postgres. `record_check_in` runs
//! the check-in insert and the counter update in one transaction.

use std::collections::BTreeSet;

use anyhow::Context;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    Set, SqlErr, TransactionTrait,
};
use tracing::debug;

use crate::contract::model::{CheckIn, User, UserId, UserStats};
use crate::domain::repo::CheckInsRepository;
use crate::infra::storage::entity::check_in::{
    ActiveModel as CheckInAM, Column as CheckInColumn, Entity as CheckInEntity,
};
use crate::infra::storage::entity::user::{ActiveModel as UserAM, Entity as UserEntity};
use crate::infra::storage::mapper::to_column;

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmCheckInsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmCheckInsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn stats_model(id: &UserId, stats: &UserStats) -> UserAM {
    UserAM {
        id: Set(id.as_str().to_string()),
        current_streak: Set(to_column(stats.current_streak)),
        max_streak: Set(to_column(stats.max_streak)),
        power: Set(to_column(stats.power)),
        last_check_in_date: Set(stats.last_check_in_date),
        ..Default::default()
    }
}

async fn insert_check_in_on<C: ConnectionTrait>(conn: &C, c: &CheckIn) -> anyhow::Result<bool> {
    let m = CheckInAM {
        user_id: Set(c.user_id.as_str().to_string()),
        date: Set(c.date),
        completed: Set(c.completed),
        created_at: Set(c.created_at),
        ..Default::default()
    };
    match CheckInEntity::insert(m).exec(conn).await {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e) => {
            debug!(user_id = %c.user_id, date = %c.date, "check-in key already taken");
            Ok(false)
        }
        Err(e) => Err(e).context("insert_check_in failed"),
    }
}

async fn update_stats_on<C: ConnectionTrait>(
    conn: &C,
    id: &UserId,
    stats: &UserStats,
) -> anyhow::Result<()> {
    let _ = stats_model(id, stats)
        .update(conn)
        .await
        .context("update_user_stats failed")?;
    Ok(())
}

#[async_trait::async_trait]
impl<C> CheckInsRepository for SeaOrmCheckInsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_user(&self, id: &UserId) -> anyhow::Result<Option<User>> {
        let found = UserEntity::find_by_id(id.as_str().to_string())
            .one(&self.conn)
            .await
            .context("find_user failed")?;
        found.map(User::try_from).transpose()
    }

    async fn insert_user(&self, u: User) -> anyhow::Result<bool> {
        let m = UserAM {
            id: Set(u.id.into_inner()),
            email: Set(u.email),
            created_at: Set(u.created_at),
            current_streak: Set(to_column(u.stats.current_streak)),
            max_streak: Set(to_column(u.stats.max_streak)),
            power: Set(to_column(u.stats.power)),
            last_check_in_date: Set(u.stats.last_check_in_date),
        };
        match UserEntity::insert(m).exec(&self.conn).await {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e).context("insert_user failed"),
        }
    }

    async fn update_user_stats(&self, id: &UserId, stats: &UserStats) -> anyhow::Result<()> {
        update_stats_on(&self.conn, id, stats).await
    }

    async fn find_check_in(&self, id: &UserId, date: NaiveDate) -> anyhow::Result<Option<CheckIn>> {
        let found = CheckInEntity::find()
            .filter(CheckInColumn::UserId.eq(id.as_str()))
            .filter(CheckInColumn::Date.eq(date))
            .one(&self.conn)
            .await
            .context("find_check_in failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert_check_in(&self, check_in: &CheckIn) -> anyhow::Result<bool> {
        insert_check_in_on(&self.conn, check_in).await
    }

    async fn list_check_in_dates(&self, id: &UserId) -> anyhow::Result<BTreeSet<NaiveDate>> {
        let dates: Vec<NaiveDate> = CheckInEntity::find()
            .select_only()
            .column(CheckInColumn::Date)
            .filter(CheckInColumn::UserId.eq(id.as_str()))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("list_check_in_dates failed")?;
        Ok(dates.into_iter().collect())
    }

    async fn record_check_in(&self, check_in: &CheckIn, stats: &UserStats) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin transaction failed")?;

        if !insert_check_in_on(&txn, check_in).await? {
            txn.rollback().await.context("rollback failed")?;
            return Ok(false);
        }
        update_stats_on(&txn, &check_in.user_id, stats).await?;

        txn.commit().await.context("commit failed")?;
        Ok(true)
    }
}
