use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::contract::model::{
    CheckIn, CheckInOutcome, Identity, PowerTier, TimelineDay, User, UserId, UserStats, UserStatus,
};
use crate::domain::error::DomainError;
use crate::domain::events::CheckInDomainEvent;
use crate::domain::ports::{Clock, EventPublisher};
use crate::domain::repo::CheckInsRepository;
use crate::domain::timeline::build_timeline;

/// Domain service with the check-in ledger rules.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn CheckInsRepository>,
    events: Arc<dyn EventPublisher<CheckInDomainEvent>>,
    clock: Arc<dyn Clock>,
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        repo: Arc<dyn CheckInsRepository>,
        events: Arc<dyn EventPublisher<CheckInDomainEvent>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            events,
            clock,
        }
    }

    /// Load the user for `identity`, creating a zeroed record on first sign-in.
    #[instrument(name = "checkins.service.ensure_user", skip(self), fields(user_id = %identity.user_id))]
    pub async fn ensure_user(&self, identity: Identity) -> Result<User, DomainError> {
        if let Some(user) = self.find_user(&identity.user_id).await? {
            debug!("User already exists");
            return Ok(user);
        }

        let user = User {
            id: identity.user_id.clone(),
            email: identity.email,
            created_at: self.clock.now(),
            stats: UserStats::default(),
        };

        let created = self
            .repo
            .insert_user(user.clone())
            .await
            .map_err(|e| DomainError::storage(format!("{e:#}")))?;

        if !created {
            // Another session created the record between our read and write.
            debug!("User was created concurrently, reloading");
            return self
                .find_user(&identity.user_id)
                .await?
                .ok_or_else(|| DomainError::user_not_found(identity.user_id));
        }

        self.events.publish(&CheckInDomainEvent::UserCreated {
            user_id: user.id.clone(),
            at: user.created_at,
        });

        info!("Created user record");
        Ok(user)
    }

    #[instrument(name = "checkins.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &UserId) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.find_user(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id.clone()))
    }

    #[instrument(name = "checkins.service.has_checked_in_today", skip(self), fields(user_id = %id))]
    pub async fn has_checked_in_today(&self, id: &UserId) -> Result<bool, DomainError> {
        self.has_check_in_on(id, self.clock.today()).await
    }

    /// Record today's check-in and advance the user's counters.
    ///
    /// The pre-check only short-circuits the common case; uniqueness is
    /// decided by the insert inside `record_check_in`, and the counters are
    /// written only after that insert succeeded.
    #[instrument(name = "checkins.service.create_check_in", skip(self), fields(user_id = %id))]
    pub async fn create_check_in(&self, id: &UserId) -> Result<CheckInOutcome, DomainError> {
        let today = self.clock.today();
        info!(date = %today, "Creating check-in");

        if self.has_check_in_on(id, today).await? {
            debug!("Check-in already exists for today");
            return Err(DomainError::duplicate_check_in(id.clone(), today));
        }

        let mut user = self
            .find_user(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id.clone()))?;

        let stats = user.stats.after_check_in(today);
        let check_in = CheckIn {
            user_id: id.clone(),
            date: today,
            completed: true,
            created_at: self.clock.now(),
        };

        let inserted = self
            .repo
            .record_check_in(&check_in, &stats)
            .await
            .map_err(|e| DomainError::storage(format!("{e:#}")))?;

        if !inserted {
            warn!(date = %today, "Lost check-in race against a concurrent session");
            return Err(DomainError::duplicate_check_in(id.clone(), today));
        }

        user.stats = stats;

        self.events.publish(&CheckInDomainEvent::CheckedIn {
            user_id: id.clone(),
            date: today,
            current_streak: stats.current_streak,
            power: stats.power,
            at: check_in.created_at,
        });

        info!(
            streak = stats.current_streak,
            max_streak = stats.max_streak,
            power = stats.power,
            "Check-in recorded"
        );
        Ok(CheckInOutcome { check_in, user })
    }

    #[instrument(name = "checkins.service.status", skip(self), fields(user_id = %id))]
    pub async fn status(&self, id: &UserId) -> Result<UserStatus, DomainError> {
        let today = self.clock.today();
        let user = self.get_user(id).await?;
        let checked_in_today = self.has_check_in_on(id, today).await?;
        let tier = PowerTier::for_power(user.stats.power);
        Ok(UserStatus {
            user,
            today,
            checked_in_today,
            tier,
        })
    }

    #[instrument(name = "checkins.service.timeline", skip(self), fields(user_id = %id))]
    pub async fn timeline(&self, id: &UserId) -> Result<Vec<TimelineDay>, DomainError> {
        let user = self.get_user(id).await?;
        let dates = self
            .repo
            .list_check_in_dates(id)
            .await
            .map_err(|e| DomainError::storage(format!("{e:#}")))?;

        let created_on = self.clock.local_date(user.created_at);
        let days = build_timeline(created_on, dates, self.clock.today());
        debug!("Built timeline with {} days", days.len());
        Ok(days)
    }

    // --- repository helpers ---

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repo
            .find_user(id)
            .await
            .map_err(|e| DomainError::storage(format!("{e:#}")))
    }

    async fn has_check_in_on(
        &self,
        id: &UserId,
        date: chrono::NaiveDate,
    ) -> Result<bool, DomainError> {
        let found = self
            .repo
            .find_check_in(id, date)
            .await
            .map_err(|e| DomainError::storage(format!("{e:#}")))?;
        Ok(found.is_some())
    }
}
