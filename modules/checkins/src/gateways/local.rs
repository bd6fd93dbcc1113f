use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::CheckInsApi,
    error::CheckInsError,
    model::{CheckInOutcome, Identity, TimelineDay, User, UserId, UserStatus},
};
use crate::domain::service::Service;

/// Local implementation of the CheckInsApi trait that delegates to the domain service
pub struct CheckInsLocalClient {
    service: Arc<Service>,
}

impl CheckInsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CheckInsApi for CheckInsLocalClient {
    async fn ensure_user(&self, identity: Identity) -> Result<User, CheckInsError> {
        self.service.ensure_user(identity).await.map_err(Into::into)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, CheckInsError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn status(&self, id: &UserId) -> Result<UserStatus, CheckInsError> {
        self.service.status(id).await.map_err(Into::into)
    }

    async fn has_checked_in_today(&self, id: &UserId) -> Result<bool, CheckInsError> {
        self.service
            .has_checked_in_today(id)
            .await
            .map_err(Into::into)
    }

    async fn check_in(&self, id: &UserId) -> Result<CheckInOutcome, CheckInsError> {
        self.service.create_check_in(id).await.map_err(Into::into)
    }

    async fn timeline(&self, id: &UserId) -> Result<Vec<TimelineDay>, CheckInsError> {
        self.service.timeline(id).await.map_err(Into::into)
    }
}
