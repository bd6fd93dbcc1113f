use tracing::info;

use crate::domain::events::CheckInDomainEvent;
use crate::domain::ports::EventPublisher;

/// Publishes domain events as structured log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

impl EventPublisher<CheckInDomainEvent> for TracingEventPublisher {
    fn publish(&self, event: &CheckInDomainEvent) {
        match event {
            CheckInDomainEvent::UserCreated { user_id, at } => {
                info!(target: "checkins::events", %user_id, %at, "user_created");
            }
            CheckInDomainEvent::CheckedIn {
                user_id,
                date,
                current_streak,
                power,
                at,
            } => {
                info!(
                    target: "checkins::events",
                    %user_id,
                    %date,
                    current_streak,
                    power,
                    %at,
                    "checked_in"
                );
            }
        }
    }
}
