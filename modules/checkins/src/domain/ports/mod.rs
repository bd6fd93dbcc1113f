pub mod auth;
pub mod clock;

pub use auth::AuthProvider;
pub use clock::{Clock, FixedClock, SystemClock};

/// Output port: publish domain events (no knowledge of transport).
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}
