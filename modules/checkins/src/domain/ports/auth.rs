use async_trait::async_trait;
use tokio::sync::watch;

use crate::contract::model::Identity;
use crate::domain::error::DomainError;

/// Transport-agnostic auth port.
///
/// The provider owns the "currently authenticated identity"; consumers
/// observe changes through the watch channel instead of global state.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Run the interactive sign-in flow. `Ok(None)` means the user cancelled.
    async fn sign_in_interactive(&self) -> Result<Option<Identity>, DomainError>;

    async fn sign_out(&self) -> Result<(), DomainError>;

    /// Identity changes; `None` while signed out.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}
