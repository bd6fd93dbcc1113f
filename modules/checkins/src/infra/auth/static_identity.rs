use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::contract::model::Identity;
use crate::domain::error::DomainError;
use crate::domain::ports::AuthProvider;

/// Auth provider that signs in a preconfigured identity.
///
/// Used by the command-line front end, where the OAuth exchange of the
/// hosted providers is out of scope. With no identity configured, the
/// interactive sign-in reports a cancellation.
///
/// An optional marker file makes sign-out outlive the process: `sign_out`
/// creates it and the next interactive sign-in removes it.
pub struct StaticIdentityProvider {
    identity: Option<Identity>,
    signed_out_marker: Option<PathBuf>,
    state: watch::Sender<Option<Identity>>,
}

impl StaticIdentityProvider {
    pub fn new(identity: Option<Identity>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            identity,
            signed_out_marker: None,
            state,
        }
    }

    /// Persist sign-out state in `marker`.
    pub fn with_signed_out_marker(mut self, marker: impl Into<PathBuf>) -> Self {
        self.signed_out_marker = Some(marker.into());
        self
    }

    /// Identity currently signed in, if any.
    pub fn current(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }

    /// True when an earlier run signed out and nobody signed in since.
    pub fn is_signed_out(&self) -> bool {
        self.signed_out_marker.as_deref().is_some_and(Path::exists)
    }
}

#[async_trait]
impl AuthProvider for StaticIdentityProvider {
    async fn sign_in_interactive(&self) -> Result<Option<Identity>, DomainError> {
        let Some(identity) = self.identity.clone() else {
            info!("No identity configured, sign-in cancelled");
            return Ok(None);
        };
        if let Some(marker) = &self.signed_out_marker {
            match tokio::fs::remove_file(marker).await {
                Ok(()) => debug!(marker = %marker.display(), "Cleared sign-out marker"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(DomainError::auth(format!(
                        "failed to clear {}: {e}",
                        marker.display()
                    )))
                }
            }
        }
        info!(user_id = %identity.user_id, "Signed in");
        self.state.send_replace(Some(identity.clone()));
        Ok(Some(identity))
    }

    async fn sign_out(&self) -> Result<(), DomainError> {
        if let Some(marker) = &self.signed_out_marker {
            if let Some(dir) = marker.parent() {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    DomainError::auth(format!("failed to create {}: {e}", dir.display()))
                })?;
            }
            tokio::fs::write(marker, b"").await.map_err(|e| {
                DomainError::auth(format!("failed to write {}: {e}", marker.display()))
            })?;
        }
        if let Some(previous) = self.state.send_replace(None) {
            info!(user_id = %previous.user_id, "Signed out");
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }
}
