//! Signed-in session state with an explicit lifecycle.
//!
//! `SessionContext::start` subscribes to the auth provider's identity channel
//! and keeps the matching user record loaded; `shutdown` stops the listener.
//! Identity changes arrive as events on that channel, so nothing here relies
//! on process-wide mutable state.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::contract::{
    client::CheckInsApi,
    error::CheckInsError,
    model::{Identity, User},
};
use crate::domain::ports::AuthProvider;

pub struct SessionContext {
    api: Arc<dyn CheckInsApi>,
    auth: Arc<dyn AuthProvider>,
    user: Arc<ArcSwapOption<User>>,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SessionContext {
    /// Subscribe to identity changes and spawn the listener task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(auth: Arc<dyn AuthProvider>, api: Arc<dyn CheckInsApi>) -> Self {
        let user = Arc::new(ArcSwapOption::<User>::empty());
        let cancel = CancellationToken::new();
        let rx = auth.subscribe();

        let handle = tokio::spawn(listen(rx, api.clone(), user.clone(), cancel.clone()));
        debug!("Session listener started");

        Self {
            api,
            auth,
            user,
            cancel,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Run the interactive sign-in and load (or create) the user record.
    /// Returns `Ok(None)` when the user cancelled.
    pub async fn sign_in(&self) -> Result<Option<User>, CheckInsError> {
        let Some(identity) = self.auth.sign_in_interactive().await? else {
            return Ok(None);
        };
        let user = self.api.ensure_user(identity).await?;
        self.user.store(Some(Arc::new(user.clone())));
        Ok(Some(user))
    }

    pub async fn sign_out(&self) -> Result<(), CheckInsError> {
        self.auth.sign_out().await?;
        self.user.store(None);
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.load_full().map(|u| u.as_ref().clone())
    }

    /// Re-read the signed-in user, e.g. after a check-in changed its counters.
    pub async fn refresh_user(&self) -> Result<Option<User>, CheckInsError> {
        let Some(current) = self.user.load_full() else {
            return Ok(None);
        };
        let user = self.api.get_user(&current.id).await?;
        self.user.store(Some(Arc::new(user.clone())));
        Ok(Some(user))
    }

    /// Stop the listener and wait for it to exit.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Session listener ended abnormally: {}", e);
            }
        }
        debug!("Session listener stopped");
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn listen(
    mut rx: watch::Receiver<Option<Identity>>,
    api: Arc<dyn CheckInsApi>,
    user: Arc<ArcSwapOption<User>>,
    cancel: CancellationToken,
) {
    let initial = rx.borrow_and_update().clone();
    apply_identity(initial, api.as_ref(), &user).await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    debug!("Auth provider dropped, session listener exiting");
                    break;
                }
                let identity = rx.borrow_and_update().clone();
                apply_identity(identity, api.as_ref(), &user).await;
            }
        }
    }
}

async fn apply_identity(
    identity: Option<Identity>,
    api: &dyn CheckInsApi,
    user: &ArcSwapOption<User>,
) {
    match identity {
        Some(identity) => {
            let user_id = identity.user_id.clone();
            match api.ensure_user(identity).await {
                Ok(u) => {
                    info!(%user_id, "Session user loaded");
                    user.store(Some(Arc::new(u)));
                }
                Err(e) => warn!(%user_id, "Failed to load session user: {}", e),
            }
        }
        None => {
            user.store(None);
        }
    }
}
