//! Background task that ends the session once the token expires.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use super::store::{LogoutReason, SessionStore};

/// How often the token's expiry claim is checked.
pub const DEFAULT_EXPIRY_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Hook for sending the user back to the sign-in screen.
///
/// Called after the session has been torn down because the token expired
/// or the server rejected it.
pub trait AuthRedirect: Send + Sync {
    /// Whether the authentication entry point is already displayed.
    fn is_on_auth_page(&self) -> bool;

    /// Navigate to the authentication entry point.
    fn redirect_to_auth(&self);
}

/// Redirect hook that does nothing; for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRedirect;

impl AuthRedirect for NoRedirect {
    fn is_on_auth_page(&self) -> bool {
        true
    }

    fn redirect_to_auth(&self) {}
}

/// Tear the session down and redirect unless already on the auth page.
pub(crate) fn end_session(
    session: &SessionStore,
    redirect: &dyn AuthRedirect,
    reason: LogoutReason,
) {
    session.logout_with_reason(reason);
    if !redirect.is_on_auth_page() {
        redirect.redirect_to_auth();
    }
}

/// Run one expiry check. Returns true if the session was ended.
pub fn check_once(session: &SessionStore, redirect: &dyn AuthRedirect) -> bool {
    if session.token().is_none() || session.is_token_valid() {
        return false;
    }
    info!("Token expired, logging out");
    end_session(session, redirect, LogoutReason::Expired);
    true
}

/// Handle to the periodic expiry check. Dropping it stops the task.
pub struct ExpiryMonitor {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ExpiryMonitor {
    /// Start checking `session` every `period`.
    pub fn spawn(
        session: SessionStore,
        redirect: Arc<dyn AuthRedirect>,
        period: Duration,
    ) -> Self {
        let (tx, mut rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; checks start one period in.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = &mut rx => break,
                    _ = ticker.tick() => {
                        check_once(&session, redirect.as_ref());
                    }
                }
            }
        });
        Self {
            shutdown: Some(tx),
            task: Some(task),
        }
    }

    /// Stop the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ExpiryMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
