//! Sign-in flow with best-effort location upload

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use despacho_core::{
    Credentials, IdentityService, LocationStore, PermissionGate, Result, UserId,
};

use crate::acquisition::PositionAcquirer;

/// An authenticated session
#[derive(Debug)]
pub struct Session {
    /// Stable user id assigned by the identity service
    pub user: UserId,
    /// Detached upload task, when one was dispatched
    ///
    /// Kept so callers can await completion (tests, shutdown). The
    /// sign-in outcome never depends on this task.
    pub upload_task: Option<JoinHandle<()>>,
}

/// Authenticates the user and dispatches the location upload side task
pub struct SignInFlow {
    identity: Arc<dyn IdentityService>,
    store: Arc<dyn LocationStore>,
    permissions: Arc<dyn PermissionGate>,
    acquirer: Arc<PositionAcquirer>,
}

impl SignInFlow {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        store: Arc<dyn LocationStore>,
        permissions: Arc<dyn PermissionGate>,
        acquirer: Arc<PositionAcquirer>,
    ) -> Self {
        Self {
            identity,
            store,
            permissions,
            acquirer,
        }
    }

    /// Authenticate and, on success, upload the device position
    ///
    /// Blank credentials are rejected before the identity service is
    /// consulted. On authentication failure acquisition and upload are
    /// skipped entirely. The upload runs as a fire-and-forget task:
    /// failures there are logged and cannot alter the sign-in result.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;

        let user = self.identity.sign_in(credentials).await?;
        info!(user = user.short(), "sign-in succeeded");

        let upload_task = if self.permissions.location_granted() {
            Some(self.spawn_upload(user.clone()))
        } else {
            info!(user = user.short(), "location permission not granted, skipping upload");
            None
        };

        Ok(Session { user, upload_task })
    }

    /// Dispatch the best-effort location upload
    fn spawn_upload(&self, user: UserId) -> JoinHandle<()> {
        let acquirer = Arc::clone(&self.acquirer);
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            let fix = match acquirer.acquire().await {
                Ok(fix) => fix,
                Err(err) => {
                    warn!(user = user.short(), error = %err, "no fix for location upload");
                    return;
                }
            };

            match store.store_location(&user, &fix.coordinate).await {
                Ok(()) => info!(
                    user = user.short(),
                    coordinate = %fix.coordinate,
                    source = %fix.source,
                    "location uploaded"
                ),
                // Best-effort telemetry, logged and never retried
                Err(err) => warn!(user = user.short(), error = %err, "location upload failed"),
            }
        })
    }
}
