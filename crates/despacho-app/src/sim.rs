//! Simulated collaborators for development and testing
//!
//! The real application talks to platform services: the device's
//! location providers, the remote identity service and the remote
//! location store. This module provides in-process stand-ins with
//! controllable behavior, used by the demo binary and the integration
//! tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use despacho_core::{
    Coordinate, Credentials, DespachoError, IdentityService, LocationProvider, LocationStore,
    PermissionGate, Result, UserId,
};

/// Releases a simulated registration when the `next_fix` future drops
struct RegistrationGuard(Arc<AtomicUsize>);

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A scriptable location provider
///
/// Configure a cached fix, a live fix delivered after a delay, or
/// failures on either path. Registration counters make exactly-once
/// delivery and sibling cancellation observable in tests.
pub struct SimulatedProvider {
    name: String,
    cached: RwLock<Option<Coordinate>>,
    live: RwLock<Option<(Coordinate, Duration)>>,
    cache_failure: RwLock<Option<String>>,
    live_failure: RwLock<Option<String>>,
    cache_queries: AtomicUsize,
    live_requests: AtomicUsize,
    active_registrations: Arc<AtomicUsize>,
}

impl SimulatedProvider {
    /// Create a provider with neither a cached nor a live fix
    ///
    /// Its live subscription registers and then never resolves, like a
    /// receiver that cannot see the sky.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cached: RwLock::new(None),
            live: RwLock::new(None),
            cache_failure: RwLock::new(None),
            live_failure: RwLock::new(None),
            cache_queries: AtomicUsize::new(0),
            live_requests: AtomicUsize::new(0),
            active_registrations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Give the provider a last-known fix
    pub fn with_cached_fix(self, coordinate: Coordinate) -> Self {
        *self.cached.write() = Some(coordinate);
        self
    }

    /// Deliver a live fix after the given delay
    pub fn with_live_fix(self, coordinate: Coordinate, after: Duration) -> Self {
        *self.live.write() = Some((coordinate, after));
        self
    }

    /// Fail last-known queries with the given reason
    pub fn with_failing_cache(self, reason: impl Into<String>) -> Self {
        *self.cache_failure.write() = Some(reason.into());
        self
    }

    /// Fail live subscriptions up front with the given reason
    pub fn with_failing_live(self, reason: impl Into<String>) -> Self {
        *self.live_failure.write() = Some(reason.into());
        self
    }

    /// How many times the cached path was queried
    pub fn cache_queries(&self) -> usize {
        self.cache_queries.load(Ordering::SeqCst)
    }

    /// How many live subscriptions were ever requested
    pub fn live_requests(&self) -> usize {
        self.live_requests.load(Ordering::SeqCst)
    }

    /// How many live registrations are currently held
    ///
    /// Returns to zero once a pending `next_fix` future is dropped.
    pub fn active_registrations(&self) -> usize {
        self.active_registrations.load(Ordering::SeqCst)
    }

    fn provider_error(&self, reason: &str) -> DespachoError {
        DespachoError::Provider {
            provider: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl LocationProvider for SimulatedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn last_known_fix(&self) -> Result<Option<Coordinate>> {
        self.cache_queries.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.cache_failure.read().as_deref() {
            return Err(self.provider_error(reason));
        }
        Ok(*self.cached.read())
    }

    async fn next_fix(&self) -> Result<Coordinate> {
        self.live_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.live_failure.read().as_deref() {
            return Err(self.provider_error(reason));
        }

        self.active_registrations.fetch_add(1, Ordering::SeqCst);
        let _registration = RegistrationGuard(Arc::clone(&self.active_registrations));

        let live = *self.live.read();
        match live {
            Some((coordinate, after)) => {
                tokio::time::sleep(after).await;
                Ok(coordinate)
            }
            // No fix will ever arrive; resolves only by cancellation
            None => std::future::pending().await,
        }
    }
}

/// In-process identity service backed by a fixed account table
pub struct SimulatedIdentityService {
    accounts: RwLock<HashMap<String, (String, UserId)>>,
    sign_in_calls: AtomicUsize,
}

impl SimulatedIdentityService {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    /// Register an account and return its assigned user id
    pub fn add_account(&self, email: impl Into<String>, password: impl Into<String>) -> UserId {
        let user = UserId(Uuid::new_v4().simple().to_string());
        self.accounts
            .write()
            .insert(email.into(), (password.into(), user.clone()));
        user
    }

    /// How many sign-in attempts reached the service
    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedIdentityService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityService for SimulatedIdentityService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        match self.accounts.read().get(&credentials.email) {
            Some((password, user)) if *password == credentials.password => Ok(user.clone()),
            Some(_) => Err(DespachoError::AuthFailed(
                "incorrect password".to_string(),
            )),
            None => Err(DespachoError::AuthFailed(
                "no account for this email".to_string(),
            )),
        }
    }
}

/// In-memory location store keyed like the remote database
pub struct InMemoryLocationStore {
    locations: RwLock<HashMap<String, Coordinate>>,
    write_failure: RwLock<Option<String>>,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self {
            locations: RwLock::new(HashMap::new()),
            write_failure: RwLock::new(None),
        }
    }

    /// Make every write fail with the given reason
    pub fn fail_writes(&self, reason: impl Into<String>) {
        *self.write_failure.write() = Some(reason.into());
    }

    /// Get the stored coordinate for a user, if any
    pub fn stored(&self, user: &UserId) -> Option<Coordinate> {
        self.locations.read().get(&user.location_key()).copied()
    }

    /// Number of stored locations
    pub fn len(&self) -> usize {
        self.locations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.read().is_empty()
    }
}

impl Default for InMemoryLocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn store_location(&self, user: &UserId, coordinate: &Coordinate) -> Result<()> {
        if let Some(reason) = self.write_failure.read().as_deref() {
            return Err(DespachoError::UploadFailed(reason.to_string()));
        }
        coordinate.validate()?;
        self.locations
            .write()
            .insert(user.location_key(), *coordinate);
        info!(key = user.location_key(), %coordinate, "location stored");
        Ok(())
    }
}

/// Fixed permission answers
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissions {
    pub fine: bool,
    pub coarse: bool,
}

impl StaticPermissions {
    /// Both permission grades granted
    pub fn granted() -> Self {
        Self {
            fine: true,
            coarse: true,
        }
    }

    /// Only the network-grade permission granted
    pub fn coarse_only() -> Self {
        Self {
            fine: false,
            coarse: true,
        }
    }

    /// No location permission at all
    pub fn denied() -> Self {
        Self {
            fine: false,
            coarse: false,
        }
    }
}

impl PermissionGate for StaticPermissions {
    fn fine_granted(&self) -> bool {
        self.fine
    }

    fn coarse_granted(&self) -> bool {
        self.coarse
    }
}
