//! Best-effort position acquisition over ranked providers
//!
//! Produces at most one [`Fix`] per request: the first cached fix found
//! in rank order, or the winner of a first-wins live race across all
//! providers, bounded by the configured timeout.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::select_all;
use tracing::{debug, warn};

use despacho_core::{AcquisitionConfig, DespachoError, Fix, LocationProvider, Result};

/// One-shot position acquisition over an ordered provider list
///
/// Callers must hold the location capability before invoking
/// [`acquire`]; this component does not check permissions itself.
///
/// [`acquire`]: PositionAcquirer::acquire
pub struct PositionAcquirer {
    /// Providers in rank order; earlier entries are preferred on the
    /// cached path
    providers: Vec<Arc<dyn LocationProvider>>,
    /// Bound on the live-update wait
    fix_timeout: Duration,
}

impl PositionAcquirer {
    /// Create an acquirer over ranked providers
    pub fn new(providers: Vec<Arc<dyn LocationProvider>>, config: &AcquisitionConfig) -> Self {
        Self {
            providers,
            fix_timeout: config.fix_timeout,
        }
    }

    /// Obtain exactly one fix, preferring speed over freshness
    ///
    /// Queries each provider's cache in rank order first; only when
    /// every cache is empty are live subscriptions registered with all
    /// providers simultaneously. The first live fix wins and the
    /// sibling registrations are released at that moment, so a stale
    /// second callback can never re-trigger anything downstream.
    pub async fn acquire(&self) -> Result<Fix> {
        if self.providers.is_empty() {
            return Err(DespachoError::InvalidConfig(
                "at least one location provider is required".to_string(),
            ));
        }

        for provider in &self.providers {
            match provider.last_known_fix().await {
                Ok(Some(coordinate)) => {
                    debug!(
                        provider = provider.name(),
                        %coordinate,
                        "using last-known fix"
                    );
                    return Ok(Fix::cached(coordinate, provider.name()));
                }
                Ok(None) => {}
                // The cached path treats provider failures as absence
                Err(err) => {
                    warn!(
                        provider = provider.name(),
                        error = %err,
                        "last-known fix query failed"
                    );
                }
            }
        }

        debug!(
            providers = self.providers.len(),
            timeout = ?self.fix_timeout,
            "no cached fix, registering one-shot live updates"
        );

        let started = Instant::now();
        match tokio::time::timeout(self.fix_timeout, self.race_live_updates(started)).await {
            Ok(result) => result,
            Err(_) => Err(DespachoError::FixUnavailable {
                waited_ms: self.fix_timeout.as_millis() as u64,
            }),
        }
    }

    /// Race live subscriptions across all providers, first fix wins
    ///
    /// Losing futures are dropped as soon as a winner resolves, which
    /// releases their registrations. A provider whose subscription
    /// fails is removed from the race without aborting it.
    async fn race_live_updates(&self, started: Instant) -> Result<Fix> {
        type LiveFuture =
            Pin<Box<dyn Future<Output = (String, Result<despacho_core::Coordinate>)> + Send>>;

        let mut pending: Vec<LiveFuture> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let fut: LiveFuture = Box::pin(async move {
                    let name = provider.name().to_string();
                    let result = provider.next_fix().await;
                    (name, result)
                });
                fut
            })
            .collect();

        loop {
            if pending.is_empty() {
                return Err(DespachoError::FixUnavailable {
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }

            let ((name, result), _index, rest) = select_all(pending).await;
            match result {
                Ok(coordinate) => {
                    // Dropping `rest` here cancels the sibling registrations
                    debug!(provider = %name, %coordinate, "live update delivered");
                    return Ok(Fix::live(coordinate, name));
                }
                Err(err) => {
                    warn!(provider = %name, error = %err, "live subscription failed");
                    pending = rest;
                }
            }
        }
    }
}
