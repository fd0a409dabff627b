//! Despacho Core - Foundational types and traits for the dispatch app
//!
//! This crate provides the data model and the collaborator seams used by
//! the dispatch application: coordinates and great-circle distance, user
//! identity, error taxonomy, configuration, and the traits implemented by
//! the platform collaborators (identity service, location providers,
//! remote store).
//!
//! # Modules
//!
//! - [`location`] - Coordinates, fix types, and haversine distance
//! - [`identity`] - Credentials and user identifiers
//! - [`config`] - Configuration types
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```rust
//! use despacho_core::location::{distance_km, Coordinate, WAREHOUSE};
//!
//! let santiago = Coordinate::new(-33.4489, -70.6693);
//! let km = distance_km(&santiago, &WAREHOUSE);
//! println!("Distance to the warehouse: {km:.4} km");
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod location;

// Re-exports for convenience
pub use config::{AcquisitionConfig, AppConfig, LoggingConfig, ReferenceConfig};
pub use error::{DespachoError, Result};
pub use identity::{Credentials, UserId};
pub use location::{distance_km, format_distance_km, Coordinate, Fix, FixSource, WAREHOUSE};

use async_trait::async_trait;

/// Trait for ranked platform location providers
///
/// A provider exposes two paths: a cache query that returns immediately
/// and never triggers new hardware activity, and a one-shot live
/// subscription. The registration backing [`next_fix`] is released when
/// the returned future is dropped, so racing several providers and
/// keeping the first winner cancels the siblings.
///
/// [`next_fix`]: LocationProvider::next_fix
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Provider name (for logging and fix attribution)
    fn name(&self) -> &str;

    /// Return the provider's last-known fix, if any
    ///
    /// Returns `Ok(None)` when the provider has no cached position.
    async fn last_known_fix(&self) -> Result<Option<Coordinate>>;

    /// Register a one-shot live subscription and wait for the next fix
    ///
    /// Resolves with at most one coordinate. Dropping the future before
    /// it resolves releases the registration.
    async fn next_fix(&self) -> Result<Coordinate>;
}

/// Trait for the remote identity service
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Authenticate and return the stable user id
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId>;
}

/// Trait for the remote location store
///
/// Writes are best-effort telemetry: callers log failures and never
/// retry them.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Write the user's position under their location key
    async fn store_location(&self, user: &UserId, coordinate: &Coordinate) -> Result<()>;
}

/// Trait for querying the device's location capability
///
/// Acquisition must not be attempted without this capability; callers
/// check before invoking.
pub trait PermissionGate: Send + Sync {
    /// Whether the fine (GPS-grade) location permission is granted
    fn fine_granted(&self) -> bool;

    /// Whether the coarse (network-grade) location permission is granted
    fn coarse_granted(&self) -> bool;

    /// Whether acquisition may proceed (either grade suffices)
    fn location_granted(&self) -> bool {
        self.fine_granted() || self.coarse_granted()
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
