//! Geographic coordinate types and great-circle distance

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used by the haversine formula (kilometers)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// The distributor's warehouse at the Plaza de Armas de Chillán.
///
/// All reported distances are measured against this point unless the
/// configuration overrides it.
pub const WAREHOUSE: Coordinate = Coordinate {
    latitude: -36.6066,
    longitude: -72.1034,
};

/// A geographic position in decimal degrees
///
/// Immutable once produced by a provider. Valid coordinates have
/// latitude in [-90, 90] and longitude in [-180, 180]; [`distance_km`]
/// does not re-check this, callers own input sanitation at the trust
/// boundaries (configuration, store writes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check the latitude/longitude range invariant
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Range-check this coordinate, for use at trust boundaries
    pub fn validate(&self) -> crate::Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(crate::DespachoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Great-circle distance to another coordinate in kilometers
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        distance_km(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates in kilometers
///
/// Haversine formula over a sphere of radius [`EARTH_RADIUS_KM`], in
/// double precision throughout. Total over valid coordinates: zero for
/// identical inputs, symmetric, and defined at the ±90/±180 boundaries.
/// No rounding is applied here; presentation rounds for display.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Format a distance for the display surface: 4 decimal places, `km` unit
pub fn format_distance_km(distance_km: f64) -> String {
    format!("{:.4} km", distance_km)
}

/// How a fix was obtained
///
/// Informs logging and testing only, never the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixSource {
    /// A provider's last-known position, returned from cache
    Cached,
    /// A fresh position delivered by a one-shot live subscription
    LiveUpdate,
}

impl fmt::Display for FixSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixSource::Cached => write!(f, "cached"),
            FixSource::LiveUpdate => write!(f, "live-update"),
        }
    }
}

/// A single position fix delivered by the acquisition component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// The position reported by the provider
    pub coordinate: Coordinate,
    /// How the position was obtained
    pub source: FixSource,
    /// Name of the provider that reported it
    pub provider: String,
}

impl Fix {
    /// Create a fix delivered from a provider's cache
    pub fn cached(coordinate: Coordinate, provider: impl Into<String>) -> Self {
        Self {
            coordinate,
            source: FixSource::Cached,
            provider: provider.into(),
        }
    }

    /// Create a fix delivered by a live one-shot update
    pub fn live(coordinate: Coordinate, provider: impl Into<String>) -> Self {
        Self {
            coordinate,
            source: FixSource::LiveUpdate,
            provider: provider.into(),
        }
    }
}
