//! Configuration types for the dispatch application

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::location::{Coordinate, WAREHOUSE};
use crate::{DespachoError, Result};

/// Default bound on the live-update wait
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(30);

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Position acquisition settings
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
    /// Reference point settings
    #[serde(default)]
    pub reference: ReferenceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        self.acquisition.validate()?;
        self.reference.validate()?;
        Ok(())
    }
}

/// Position acquisition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// How long to wait for a live fix before giving up
    ///
    /// The original behavior waited forever; a bounded wait converts
    /// "no provider ever responds" into an explicit error.
    #[serde(with = "humantime_serde", default = "default_fix_timeout")]
    pub fix_timeout: Duration,
}

fn default_fix_timeout() -> Duration {
    DEFAULT_FIX_TIMEOUT
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            fix_timeout: DEFAULT_FIX_TIMEOUT,
        }
    }
}

impl AcquisitionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fix_timeout.is_zero() {
            return Err(DespachoError::InvalidConfig(
                "fix_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reference point configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Destination coordinate distances are measured against
    #[serde(default = "default_reference")]
    pub coordinate: Coordinate,
}

fn default_reference() -> Coordinate {
    WAREHOUSE
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            coordinate: WAREHOUSE,
        }
    }
}

impl ReferenceConfig {
    pub fn validate(&self) -> Result<()> {
        self.coordinate.validate()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
