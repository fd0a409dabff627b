//! Distance reporting to the display surface

use std::sync::Arc;

use tracing::{info, warn};

use despacho_core::{
    distance_km, format_distance_km, Coordinate, DespachoError, PermissionGate, Result,
};

use crate::acquisition::PositionAcquirer;
use crate::display::DistanceBoard;

/// Message published when the location capability is missing
pub const NO_PERMISSION_MESSAGE: &str =
    "Location permission is not granted. Enable it in the device settings.";

/// Computes the distance from the device to the reference point and
/// publishes the formatted result
pub struct DistanceReporter {
    acquirer: Arc<PositionAcquirer>,
    permissions: Arc<dyn PermissionGate>,
    reference: Coordinate,
    board: DistanceBoard,
}

impl DistanceReporter {
    pub fn new(
        acquirer: Arc<PositionAcquirer>,
        permissions: Arc<dyn PermissionGate>,
        reference: Coordinate,
    ) -> Self {
        Self {
            acquirer,
            permissions,
            reference,
            board: DistanceBoard::new(),
        }
    }

    /// The display surface this reporter publishes to
    pub fn board(&self) -> &DistanceBoard {
        &self.board
    }

    /// Acquire a fix, compute the distance and publish it
    ///
    /// Returns the raw kilometers; the board receives the 4-decimal
    /// `km` rendering. Without the location capability no acquisition
    /// is attempted and the board shows an informational message.
    pub async fn report(&self) -> Result<f64> {
        if !self.permissions.location_granted() {
            warn!("location permission not granted, skipping acquisition");
            self.board.publish(NO_PERMISSION_MESSAGE);
            return Err(DespachoError::PermissionDenied);
        }

        let fix = self.acquirer.acquire().await?;
        let km = distance_km(&fix.coordinate, &self.reference);

        info!(
            distance_km = format!("{km:.4}"),
            from = %fix.coordinate,
            to = %self.reference,
            source = %fix.source,
            provider = %fix.provider,
            "distance to warehouse computed"
        );

        self.board.publish(format_distance_km(km));
        Ok(km)
    }
}
