//! Single-slot display surface for the distance result

use tokio::sync::watch;

/// Placeholder shown until the first result is published
pub const CALCULATING_MESSAGE: &str = "Calculating distance to the warehouse...";

/// Observable cell holding the latest display text
///
/// Single writer per request cycle, any number of subscribers. The
/// rendering layer watches the cell; publishing replaces the previous
/// value, so late subscribers still see the latest result.
pub struct DistanceBoard {
    tx: watch::Sender<String>,
}

impl DistanceBoard {
    /// Create a board initialized with the calculating placeholder
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CALCULATING_MESSAGE.to_string());
        Self { tx }
    }

    /// Replace the displayed text
    pub fn publish(&self, text: impl Into<String>) {
        self.tx.send_replace(text.into());
    }

    /// Subscribe to display updates
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    /// Get the currently displayed text
    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }
}

impl Default for DistanceBoard {
    fn default() -> Self {
        Self::new()
    }
}
