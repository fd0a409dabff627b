//! Despacho App - sign-in, position acquisition and distance reporting
//!
//! Runtime logic of the dispatch application, composed from the seams
//! defined in `despacho-core`:
//!
//! - [`acquisition`] - One-shot position acquisition over ranked providers
//! - [`session`] - Sign-in flow with best-effort location upload
//! - [`report`] - Distance computation and publishing
//! - [`display`] - Single-slot display cell
//! - [`sim`] - Simulated collaborators for the demo binary and tests

pub mod acquisition;
pub mod display;
pub mod report;
pub mod session;
pub mod sim;

pub use acquisition::PositionAcquirer;
pub use display::{DistanceBoard, CALCULATING_MESSAGE};
pub use report::{DistanceReporter, NO_PERMISSION_MESSAGE};
pub use session::{Session, SignInFlow};
