//! Distance reporting: formula, formatting and display behavior

use std::sync::Arc;
use std::time::Duration;

use despacho_core::{
    distance_km, AcquisitionConfig, Coordinate, DespachoError, LocationProvider, WAREHOUSE,
};

use despacho_app::sim::{SimulatedProvider, StaticPermissions};
use despacho_app::{DistanceReporter, PositionAcquirer, CALCULATING_MESSAGE, NO_PERMISSION_MESSAGE};

fn reporter(gps: SimulatedProvider, permissions: StaticPermissions) -> DistanceReporter {
    let providers: Vec<Arc<dyn LocationProvider>> = vec![Arc::new(gps)];
    let acquirer = Arc::new(PositionAcquirer::new(
        providers,
        &AcquisitionConfig {
            fix_timeout: Duration::from_secs(1),
        },
    ));
    DistanceReporter::new(acquirer, Arc::new(permissions), WAREHOUSE)
}

#[tokio::test]
async fn test_santiago_to_warehouse_report() {
    let santiago = Coordinate::new(-33.4489, -70.6693);
    let reporter = reporter(
        SimulatedProvider::named("gps").with_cached_fix(santiago),
        StaticPermissions::granted(),
    );

    assert_eq!(reporter.board().current(), CALCULATING_MESSAGE);

    let km = reporter.report().await.unwrap();
    assert!((km - 354.0).abs() < 2.0, "got {km}");

    let shown = reporter.board().current();
    assert_eq!(shown, format!("{km:.4} km"));
}

#[tokio::test]
async fn test_fix_at_the_warehouse_reports_zero() {
    let reporter = reporter(
        SimulatedProvider::named("gps").with_cached_fix(WAREHOUSE),
        StaticPermissions::granted(),
    );

    let km = reporter.report().await.unwrap();
    assert_eq!(km, 0.0);
    assert_eq!(reporter.board().current(), "0.0000 km");
}

#[tokio::test]
async fn test_denied_permission_publishes_an_informational_message() {
    let reporter = reporter(
        SimulatedProvider::named("gps").with_cached_fix(WAREHOUSE),
        StaticPermissions::denied(),
    );

    let err = reporter.report().await.unwrap_err();
    assert!(matches!(err, DespachoError::PermissionDenied));
    assert_eq!(reporter.board().current(), NO_PERMISSION_MESSAGE);
}

#[tokio::test]
async fn test_subscribers_observe_the_published_result() {
    let reporter = reporter(
        SimulatedProvider::named("gps").with_cached_fix(Coordinate::new(0.0, 1.0)),
        StaticPermissions::granted(),
    );
    let mut rx = reporter.board().subscribe();

    let km = reporter.report().await.unwrap();
    // One degree of longitude at the equator against the fixed reference
    assert_eq!(km, distance_km(&Coordinate::new(0.0, 1.0), &WAREHOUSE));

    rx.changed().await.unwrap();
    assert!(rx.borrow().ends_with(" km"));
}

#[tokio::test(start_paused = true)]
async fn test_report_surfaces_fix_unavailable() {
    let reporter = reporter(SimulatedProvider::named("gps"), StaticPermissions::granted());

    let err = reporter.report().await.unwrap_err();
    assert_eq!(err.error_code(), "FIX_UNAVAILABLE");
    assert!(err.is_user_visible());
    // The display keeps the placeholder; nothing was computed
    assert_eq!(reporter.board().current(), CALCULATING_MESSAGE);
}
