//! Acquisition behavior: cached preference, live race, cancellation,
//! bounded timeout

use std::sync::Arc;
use std::time::Duration;

use despacho_core::{AcquisitionConfig, Coordinate, DespachoError, FixSource, LocationProvider};

use despacho_app::sim::SimulatedProvider;
use despacho_app::PositionAcquirer;

fn acquirer_with_timeout(
    providers: Vec<Arc<dyn LocationProvider>>,
    fix_timeout: Duration,
) -> PositionAcquirer {
    PositionAcquirer::new(providers, &AcquisitionConfig { fix_timeout })
}

#[tokio::test]
async fn test_cached_fix_preferred_over_live_path() {
    let gps = Arc::new(
        SimulatedProvider::named("gps").with_cached_fix(Coordinate::new(-36.6, -72.1)),
    );
    let network = Arc::new(
        SimulatedProvider::named("network").with_cached_fix(Coordinate::new(40.0, -3.0)),
    );

    let acquirer = acquirer_with_timeout(
        vec![gps.clone(), network.clone()],
        Duration::from_secs(30),
    );
    let fix = acquirer.acquire().await.unwrap();

    assert_eq!(fix.source, FixSource::Cached);
    assert_eq!(fix.provider, "gps");
    assert_eq!(fix.coordinate, Coordinate::new(-36.6, -72.1));
    // The secondary cache was never consulted, the live path never taken
    assert_eq!(network.cache_queries(), 0);
    assert_eq!(gps.live_requests(), 0);
    assert_eq!(network.live_requests(), 0);
}

#[tokio::test]
async fn test_secondary_cache_used_when_primary_is_empty() {
    let gps = Arc::new(SimulatedProvider::named("gps"));
    let network = Arc::new(
        SimulatedProvider::named("network").with_cached_fix(Coordinate::new(1.5, 2.5)),
    );

    let acquirer =
        acquirer_with_timeout(vec![gps.clone(), network], Duration::from_secs(30));
    let fix = acquirer.acquire().await.unwrap();

    assert_eq!(fix.provider, "network");
    assert_eq!(fix.source, FixSource::Cached);
    assert_eq!(gps.cache_queries(), 1);
    assert_eq!(gps.live_requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_live_race_delivers_once_and_cancels_sibling() {
    // Neither provider has a cache; only the network provider will
    // ever report, after 50ms. The GPS registration must be released
    // the moment the network fix wins.
    let gps = Arc::new(SimulatedProvider::named("gps"));
    let network = Arc::new(
        SimulatedProvider::named("network")
            .with_live_fix(Coordinate::new(-33.45, -70.67), Duration::from_millis(50)),
    );

    let acquirer = acquirer_with_timeout(
        vec![gps.clone(), network.clone()],
        Duration::from_secs(30),
    );
    let fix = acquirer.acquire().await.unwrap();

    assert_eq!(fix.source, FixSource::LiveUpdate);
    assert_eq!(fix.provider, "network");
    assert_eq!(fix.coordinate, Coordinate::new(-33.45, -70.67));

    // Both providers were subscribed, exactly one fix was produced
    assert_eq!(gps.live_requests(), 1);
    assert_eq!(network.live_requests(), 1);
    assert_eq!(gps.active_registrations(), 0);
    assert_eq!(network.active_registrations(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_wait_is_bounded_by_the_configured_timeout() {
    let gps = Arc::new(SimulatedProvider::named("gps"));
    let network = Arc::new(SimulatedProvider::named("network"));

    let acquirer = acquirer_with_timeout(
        vec![gps.clone(), network.clone()],
        Duration::from_secs(5),
    );
    let err = acquirer.acquire().await.unwrap_err();

    match err {
        DespachoError::FixUnavailable { waited_ms } => assert_eq!(waited_ms, 5_000),
        other => panic!("expected FixUnavailable, got {other:?}"),
    }
    // Timing out released every pending registration
    assert_eq!(gps.active_registrations(), 0);
    assert_eq!(network.active_registrations(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_subscription_does_not_abort_the_race() {
    let gps = Arc::new(SimulatedProvider::named("gps").with_failing_live("gps disabled"));
    let network = Arc::new(
        SimulatedProvider::named("network")
            .with_live_fix(Coordinate::new(2.0, 3.0), Duration::from_millis(10)),
    );

    let acquirer =
        acquirer_with_timeout(vec![gps, network], Duration::from_secs(30));
    let fix = acquirer.acquire().await.unwrap();
    assert_eq!(fix.provider, "network");
}

#[tokio::test]
async fn test_all_subscriptions_failing_reports_no_fix() {
    let gps = Arc::new(SimulatedProvider::named("gps").with_failing_live("gps disabled"));
    let network =
        Arc::new(SimulatedProvider::named("network").with_failing_live("airplane mode"));

    let acquirer =
        acquirer_with_timeout(vec![gps, network], Duration::from_secs(30));
    let err = acquirer.acquire().await.unwrap_err();
    assert_eq!(err.error_code(), "FIX_UNAVAILABLE");
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_acquisition_releases_registrations() {
    let gps = Arc::new(SimulatedProvider::named("gps"));
    let acquirer = Arc::new(acquirer_with_timeout(
        vec![gps.clone()],
        Duration::from_secs(60),
    ));

    let handle = {
        let acquirer = Arc::clone(&acquirer);
        tokio::spawn(async move {
            let _ = acquirer.acquire().await;
        })
    };
    // Let the task reach the live wait, then tear it down
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(gps.active_registrations(), 1);

    handle.abort();
    let _ = handle.await;
    assert_eq!(gps.active_registrations(), 0);
}
