//! Despacho demo binary
//!
//! Runs the full dispatch flow against simulated collaborators: sign in,
//! acquire a device position, compute the distance to the warehouse and
//! print the display surface. Use `--live` to exercise the one-shot
//! live-update path instead of the cached one.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use despacho_core::{AcquisitionConfig, AppConfig, Coordinate, Credentials, LocationProvider};

use despacho_app::sim::{
    InMemoryLocationStore, SimulatedIdentityService, SimulatedProvider, StaticPermissions,
};
use despacho_app::{DistanceReporter, PositionAcquirer, SignInFlow};

#[derive(Parser)]
#[command(name = "despacho-app")]
#[command(about = "Dispatch distance demo with simulated device services")]
struct Args {
    /// Account email
    #[arg(long, default_value = "driver@despacho.cl")]
    email: String,

    /// Account password
    #[arg(long, default_value = "despacho")]
    password: String,

    /// Simulated device latitude
    #[arg(long, default_value_t = -33.4489)]
    lat: f64,

    /// Simulated device longitude
    #[arg(long, default_value_t = -70.6693)]
    lon: f64,

    /// Leave the provider caches empty and deliver the fix live
    #[arg(long)]
    live: bool,

    /// Delay before the live fix arrives
    #[arg(long, value_parser = humantime::parse_duration, default_value = "2s")]
    live_delay: Duration,

    /// Bound on the live-update wait
    #[arg(long, value_parser = humantime::parse_duration, default_value = "30s")]
    fix_timeout: Duration,

    /// Simulate a device without the location permission
    #[arg(long)]
    deny_permission: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig {
        acquisition: AcquisitionConfig {
            fix_timeout: args.fix_timeout,
        },
        ..AppConfig::default()
    };
    config.validate()?;

    let device = Coordinate::new(args.lat, args.lon);
    device.validate()?;

    // Ranked providers: GPS first, network second
    let gps = SimulatedProvider::named("gps");
    let mut network = SimulatedProvider::named("network");
    let gps = if args.live {
        network = network.with_live_fix(device, args.live_delay);
        info!(delay = ?args.live_delay, "device fix will arrive via live update");
        gps
    } else {
        gps.with_cached_fix(device)
    };
    let providers: Vec<Arc<dyn LocationProvider>> = vec![Arc::new(gps), Arc::new(network)];

    let acquirer = Arc::new(PositionAcquirer::new(providers, &config.acquisition));

    let identity = Arc::new(SimulatedIdentityService::new());
    identity.add_account(args.email.as_str(), args.password.as_str());
    let store = Arc::new(InMemoryLocationStore::new());
    let permissions = Arc::new(if args.deny_permission {
        StaticPermissions::denied()
    } else {
        StaticPermissions::granted()
    });

    let flow = SignInFlow::new(
        identity,
        store,
        permissions.clone(),
        Arc::clone(&acquirer),
    );

    let credentials = Credentials::new(args.email, args.password);
    let session = match flow.sign_in(&credentials).await {
        Ok(session) => session,
        Err(err) if err.is_user_visible() => {
            eprintln!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    info!(user = session.user.short(), "signed in");

    let reporter = DistanceReporter::new(
        Arc::clone(&acquirer),
        permissions,
        config.reference.coordinate,
    );

    match reporter.report().await {
        Ok(_) => println!("{}", reporter.board().current()),
        Err(err) if err.is_user_visible() => eprintln!("{err}"),
        Err(err) => return Err(err.into()),
    }

    // Let the best-effort upload finish before exiting
    if let Some(task) = session.upload_task {
        let _ = task.await;
    }

    Ok(())
}
