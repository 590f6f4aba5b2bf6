// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nearby workout spots, printed as a GeoJSON pin layer.
//!
//! Usage: `healthmate-spots <latitude> <longitude>`

use anyhow::{bail, Context};
use healthmate_spots::{config::Config, models::Coordinate, Reconciler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean GeoJSON
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [lat, lng] = args.as_slice() else {
        bail!("usage: healthmate-spots <latitude> <longitude>");
    };
    let reference = Coordinate::new(
        lat.parse().context("latitude must be a number")?,
        lng.parse().context("longitude must be a number")?,
    );

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(api = %config.api_url, radius_km = config.nearby_radius_km, "Loading nearby spots");

    let reconciler = Reconciler::connect(&config).context("Failed to build HTTP client")?;
    reconciler
        .load_nearby(reference, config.nearby_radius_km)
        .await
        .context("Failed to load nearby spots")?;

    let projection = reconciler.snapshot().await;
    tracing::info!(
        spots = projection.spots.len(),
        favorites = projection.favorites.len(),
        "Nearby spots loaded"
    );

    println!("{}", geojson::GeoJson::from(projection.to_geojson()));
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("healthmate_spots=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
