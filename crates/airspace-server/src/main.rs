//! Airspace Server - balloon/aircraft proximity risk backend

use airspace_server::{api, config::Config, state::AppState};
use anyhow::Result;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("airspace_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting Airspace Server...");

    let config = Config::from_env();
    let port = config.server_port;
    tracing::info!(
        "Flight cache TTL {}s, altitude threshold {}m, pre-filter radius {}deg",
        config.flight_cache_ttl_s,
        config.rules.altitude_threshold_m,
        config.rules.prefilter_radius_deg
    );
    let state = Arc::new(AppState::from_config(&config)?);

    // Build the app
    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // Allow frontend access

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
