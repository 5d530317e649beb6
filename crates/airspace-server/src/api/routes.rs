//! REST API routes.
//!
//! Every endpoint answers 200 with a JSON body. Upstream trouble shows up as
//! stale or empty lists, never as an error status.

use airspace_core::{Alert, MetricsSnapshot, PositionedEntity};
use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/weather-data", get(get_weather_data))
        .route("/api/flight-data", get(get_flight_data))
        .route("/api/alerts", get(get_alerts))
        .route("/api/metrics", get(get_metrics))
}

async fn get_weather_data(State(state): State<Arc<AppState>>) -> Json<Vec<PositionedEntity>> {
    Json(state.get_reference_entities().await)
}

async fn get_flight_data(State(state): State<Arc<AppState>>) -> Json<Vec<PositionedEntity>> {
    Json(state.get_probe_entities().await)
}

async fn get_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<Alert>> {
    let alerts = state.get_alerts().await;
    if !alerts.is_empty() {
        tracing::warn!("{} risks detected", alerts.len());
    }
    Json(alerts)
}

#[derive(Debug, Serialize)]
struct MetricsResponse {
    #[serde(flatten)]
    counters: MetricsSnapshot,
    flight_cache_ttl_s: u64,
    flight_cache_age_s: Option<f64>,
    flight_cache_refreshed_at: Option<DateTime<Utc>>,
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        counters: state.metrics(),
        flight_cache_ttl_s: state.flight_cache_ttl().as_secs(),
        flight_cache_age_s: state.flight_cache_age().map(|age| age.as_secs_f64()),
        flight_cache_refreshed_at: state.flight_cache_refreshed_at(),
    })
}
