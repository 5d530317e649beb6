use airspace_core::{FetchError, FieldMapping, UnitScale};
use airspace_feeds::{balloons, flights, RawFeed};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use crate::{api, config::Config, state::AppState};

struct FakeFeed {
    mapping: FieldMapping,
    unit_scale: UnitScale,
    records: Vec<Value>,
    failing: AtomicBool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeFeed {
    fn balloons(records: Vec<Value>) -> Arc<Self> {
        Arc::new(Self::new(balloons::balloon_mapping().unwrap(), balloons::KM_TO_M, records))
    }

    fn flights(records: Vec<Value>) -> Arc<Self> {
        Arc::new(Self::new(flights::state_vector_mapping().unwrap(), UnitScale::METERS, records))
    }

    fn new(mapping: FieldMapping, unit_scale: UnitScale, records: Vec<Value>) -> Self {
        Self {
            mapping,
            unit_scale,
            records,
            failing: AtomicBool::new(false),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RawFeed for FakeFeed {
    fn name(&self) -> &str {
        "fake"
    }

    fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    fn unit_scale(&self) -> UnitScale {
        self.unit_scale
    }

    async fn fetch_records(&self) -> Result<Vec<Value>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Status(503));
        }
        Ok(self.records.clone())
    }
}

fn state_vector(callsign: &str, lat: f64, lon: f64, altitude_m: f64) -> Value {
    json!([
        "abc123",
        callsign,
        "United States",
        1700000000,
        1700000000,
        lon,
        lat,
        altitude_m,
        false
    ])
}

fn setup_app(
    balloons: Arc<FakeFeed>,
    flights: Arc<FakeFeed>,
) -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let state = Arc::new(AppState::new(balloons, flights, &config));
    let app = api::routes().with_state(state.clone());
    (app, state)
}

async fn get_json(app: &axum::Router, uri: &str) -> Value {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn alerts_report_nearby_aircraft() {
    let (app, _state) = setup_app(
        FakeFeed::balloons(vec![json!([40.0, -74.0, 9.0])]),
        FakeFeed::flights(vec![
            state_vector("TEST1   ", 40.001, -74.001, 9500.0),
            state_vector("HIGH1", 40.001, -74.001, 12000.0),
            state_vector("FAR1", 10.0, 10.0, 9000.0),
        ]),
    );

    let alerts = get_json(&app, "/api/alerts").await;
    let alerts = alerts.as_array().expect("alert list");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["aircraft"], "TEST1");
    assert_eq!(alerts[0]["altitude_diff"], 500.0);
    assert_eq!(alerts[0]["distance_km"], 0.14);
    assert_eq!(alerts[0]["risk"], "proximity-violation");
}

#[tokio::test]
async fn weather_data_drops_malformed_records() {
    let (app, state) = setup_app(
        FakeFeed::balloons(vec![
            json!([1.0, 2.0, 3.0]),
            json!([1.0, 2.0]),
            json!([null, 2.0, 3.0]),
        ]),
        FakeFeed::flights(Vec::new()),
    );

    let balloons = get_json(&app, "/api/weather-data").await;
    assert_eq!(
        balloons,
        json!([{"latitude": 1.0, "longitude": 2.0, "altitude": 3000.0, "label": "Unknown"}])
    );
    assert_eq!(state.metrics().records_dropped, 2);
}

#[tokio::test]
async fn flight_data_is_cached_between_requests() {
    let flights = FakeFeed::flights(vec![state_vector("UAL1", 41.0, -87.0, 10000.0)]);
    let (app, _state) = setup_app(FakeFeed::balloons(Vec::new()), flights.clone());

    let first = get_json(&app, "/api/flight-data").await;
    let second = get_json(&app, "/api/flight-data").await;

    assert_eq!(first, second);
    assert_eq!(first[0]["label"], "UAL1");
    assert_eq!(flights.calls(), 1);
}

#[tokio::test]
async fn alerts_reuse_cached_flights_and_refetch_balloons() {
    let balloons = FakeFeed::balloons(vec![json!([40.0, -74.0, 9.0])]);
    let flights = FakeFeed::flights(vec![state_vector("TEST1", 40.001, -74.001, 9500.0)]);
    let (app, _state) = setup_app(balloons.clone(), flights.clone());

    get_json(&app, "/api/alerts").await;
    get_json(&app, "/api/alerts").await;

    assert_eq!(balloons.calls(), 2);
    assert_eq!(flights.calls(), 1);
}

#[tokio::test]
async fn upstream_failures_degrade_to_empty_lists() {
    let balloons = FakeFeed::balloons(vec![json!([40.0, -74.0, 9.0])]);
    balloons.failing.store(true, Ordering::SeqCst);
    let flights = FakeFeed::flights(vec![state_vector("TEST1", 40.001, -74.001, 9500.0)]);
    flights.failing.store(true, Ordering::SeqCst);
    let (app, state) = setup_app(balloons, flights);

    assert_eq!(get_json(&app, "/api/weather-data").await, json!([]));
    assert_eq!(get_json(&app, "/api/flight-data").await, json!([]));
    assert_eq!(get_json(&app, "/api/alerts").await, json!([]));
    assert_eq!(state.metrics().fetch_failures, 4);
}

#[tokio::test(start_paused = true)]
async fn slow_feed_times_out() {
    let mut slow = FakeFeed::new(
        balloons::balloon_mapping().unwrap(),
        balloons::KM_TO_M,
        vec![json!([40.0, -74.0, 9.0])],
    );
    slow.delay = Some(Duration::from_secs(60));
    let (app, state) = setup_app(Arc::new(slow), FakeFeed::flights(Vec::new()));

    assert_eq!(get_json(&app, "/api/weather-data").await, json!([]));
    assert_eq!(state.metrics().fetch_failures, 1);
}

#[tokio::test]
async fn metrics_report_counters_and_cache_age() {
    let (app, _state) = setup_app(
        FakeFeed::balloons(vec![json!([40.0, -74.0, 9.0])]),
        FakeFeed::flights(vec![state_vector("TEST1", 40.001, -74.001, 9500.0)]),
    );

    let before = get_json(&app, "/api/metrics").await;
    assert_eq!(before["flight_cache_age_s"], Value::Null);
    assert_eq!(before["flight_cache_ttl_s"], 60);

    get_json(&app, "/api/alerts").await;

    let after = get_json(&app, "/api/metrics").await;
    assert_eq!(after["alerts_produced"], 1);
    assert_eq!(after["detection_runs"], 1);
    assert!(after["flight_cache_age_s"].is_number());
    assert!(after["flight_cache_refreshed_at"].is_string());
}
