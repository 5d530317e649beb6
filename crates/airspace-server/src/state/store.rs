//! Query façade over the feeds, the flight cache and the risk detector.

use airspace_core::{
    Alert, CounterMetrics, FetchError, MetricsSnapshot, PositionedEntity, RiskDetector, RiskMetrics,
};
use airspace_feeds::{fetch_entities, BalloonFeed, FeedClient, FlightFeed, RawFeed};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::FreshnessCache;
use crate::config::Config;

/// Application state, created once per process and shared by handle.
pub struct AppState {
    balloons: Arc<dyn RawFeed>,
    flights: Arc<dyn RawFeed>,
    flight_cache: FreshnessCache<Vec<PositionedEntity>>,
    detector: RiskDetector,
    metrics: Arc<CounterMetrics>,
    fetch_timeout: Duration,
}

impl AppState {
    pub fn new(balloons: Arc<dyn RawFeed>, flights: Arc<dyn RawFeed>, config: &Config) -> Self {
        let metrics = Arc::new(CounterMetrics::new());
        Self {
            balloons,
            flights,
            flight_cache: FreshnessCache::new(config.flight_cache_ttl())
                .with_metrics(metrics.clone()),
            detector: RiskDetector::new(config.rules).with_metrics(metrics.clone()),
            metrics,
            fetch_timeout: config.feed_timeout(),
        }
    }

    /// Build state wired to the real upstream feeds.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = FeedClient::new(config.feed_timeout())?;
        let balloons = BalloonFeed::new(client.clone(), &config.balloon_feed_url)?;
        let flights = FlightFeed::new(client, &config.flight_feed_url)?;
        Ok(Self::new(Arc::new(balloons), Arc::new(flights), config))
    }

    /// Current balloon positions, fetched fresh. Empty on failure.
    pub async fn get_reference_entities(&self) -> Vec<PositionedEntity> {
        match self.fetch_bounded(self.balloons.as_ref()).await {
            Ok(entities) => {
                tracing::debug!("{} valid weather balloons detected", entities.len());
                entities
            }
            Err(err) => {
                tracing::warn!("balloon fetch failed: {}", err);
                self.metrics.fetch_failed();
                Vec::new()
            }
        }
    }

    /// Current aircraft positions through the freshness cache.
    pub async fn get_probe_entities(&self) -> Vec<PositionedEntity> {
        self.flight_cache
            .get_or_refresh(|| self.fetch_bounded(self.flights.as_ref()))
            .await
    }

    /// Fetch both feeds concurrently and run detection.
    pub async fn get_alerts(&self) -> Vec<Alert> {
        let (balloons, flights) =
            tokio::join!(self.get_reference_entities(), self.get_probe_entities());
        self.detector.detect(&balloons, &flights)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn flight_cache_ttl(&self) -> Duration {
        self.flight_cache.ttl()
    }

    pub fn flight_cache_age(&self) -> Option<Duration> {
        self.flight_cache.age()
    }

    pub fn flight_cache_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.flight_cache.refreshed_at()
    }

    async fn fetch_bounded(&self, feed: &dyn RawFeed) -> Result<Vec<PositionedEntity>, FetchError> {
        let metrics: &dyn RiskMetrics = self.metrics.as_ref();
        tokio::time::timeout(self.fetch_timeout, fetch_entities(feed, metrics))
            .await
            .unwrap_or(Err(FetchError::Timeout))
    }
}
