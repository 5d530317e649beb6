//! Airspace Feeds - upstream position sources
//!
//! Each feed knows where its data lives and how its positional records are
//! laid out. Normalization into typed entities happens in `airspace-core`.

pub mod balloons;
pub mod client;
pub mod flights;
pub mod json;

use airspace_core::{
    normalize_with_metrics, FetchError, FieldMapping, PositionedEntity, RiskMetrics, UnitScale,
};
use async_trait::async_trait;
use serde_json::Value;

pub use balloons::{BalloonFeed, DEFAULT_BALLOON_FEED_URL};
pub use client::FeedClient;
pub use flights::{FlightFeed, DEFAULT_FLIGHT_FEED_URL};

/// A source of raw positional records.
#[async_trait]
pub trait RawFeed: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Field layout of each record.
    fn mapping(&self) -> &FieldMapping;

    /// Multiplier turning the source altitude unit into meters.
    fn unit_scale(&self) -> UnitScale;

    /// Fetch the current raw records.
    async fn fetch_records(&self) -> Result<Vec<Value>, FetchError>;
}

/// Fetch a feed and normalize its records.
pub async fn fetch_entities(
    feed: &dyn RawFeed,
    metrics: &dyn RiskMetrics,
) -> Result<Vec<PositionedEntity>, FetchError> {
    let records = feed.fetch_records().await?;
    let entities = normalize_with_metrics(&records, feed.mapping(), feed.unit_scale(), metrics);
    tracing::debug!(
        "{}: {} valid positions from {} records",
        feed.name(),
        entities.len(),
        records.len()
    );
    Ok(entities)
}
