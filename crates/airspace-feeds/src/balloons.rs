//! High-altitude balloon feed.
//!
//! The feed is a bare JSON array of `[lat, lon, altitude_km]` triples.

use airspace_core::{FetchError, FieldMapping, FieldRole, MappingError, UnitScale};
use async_trait::async_trait;
use serde_json::Value;

use crate::client::FeedClient;
use crate::json::replace_non_finite_literals;
use crate::RawFeed;

pub const DEFAULT_BALLOON_FEED_URL: &str = "https://a.windbornesystems.com/treasure/02.json";

/// Balloon altitudes are published in kilometers.
pub const KM_TO_M: UnitScale = UnitScale::KILOMETERS;

pub fn balloon_mapping() -> Result<FieldMapping, MappingError> {
    FieldMapping::exact(vec![
        FieldRole::Latitude,
        FieldRole::Longitude,
        FieldRole::Altitude,
    ])
}

pub struct BalloonFeed {
    client: FeedClient,
    url: String,
    mapping: FieldMapping,
}

impl BalloonFeed {
    pub fn new(client: FeedClient, url: impl Into<String>) -> Result<Self, MappingError> {
        Ok(Self {
            client,
            url: url.into(),
            mapping: balloon_mapping()?,
        })
    }
}

#[async_trait]
impl RawFeed for BalloonFeed {
    fn name(&self) -> &str {
        "balloons"
    }

    fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    fn unit_scale(&self) -> UnitScale {
        KM_TO_M
    }

    async fn fetch_records(&self) -> Result<Vec<Value>, FetchError> {
        let body = self.client.get_text(&self.url).await?;
        parse_balloon_payload(&body)
    }
}

/// Decode a balloon payload into raw records.
pub fn parse_balloon_payload(body: &str) -> Result<Vec<Value>, FetchError> {
    let cleaned = replace_non_finite_literals(body);
    serde_json::from_str(&cleaned).map_err(|err| FetchError::Decode(err.to_string()))
}
