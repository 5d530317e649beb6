//! Live aircraft feed (OpenSky `states/all`).
//!
//! The endpoint answers `{"time": ..., "states": [[...], ...]}` where each
//! state vector is a positional array:
//! `[icao24, callsign, origin_country, time_position, last_contact,
//!   longitude, latitude, baro_altitude, on_ground, ...]`.
//! `states` is `null` when nothing is airborne in the requested area.

use airspace_core::{FetchError, FieldMapping, FieldRole, MappingError, UnitScale};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::client::FeedClient;
use crate::RawFeed;

pub const DEFAULT_FLIGHT_FEED_URL: &str = "https://opensky-network.org/api/states/all";

pub fn state_vector_mapping() -> Result<FieldMapping, MappingError> {
    FieldMapping::with_trailing(vec![
        FieldRole::Skip,
        FieldRole::Label,
        FieldRole::Skip,
        FieldRole::Skip,
        FieldRole::Skip,
        FieldRole::Longitude,
        FieldRole::Latitude,
        FieldRole::Altitude,
    ])
}

#[derive(Debug, Deserialize)]
struct StatesResponse {
    #[serde(default)]
    states: Option<Vec<Value>>,
}

pub struct FlightFeed {
    client: FeedClient,
    url: String,
    mapping: FieldMapping,
}

impl FlightFeed {
    pub fn new(client: FeedClient, url: impl Into<String>) -> Result<Self, MappingError> {
        Ok(Self {
            client,
            url: url.into(),
            mapping: state_vector_mapping()?,
        })
    }
}

#[async_trait]
impl RawFeed for FlightFeed {
    fn name(&self) -> &str {
        "flights"
    }

    fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Barometric altitude is already in meters.
    fn unit_scale(&self) -> UnitScale {
        UnitScale::METERS
    }

    async fn fetch_records(&self) -> Result<Vec<Value>, FetchError> {
        let body = self.client.get_text(&self.url).await?;
        parse_state_vectors(&body)
    }
}

/// Decode a `states/all` payload into raw state vectors.
pub fn parse_state_vectors(body: &str) -> Result<Vec<Value>, FetchError> {
    let response: StatesResponse =
        serde_json::from_str(body).map_err(|err| FetchError::Decode(err.to_string()))?;
    Ok(response.states.unwrap_or_default())
}
