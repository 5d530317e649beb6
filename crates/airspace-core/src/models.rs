//! Core data models shared by both feeds and the risk detector.

use serde::{Deserialize, Serialize};

/// Label used when a record carries no usable identifier.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A normalized position from either feed.
///
/// Only the normalizer builds these from raw records, so every value that
/// came from upstream has finite coordinates and altitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedEntity {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above reference
    pub altitude: f64,
    #[serde(default = "unknown_label")]
    pub label: String,
}

fn unknown_label() -> String {
    UNKNOWN_LABEL.to_string()
}

impl PositionedEntity {
    /// Create an entity with the `Unknown` label.
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            label: unknown_label(),
        }
    }

    /// Set the label. Blank labels fall back to `Unknown`.
    pub fn with_label(mut self, label: impl AsRef<str>) -> Self {
        self.label = clean_label(Some(label.as_ref()));
        self
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }
}

/// Trim a raw label, mapping missing or blank values to `Unknown`.
pub fn clean_label(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => unknown_label(),
    }
}

/// Category of a detected risk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskKind {
    /// Aircraft within the horizontal pre-filter and vertical threshold of a balloon
    #[default]
    ProximityViolation,
}

/// A probe entity found too close to a reference entity.
///
/// Position fields are copied from the probe (aircraft) side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub aircraft: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    /// Great-circle surface distance, rounded to 2 decimals
    pub distance_km: f64,
    /// Absolute altitude difference in meters
    pub altitude_diff: f64,
    #[serde(rename = "risk")]
    pub risk_kind: RiskKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_label_becomes_unknown() {
        let entity = PositionedEntity::new(1.0, 2.0, 3.0).with_label("   ");
        assert_eq!(entity.label, UNKNOWN_LABEL);

        let entity = PositionedEntity::new(1.0, 2.0, 3.0).with_label(" DLH4AB ");
        assert_eq!(entity.label, "DLH4AB");
    }

    #[test]
    fn alert_serializes_flat() {
        let alert = Alert {
            aircraft: "TEST1".to_string(),
            latitude: 40.0,
            longitude: -74.0,
            altitude: 9500.0,
            distance_km: 0.14,
            altitude_diff: 500.0,
            risk_kind: RiskKind::ProximityViolation,
        };

        let value = serde_json::to_value(&alert).unwrap();
        assert_eq!(value["aircraft"], "TEST1");
        assert_eq!(value["risk"], "proximity-violation");
        assert_eq!(value["altitude_diff"], 500.0);
    }

    #[test]
    fn entity_label_defaults_when_missing() {
        let entity: PositionedEntity =
            serde_json::from_str(r#"{"latitude":1.0,"longitude":2.0,"altitude":3.0}"#).unwrap();
        assert_eq!(entity.label, UNKNOWN_LABEL);
    }
}
