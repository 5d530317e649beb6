//! Thresholds for proximity risk detection.

use serde::{Deserialize, Serialize};

use crate::index::PREFILTER_RADIUS_DEG;

/// Configuration for risk rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskRules {
    /// Planar pre-filter radius in degrees (~100 km at mid-latitudes)
    pub prefilter_radius_deg: f64,
    /// Alerts fire when the altitude difference is strictly below this (meters)
    pub altitude_threshold_m: f64,
}

impl Default for RiskRules {
    fn default() -> Self {
        Self {
            prefilter_radius_deg: PREFILTER_RADIUS_DEG,
            altitude_threshold_m: 2000.0,
        }
    }
}
