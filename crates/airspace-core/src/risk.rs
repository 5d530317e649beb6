//! Proximity risk detection between a reference set (balloons) and a probe
//! set (aircraft).
//!
//! Two stages: a planar radius query over the reference set prunes
//! candidates, then the altitude threshold and great-circle distance are
//! evaluated for each surviving pair.

use std::sync::Arc;

use crate::index::SpatialIndex;
use crate::metrics::{NoopMetrics, RiskMetrics};
use crate::models::{Alert, PositionedEntity, RiskKind};
use crate::rules::RiskRules;
use crate::spatial::{round_to, surface_distance_km};

/// Detect proximity risks with explicit thresholds.
///
/// `radius` is the planar pre-filter radius in degree units. Never fails:
/// empty inputs and unusable geometry produce an empty list.
pub fn detect(
    reference_set: &[PositionedEntity],
    probe_set: &[PositionedEntity],
    radius: f64,
    altitude_threshold_m: f64,
) -> Vec<Alert> {
    let rules = RiskRules {
        prefilter_radius_deg: radius,
        altitude_threshold_m,
    };
    run_detection(reference_set, probe_set, &rules, &NoopMetrics)
}

/// Risk detection engine with configured rules and metrics.
#[derive(Clone)]
pub struct RiskDetector {
    rules: RiskRules,
    metrics: Arc<dyn RiskMetrics>,
}

impl Default for RiskDetector {
    fn default() -> Self {
        Self::new(RiskRules::default())
    }
}

impl RiskDetector {
    pub fn new(rules: RiskRules) -> Self {
        Self {
            rules,
            metrics: Arc::new(NoopMetrics),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn RiskMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn rules(&self) -> &RiskRules {
        &self.rules
    }

    /// Check every probe entity against the reference set.
    pub fn detect(
        &self,
        reference_set: &[PositionedEntity],
        probe_set: &[PositionedEntity],
    ) -> Vec<Alert> {
        run_detection(reference_set, probe_set, &self.rules, self.metrics.as_ref())
    }
}

fn run_detection(
    reference_set: &[PositionedEntity],
    probe_set: &[PositionedEntity],
    rules: &RiskRules,
    metrics: &dyn RiskMetrics,
) -> Vec<Alert> {
    if reference_set.is_empty() || probe_set.is_empty() {
        tracing::debug!(
            "skipping risk detection: {} reference / {} probe entities",
            reference_set.len(),
            probe_set.len()
        );
        metrics.alerts_produced(0);
        return Vec::new();
    }

    let positions: Vec<(f64, f64)> = reference_set
        .iter()
        .map(|entity| (entity.latitude, entity.longitude))
        .collect();

    let index = match SpatialIndex::build(&positions) {
        Ok(index) => index,
        Err(err) => {
            tracing::error!("failed to build reference index: {}", err);
            metrics.alerts_produced(0);
            return Vec::new();
        }
    };

    let mut alerts = Vec::new();
    for probe in probe_set {
        let candidates =
            index.query_radius((probe.latitude, probe.longitude), rules.prefilter_radius_deg);

        for idx in candidates {
            let reference = &reference_set[idx];
            let altitude_diff = (probe.altitude - reference.altitude).abs();
            // NaN altitudes fail this comparison and are skipped with it.
            let within_band = altitude_diff < rules.altitude_threshold_m;
            if !within_band {
                continue;
            }

            let Some(distance_km) = surface_distance_km(reference, probe) else {
                tracing::warn!(
                    "skipping pair {} / reference {}: distance is not finite",
                    probe.label,
                    idx
                );
                continue;
            };

            alerts.push(Alert {
                aircraft: probe.label.clone(),
                latitude: probe.latitude,
                longitude: probe.longitude,
                altitude: probe.altitude,
                distance_km: round_to(distance_km, 2),
                altitude_diff,
                risk_kind: RiskKind::ProximityViolation,
            });
        }
    }

    tracing::debug!("{} risks detected", alerts.len());
    metrics.alerts_produced(alerts.len());
    alerts
}
