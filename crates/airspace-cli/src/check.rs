//! Single detection pass over both feeds.

use airspace_core::{Alert, NoopMetrics, PositionedEntity, RiskDetector, RiskRules};
use airspace_feeds::{fetch_entities, RawFeed};
use serde::Serialize;

/// Outcome of one check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub balloons: usize,
    pub aircraft: usize,
    pub alerts: Vec<Alert>,
}

impl CheckReport {
    pub fn summary_line(&self) -> String {
        format!(
            "{} balloons, {} aircraft, {} alerts",
            self.balloons,
            self.aircraft,
            self.alerts.len()
        )
    }
}

/// Fetch both feeds concurrently and run detection once.
///
/// A failed feed is logged and treated as empty.
pub async fn run_check(
    balloon_feed: &dyn RawFeed,
    flight_feed: &dyn RawFeed,
    rules: RiskRules,
) -> CheckReport {
    let (balloons, aircraft) = tokio::join!(
        load_or_empty(balloon_feed),
        load_or_empty(flight_feed)
    );

    let alerts = RiskDetector::new(rules).detect(&balloons, &aircraft);
    CheckReport {
        balloons: balloons.len(),
        aircraft: aircraft.len(),
        alerts,
    }
}

async fn load_or_empty(feed: &dyn RawFeed) -> Vec<PositionedEntity> {
    match fetch_entities(feed, &NoopMetrics).await {
        Ok(entities) => entities,
        Err(err) => {
            tracing::warn!("{} feed unavailable: {}", feed.name(), err);
            Vec::new()
        }
    }
}
