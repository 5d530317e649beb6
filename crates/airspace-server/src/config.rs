//! Server configuration from environment.

use airspace_core::RiskRules;
use airspace_feeds::{DEFAULT_BALLOON_FEED_URL, DEFAULT_FLIGHT_FEED_URL};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub balloon_feed_url: String,
    pub flight_feed_url: String,
    /// Reuse window for aircraft positions (the upstream is rate limited)
    pub flight_cache_ttl_s: u64,
    /// Upper bound on a single upstream fetch
    pub feed_timeout_s: u64,
    pub rules: RiskRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            balloon_feed_url: DEFAULT_BALLOON_FEED_URL.to_string(),
            flight_feed_url: DEFAULT_FLIGHT_FEED_URL.to_string(),
            flight_cache_ttl_s: 60,
            feed_timeout_s: 10,
            rules: RiskRules::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Missing, unparseable, zero or non-finite
    /// numbers keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            server_port: positive(&lookup, "AIRSPACE_PORT").unwrap_or(defaults.server_port),
            balloon_feed_url: lookup("BALLOON_FEED_URL").unwrap_or(defaults.balloon_feed_url),
            flight_feed_url: lookup("FLIGHT_FEED_URL").unwrap_or(defaults.flight_feed_url),
            flight_cache_ttl_s: positive(&lookup, "FLIGHT_CACHE_TTL_SECS")
                .unwrap_or(defaults.flight_cache_ttl_s),
            feed_timeout_s: positive(&lookup, "FEED_TIMEOUT_SECS")
                .unwrap_or(defaults.feed_timeout_s),
            rules: RiskRules {
                prefilter_radius_deg: positive_f64(&lookup, "PREFILTER_RADIUS_DEG")
                    .unwrap_or(defaults.rules.prefilter_radius_deg),
                altitude_threshold_m: positive_f64(&lookup, "ALTITUDE_THRESHOLD_M")
                    .unwrap_or(defaults.rules.altitude_threshold_m),
            },
        }
    }

    pub fn flight_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.flight_cache_ttl_s)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_s)
    }
}

fn positive<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr + Default + PartialOrd,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|s| s.trim().parse::<T>().ok())
        .filter(|value| *value > T::default())
}

fn positive_f64<F>(lookup: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    positive::<f64, F>(lookup, key).filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.balloon_feed_url, DEFAULT_BALLOON_FEED_URL);
        assert_eq!(config.flight_feed_url, DEFAULT_FLIGHT_FEED_URL);
        assert_eq!(config.flight_cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.feed_timeout(), Duration::from_secs(10));
        assert_eq!(config.rules, RiskRules::default());
    }

    #[test]
    fn valid_overrides_are_applied() {
        let config = config_from(&[
            ("AIRSPACE_PORT", "8080"),
            ("FLIGHT_FEED_URL", "http://localhost:9000/states"),
            ("FLIGHT_CACHE_TTL_SECS", "120"),
            ("FEED_TIMEOUT_SECS", " 5 "),
            ("PREFILTER_RADIUS_DEG", "0.5"),
            ("ALTITUDE_THRESHOLD_M", "1500"),
        ]);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.flight_feed_url, "http://localhost:9000/states");
        assert_eq!(config.flight_cache_ttl_s, 120);
        assert_eq!(config.feed_timeout_s, 5);
        assert_eq!(config.rules.prefilter_radius_deg, 0.5);
        assert_eq!(config.rules.altitude_threshold_m, 1500.0);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = config_from(&[
            ("AIRSPACE_PORT", "http"),
            ("FLIGHT_CACHE_TTL_SECS", "a minute"),
            ("FEED_TIMEOUT_SECS", "-3"),
            ("PREFILTER_RADIUS_DEG", "wide"),
        ]);
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.flight_cache_ttl_s, 60);
        assert_eq!(config.feed_timeout_s, 10);
        assert_eq!(config.rules.prefilter_radius_deg, 1.0);
    }

    #[test]
    fn zero_values_fall_back() {
        let config = config_from(&[
            ("AIRSPACE_PORT", "0"),
            ("FLIGHT_CACHE_TTL_SECS", "0"),
            ("FEED_TIMEOUT_SECS", "0"),
            ("ALTITUDE_THRESHOLD_M", "0"),
        ]);
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.flight_cache_ttl_s, 60);
        assert_eq!(config.feed_timeout_s, 10);
        assert_eq!(config.rules.altitude_threshold_m, 2000.0);
    }

    #[test]
    fn non_finite_rules_fall_back() {
        let config = config_from(&[
            ("PREFILTER_RADIUS_DEG", "inf"),
            ("ALTITUDE_THRESHOLD_M", "NaN"),
        ]);
        assert_eq!(config.rules, RiskRules::default());

        let config = config_from(&[("ALTITUDE_THRESHOLD_M", "-2000")]);
        assert_eq!(config.rules.altitude_threshold_m, 2000.0);
    }
}
