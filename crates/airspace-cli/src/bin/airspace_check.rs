//! CLI tool to run one proximity check against the live balloon and
//! aircraft feeds and print the alerts as JSON.

use airspace_cli::run_check;
use airspace_core::{RiskRules, PREFILTER_RADIUS_DEG};
use airspace_feeds::{
    BalloonFeed, FeedClient, FlightFeed, DEFAULT_BALLOON_FEED_URL, DEFAULT_FLIGHT_FEED_URL,
};
use clap::Parser;
use std::time::Duration;

/// Check live aircraft against high-altitude balloons
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Balloon feed URL
    #[arg(long, env = "BALLOON_FEED_URL", default_value = DEFAULT_BALLOON_FEED_URL)]
    balloon_url: String,

    /// Aircraft state-vector feed URL
    #[arg(long, env = "FLIGHT_FEED_URL", default_value = DEFAULT_FLIGHT_FEED_URL)]
    flight_url: String,

    /// Alert when altitudes differ by less than this (meters)
    #[arg(long, default_value_t = 2000.0)]
    altitude_threshold: f64,

    /// Planar pre-filter radius in degrees
    #[arg(long, default_value_t = PREFILTER_RADIUS_DEG)]
    radius: f64,

    /// Upstream request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    if !args.altitude_threshold.is_finite() || args.altitude_threshold <= 0.0 {
        anyhow::bail!("--altitude-threshold must be a positive number");
    }
    if !args.radius.is_finite() || args.radius <= 0.0 {
        anyhow::bail!("--radius must be a positive number");
    }

    let client = FeedClient::new(Duration::from_secs(args.timeout.max(1)))?;
    let balloons = BalloonFeed::new(client.clone(), &args.balloon_url)?;
    let flights = FlightFeed::new(client, &args.flight_url)?;

    let rules = RiskRules {
        prefilter_radius_deg: args.radius,
        altitude_threshold_m: args.altitude_threshold,
    };
    let report = run_check(&balloons, &flights, rules).await;

    let output = if args.pretty {
        serde_json::to_string_pretty(&report.alerts)?
    } else {
        serde_json::to_string(&report.alerts)?
    };
    println!("{}", output);
    eprintln!("{}", report.summary_line());

    Ok(())
}
