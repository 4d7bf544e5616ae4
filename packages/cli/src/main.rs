#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the quake map.
//!
//! Fetches one USGS summary feed (or reads a saved one), ranks its events
//! relative to the observer, and prints the statistics and listing to
//! stdout.
//!
//! Uses `indicatif-log-bridge` (via [`quake_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and spinners never fight for the terminal.

mod observer;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Local, Offset};
use clap::Parser;
use quake_map_cli_utils::Spinner;
use quake_map_event_models::{SortField, SortKey};
use quake_map_feed::config::QuakeMapConfig;
use quake_map_feed::{
    EventSource, FeedPeriod, FeedQuery, FileFeedSource, MagnitudeBand, UsgsFeedSource,
};
use quake_map_report::{BatchHeader, ReportOptions, ReportSink, WriterSink};

use crate::observer::ObserverChoice;

#[derive(Parser, Debug)]
#[command(name = "quake_map", about = "Rank and summarize recent earthquakes")]
struct Cli {
    /// Time window of the feed (hour, day, week, month)
    #[arg(long, default_value_t = FeedPeriod::Day)]
    period: FeedPeriod,

    /// Minimum magnitude band (significant, 4.5, 2.5, 1.0, all)
    #[arg(long, default_value_t = MagnitudeBand::M1_0)]
    magnitude: MagnitudeBand,

    /// Field to order events by (magnitude, place, distance, time)
    #[arg(long, default_value_t = SortField::Magnitude)]
    sort: SortField,

    /// Largest values first
    #[arg(long)]
    descending: bool,

    /// Report width (defaults to the config value)
    #[arg(long)]
    width: Option<usize>,

    /// Hide events farther than this many miles
    #[arg(long)]
    max_distance: Option<f64>,

    /// Read a saved `GeoJSON` feed instead of downloading one
    #[arg(long)]
    feed_file: Option<PathBuf>,

    /// Observer latitude (requires --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Observer longitude (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Skip IP geolocation and use the configured fallback location
    #[arg(long)]
    no_geolocate: bool,

    /// Config file merged over the built-in defaults (else $QUAKE_MAP_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    const fn sort_key(&self) -> SortKey {
        SortKey {
            field: self.sort,
            descending: self.descending,
        }
    }

    fn report_options(&self, config: &QuakeMapConfig) -> ReportOptions {
        ReportOptions {
            width: self.width.unwrap_or(config.report.width),
            max_distance: self.max_distance.or(config.report.max_distance),
            offset: Local::now().offset().fix(),
        }
    }

    fn event_source(
        &self,
        client: &reqwest::Client,
        config: &QuakeMapConfig,
    ) -> Box<dyn EventSource> {
        match &self.feed_file {
            Some(path) => Box::new(FileFeedSource::new(path.clone())),
            None => Box::new(UsgsFeedSource::new(
                client.clone(),
                &config.feed,
                FeedQuery {
                    band: self.magnitude,
                    period: self.period,
                },
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = quake_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = QuakeMapConfig::resolve(cli.config.as_deref())?;
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.feed.timeout_secs))
        .build()?;

    let choice = ObserverChoice::from_flags(
        cli.lat,
        cli.lon,
        cli.no_geolocate,
        config.geolocation.enabled,
    );
    let resolved = observer::resolve(choice, &config, &client, &multi).await?;
    let observer = resolved.observer;

    let source = cli.event_source(&client, &config);
    let spinner = Spinner::start(&multi, &format!("Fetching {}", source.describe()));
    let batch = source.fetch().await;
    spinner.finish();
    let batch = batch?;

    if batch.skipped > 0 {
        log::warn!(
            "Skipped {} malformed records from {}",
            batch.skipped,
            source.describe()
        );
    }

    let start = Instant::now();
    let key = cli.sort_key();
    let ranked = quake_map_ranking::rank(&batch.events, &observer, key);
    let stats = quake_map_analytics::summarize_events(&ranked);
    let header = BatchHeader {
        title: batch.title,
        count: batch.count,
        skipped: batch.skipped,
    };
    let mut lines = Vec::new();
    if resolved.fell_back {
        lines.push(quake_map_report::fallback_notice(&observer));
    }
    lines.extend(quake_map_report::format_report(
        &ranked,
        &stats,
        &observer,
        key,
        &header,
        &cli.report_options(&config),
    ));
    let elapsed = start.elapsed();
    log::info!("Processed {} events in {elapsed:?}", ranked.len());
    lines.push(String::new());
    lines.push(quake_map_report::processing_line(elapsed));

    let mut sink = WriterSink::new(std::io::stdout().lock());
    sink.write_lines(&lines)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["quake_map"]).unwrap();
        assert_eq!(cli.period, FeedPeriod::Day);
        assert_eq!(cli.magnitude, MagnitudeBand::M1_0);
        assert_eq!(cli.sort_key(), SortKey::ascending(SortField::Magnitude));

        let options = cli.report_options(&QuakeMapConfig::embedded());
        assert_eq!(options.width, 85);
        assert_eq!(options.max_distance, None);
    }

    #[test]
    fn parses_query_and_sort_flags() {
        let cli = Cli::try_parse_from([
            "quake_map",
            "--period",
            "week",
            "--magnitude",
            "4.5",
            "--sort",
            "location",
            "--descending",
            "--lat",
            "-33.9",
            "--lon",
            "151.2",
            "--max-distance",
            "2500",
        ])
        .unwrap();

        assert_eq!(cli.period, FeedPeriod::Week);
        assert_eq!(cli.magnitude, MagnitudeBand::M4_5);
        assert_eq!(cli.sort_key(), SortKey::descending(SortField::Place));
        assert_eq!(cli.lat, Some(-33.9));
        assert_eq!(
            cli.report_options(&QuakeMapConfig::embedded()).max_distance,
            Some(2500.0)
        );
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["quake_map", "--lat", "10"]).is_err());
        assert!(Cli::try_parse_from(["quake_map", "--sort", "depth"]).is_err());
    }

    #[test]
    fn feed_file_selects_file_source() {
        let cli = Cli::try_parse_from(["quake_map", "--feed-file", "saved.geojson"]).unwrap();
        let source = cli.event_source(&reqwest::Client::new(), &QuakeMapConfig::embedded());
        assert_eq!(source.describe(), "saved.geojson");
    }
}
