#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Text report for a ranked batch of seismic events.
//!
//! [`format_report`] produces the report as an ordered list of lines; the
//! caller decides where they go through a [`ReportSink`]. Column layout is
//! fixed so output is stable across runs:
//!
//! ```text
//! 4.50 centered 10km N of Somewhere, CA                       distance:  1234.57 miles at 2024-01-02 03:04:05
//! ```

pub mod sink;

use std::time::Duration;

use chrono::{FixedOffset, Offset as _, Utc};
use quake_map_analytics::{StatisticsError, StatisticsSummary};
use quake_map_event_models::{EnrichedEvent, Observer, SortField, SortKey};

pub use sink::{ReportSink, WriterSink};

/// Shown in place of statistics when the batch has no usable events.
pub const NO_DATA_MESSAGE: &str = "No events found, try widening the query";

/// Default report width in characters.
pub const DEFAULT_WIDTH: usize = 85;

/// Place column width; longer labels are cut to one less than this.
const PLACE_COLUMN: usize = 45;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Feed-level metadata shown in the first report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchHeader {
    /// Feed title (e.g. "USGS All Earthquakes, Past Day").
    pub title: String,
    /// Event count reported by the feed.
    pub count: usize,
    /// Records the decoder dropped as malformed.
    pub skipped: usize,
}

/// Presentation settings for one report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    /// Width that banners and statistics are centered in.
    pub width: usize,
    /// Events farther than this many miles are left out of the listing.
    pub max_distance: Option<f64>,
    /// Offset event times are shown in.
    pub offset: FixedOffset,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            max_distance: None,
            offset: Utc.fix(),
        }
    }
}

/// Formats the full report.
///
/// Always returns the feed header, the statistics block (or
/// [`NO_DATA_MESSAGE`]) and the sort banner, followed by one line per
/// event within `options.max_distance`. A non-zero `header.skipped` adds a
/// line right after the header.
#[must_use]
pub fn format_report(
    ranked: &[EnrichedEvent],
    stats: &Result<StatisticsSummary, StatisticsError>,
    observer: &Observer,
    key: SortKey,
    header: &BatchHeader,
    options: &ReportOptions,
) -> Vec<String> {
    let width = options.width;
    let mut lines = Vec::with_capacity(ranked.len() + 10);

    lines.push(format!(
        "Recorded total of {} events from {}",
        header.count, header.title
    ));
    if header.skipped > 0 {
        lines.push(format!("{} malformed records skipped", header.skipped));
    }

    lines.push(String::new());
    lines.push(format!("{:*^width$}", " [Event statistical analysis] "));
    lines.push(String::new());

    match stats {
        Ok(summary) => {
            lines.push(format!("{:^width$}", statistics_line(summary)));
            if let Some(strongest) = &summary.strongest {
                let biggest = format!(
                    "Strongest event was magnitude {:.2} at {}",
                    strongest.magnitude, strongest.place
                );
                lines.push(format!("{biggest:^width$}"));
            }
        }
        Err(StatisticsError::EmptyInput) => {
            lines.push(format!("{NO_DATA_MESSAGE:^width$}"));
        }
        Err(e) => {
            let unavailable = format!("Statistics unavailable: {e}");
            lines.push(format!("{unavailable:^width$}"));
        }
    }

    lines.push(String::new());
    lines.push(format!("{:*^width$}", sort_banner(observer, key)));
    lines.push(String::new());

    let mut hidden = 0usize;
    for event in ranked {
        if options.max_distance.is_some_and(|max| event.distance > max) {
            hidden += 1;
            continue;
        }
        lines.push(event_line(event, options.offset));
    }

    if let Some(max) = options.max_distance.filter(|_| hidden > 0) {
        log::debug!("Distance filter hid {hidden} events beyond {max} miles");
        lines.push(String::new());
        lines.push(format!("{hidden} events beyond {max:.0} miles not shown"));
    }

    lines
}

fn statistics_line(summary: &StatisticsSummary) -> String {
    format!(
        "Magnitude Max = {:.2}, Mean = {:.2}, Median = {:.2}, Mode = {:.2}",
        summary.max, summary.mean, summary.median, summary.mode
    )
}

fn sort_banner(observer: &Observer, key: SortKey) -> String {
    let direction = key.direction();
    match key.field {
        SortField::Magnitude => format!(" [Events sorted by MAGNITUDE, {direction}] "),
        SortField::Place => format!(" [Events sorted by LOCATION, {direction}] "),
        SortField::Time => format!(" [Events sorted by TIME, {direction}] "),
        SortField::Distance => {
            let from = observer_label(observer);
            format!(" [Events sorted by DISTANCE from {from}, {direction}] ")
        }
    }
}

/// Trailer with the time spent ranking and formatting.
#[must_use]
pub fn processing_line(elapsed: Duration) -> String {
    format!("Processed data in {:.2} seconds", elapsed.as_secs_f64())
}

/// Notice shown when the observer lookup fell back to `observer`.
#[must_use]
pub fn fallback_notice(observer: &Observer) -> String {
    format!(
        "Location lookup failed, using default location {}",
        observer_label(observer)
    )
}

/// `"City, Region, Country (lat, lon)"`, or just the coordinate.
fn observer_label(observer: &Observer) -> String {
    observer.describe().map_or_else(
        || observer.coordinate.to_string(),
        |name| format!("{name} {}", observer.coordinate),
    )
}

/// One listing line: magnitude, place column, distance, and local time
/// when known.
#[must_use]
pub fn event_line(event: &EnrichedEvent, offset: FixedOffset) -> String {
    let mut line = format!(
        "{:4.2} centered {:<width$.prec$} distance: {:>8.2} miles",
        event.magnitude,
        event.label(),
        event.distance,
        width = PLACE_COLUMN,
        prec = PLACE_COLUMN - 1,
    );

    if let Some(ts) = event.timestamp {
        line.push_str(" at ");
        line.push_str(&ts.with_timezone(&offset).format(TIME_FORMAT).to_string());
    }

    line
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use quake_map_analytics::summarize_events;
    use quake_map_event_models::Coordinate;

    use super::*;

    fn event(id: &str, magnitude: f64, place: &str, distance: f64) -> EnrichedEvent {
        EnrichedEvent {
            id: id.to_string(),
            magnitude,
            place: place.to_string(),
            display_place: None,
            distance,
            timestamp: None,
        }
    }

    fn header(count: usize) -> BatchHeader {
        BatchHeader {
            title: "USGS All Earthquakes, Past Day".to_string(),
            count,
            skipped: 0,
        }
    }

    #[test]
    fn empty_batch_reports_no_data_once() {
        let lines = format_report(
            &[],
            &Err(StatisticsError::EmptyInput),
            &Observer::fallback(),
            SortKey::ascending(SortField::Magnitude),
            &header(0),
            &ReportOptions {
                width: 80,
                ..ReportOptions::default()
            },
        );

        assert_eq!(
            lines[0],
            "Recorded total of 0 events from USGS All Earthquakes, Past Day"
        );
        assert_eq!(
            lines.iter().filter(|l| l.contains(NO_DATA_MESSAGE)).count(),
            1
        );
        assert!(lines.iter().any(|l| l.contains("[Events sorted by MAGNITUDE, ascending]")));
        assert!(!lines.iter().any(|l| l.contains("centered")));
    }

    #[test]
    fn skipped_records_are_reported() {
        let events = [event("a", 4.0, "Somewhere", 10.0)];
        let partial = BatchHeader {
            skipped: 2,
            ..header(3)
        };
        let lines = format_report(
            &events,
            &summarize_events(&events),
            &Observer::fallback(),
            SortKey::ascending(SortField::Magnitude),
            &partial,
            &ReportOptions::default(),
        );
        assert_eq!(
            lines[0],
            "Recorded total of 3 events from USGS All Earthquakes, Past Day"
        );
        assert_eq!(lines[1], "2 malformed records skipped");

        let lines = format_report(
            &events,
            &summarize_events(&events),
            &Observer::fallback(),
            SortKey::ascending(SortField::Magnitude),
            &header(1),
            &ReportOptions::default(),
        );
        assert!(!lines.iter().any(|l| l.contains("malformed")));
    }

    #[test]
    fn statistics_errors_other_than_empty_are_shown() {
        let lines = format_report(
            &[],
            &Err(StatisticsError::NonFiniteInput { index: 0 }),
            &Observer::fallback(),
            SortKey::ascending(SortField::Magnitude),
            &header(0),
            &ReportOptions::default(),
        );
        assert!(lines.iter().any(|l| l.trim()
            == "Statistics unavailable: magnitude value at index 0 is not finite"));
        assert!(!lines.iter().any(|l| l.contains(NO_DATA_MESSAGE)));
    }

    #[test]
    fn trailer_and_fallback_lines() {
        assert_eq!(
            processing_line(Duration::from_millis(1250)),
            "Processed data in 1.25 seconds"
        );
        assert_eq!(
            fallback_notice(&Observer::fallback()),
            "Location lookup failed, using default location Dallas, Texas, US (32.7787, -96.8217)"
        );
    }

    #[test]
    fn banners_fill_width() {
        let lines = format_report(
            &[],
            &Err(StatisticsError::EmptyInput),
            &Observer::fallback(),
            SortKey::descending(SortField::Time),
            &header(0),
            &ReportOptions::default(),
        );
        let banner = lines.iter().find(|l| l.contains("TIME")).unwrap();
        assert_eq!(banner.chars().count(), DEFAULT_WIDTH);
        assert!(banner.starts_with('*') && banner.ends_with('*'));
        assert!(banner.contains(" [Events sorted by TIME, descending] "));
    }

    #[test]
    fn statistics_block_and_strongest_event() {
        let events = [
            event("a", 5.0, "Alpha", 10.0),
            event("b", 3.0, "Bravo", 20.0),
            event("c", 5.0, "Charlie", 30.0),
        ];
        let stats = summarize_events(&events);
        let lines = format_report(
            &events,
            &stats,
            &Observer::fallback(),
            SortKey::descending(SortField::Magnitude),
            &header(3),
            &ReportOptions::default(),
        );

        let stats_line = lines.iter().find(|l| l.contains("Magnitude Max")).unwrap();
        assert_eq!(
            stats_line.trim(),
            "Magnitude Max = 5.00, Mean = 4.33, Median = 5.00, Mode = 5.00"
        );
        assert!(lines.iter().any(|l| l.trim() == "Strongest event was magnitude 5.00 at Charlie"));
        assert!(!lines.iter().any(|l| l.contains(NO_DATA_MESSAGE)));
        assert_eq!(lines.iter().filter(|l| l.contains(" centered ")).count(), 3);
    }

    #[test]
    fn distance_banner_names_observer() {
        let lines = format_report(
            &[],
            &Err(StatisticsError::EmptyInput),
            &Observer::fallback(),
            SortKey::ascending(SortField::Distance),
            &header(0),
            &ReportOptions::default(),
        );
        assert!(lines.iter().any(|l| l.contains(
            "[Events sorted by DISTANCE from Dallas, Texas, US (32.7787, -96.8217), ascending]"
        )));

        let bare = Observer::at(Coordinate::new(1.5, -2.5).unwrap());
        let lines = format_report(
            &[],
            &Err(StatisticsError::EmptyInput),
            &bare,
            SortKey::ascending(SortField::Distance),
            &header(0),
            &ReportOptions::default(),
        );
        assert!(lines.iter().any(|l| l.contains("from (1.5, -2.5), ascending]")));
    }

    #[test]
    fn event_line_layout() {
        let line = event_line(&event("a", 4.5, "Test", 12.5), Utc.fix());
        assert_eq!(
            line,
            format!("4.50 centered {:<45} distance:    12.50 miles", "Test")
        );
    }

    #[test]
    fn event_line_truncates_long_places() {
        let long = "x".repeat(60);
        let line = event_line(&event("a", 1.0, &long, 1.0), Utc.fix());
        let expected_place = format!("{} ", "x".repeat(44));
        assert!(line.contains(&format!("centered {expected_place} distance:")));
    }

    #[test]
    fn event_line_shows_time_in_offset() {
        let mut e = event("a", 2.0, "Somewhere", 100.0);
        e.timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single();
        assert!(event_line(&e, Utc.fix()).ends_with(" miles at 2024-01-02 03:04:05"));

        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        assert!(event_line(&e, minus_five).ends_with(" at 2024-01-01 22:04:05"));
    }

    #[test]
    fn distance_filter_hides_far_events() {
        let events = [
            event("near", 2.0, "Near", 100.0),
            event("far", 6.0, "Far", 9000.0),
        ];
        let stats = summarize_events(&events);
        let lines = format_report(
            &events,
            &stats,
            &Observer::fallback(),
            SortKey::ascending(SortField::Distance),
            &header(2),
            &ReportOptions {
                max_distance: Some(5000.0),
                ..ReportOptions::default()
            },
        );

        let listed: Vec<&String> = lines.iter().filter(|l| l.contains(" centered ")).collect();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].contains("Near"));
        assert_eq!(lines.last().unwrap(), "1 events beyond 5000 miles not shown");
        // Statistics still cover the whole batch.
        assert!(lines.iter().any(|l| l.contains("Max = 6.00")));
    }
}
