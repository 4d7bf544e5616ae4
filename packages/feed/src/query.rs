//! USGS summary feed selection.
//!
//! Summary feeds are published per magnitude band and time window, e.g.
//! `2.5_day.geojson` or `significant_week.geojson`.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Time window covered by a summary feed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FeedPeriod {
    /// Past hour.
    Hour,
    /// Past day.
    #[default]
    Day,
    /// Past 7 days.
    Week,
    /// Past 30 days.
    Month,
}

/// Minimum magnitude band of a summary feed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum MagnitudeBand {
    /// Events flagged significant by USGS.
    #[serde(rename = "significant")]
    #[strum(to_string = "significant")]
    Significant,
    /// M4.5 and above.
    #[serde(rename = "4.5")]
    #[strum(to_string = "4.5")]
    M4_5,
    /// M2.5 and above.
    #[serde(rename = "2.5")]
    #[strum(to_string = "2.5")]
    M2_5,
    /// M1.0 and above.
    #[default]
    #[serde(rename = "1.0")]
    #[strum(to_string = "1.0")]
    M1_0,
    /// Every recorded event.
    #[serde(rename = "all")]
    #[strum(to_string = "all")]
    All,
}

/// A summary feed to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedQuery {
    /// Magnitude band.
    pub band: MagnitudeBand,
    /// Time window.
    pub period: FeedPeriod,
}

impl FeedQuery {
    /// Full feed URL under `base_url`.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        format!("{base}/{}_{}.geojson", self.band, self.period)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const BASE: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/";

    #[test]
    fn builds_summary_urls() {
        let query = FeedQuery::default();
        assert_eq!(
            query.url(BASE),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/1.0_day.geojson"
        );

        let query = FeedQuery {
            band: MagnitudeBand::Significant,
            period: FeedPeriod::Month,
        };
        assert_eq!(
            query.url(BASE.trim_end_matches('/')),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/significant_month.geojson"
        );
    }

    #[test]
    fn parses_band_and_period_names() {
        assert_eq!(MagnitudeBand::from_str("4.5").unwrap(), MagnitudeBand::M4_5);
        assert_eq!(MagnitudeBand::from_str("ALL").unwrap(), MagnitudeBand::All);
        assert!(MagnitudeBand::from_str("3.0").is_err());
        assert_eq!(FeedPeriod::from_str("Week").unwrap(), FeedPeriod::Week);
        assert_eq!(MagnitudeBand::M2_5.to_string(), "2.5");
    }
}
