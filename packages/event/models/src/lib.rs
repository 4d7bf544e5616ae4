#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Seismic event types shared across the quake-map crates.
//!
//! Raw events come straight from the feed decoder and are never mutated.
//! The ranking pass turns them into [`EnrichedEvent`]s relative to an
//! [`Observer`], ordered by a [`SortKey`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    /// Latitude not finite or outside `[-90, 90]`.
    #[error("invalid latitude {0}: expected -90..=90")]
    Latitude(f64),
    /// Longitude not finite or outside `[-180, 180]`.
    #[error("invalid longitude {0}: expected -180..=180")]
    Longitude(f64),
}

/// A point on the Earth's surface in decimal degrees.
///
/// Always within range; the only way to build one is [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] if either value is non-finite or out of
    /// range. Values are never clamped.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// The magnitude value exactly as the feed supplied it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawMagnitude {
    /// A JSON number.
    Number(f64),
    /// A string, which may or may not hold a number.
    Text(String),
    /// `null`, absent, or some other JSON type.
    #[default]
    Missing,
}

impl RawMagnitude {
    /// Coerces the raw value to a magnitude.
    ///
    /// Finite numbers pass through and numeric text is parsed. Anything
    /// else, including `NaN` and infinities, becomes `0.0`.
    #[must_use]
    pub fn coerce(&self) -> f64 {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Self::Missing => 0.0,
        };
        if value.is_finite() { value } else { 0.0 }
    }
}

/// A single event as decoded from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// Feed-assigned unique event id.
    pub id: String,
    /// Magnitude as supplied; read it through [`RawEvent::magnitude_value`].
    pub magnitude: RawMagnitude,
    /// Free-text place description (e.g. "5km N of Ridgecrest, CA").
    pub place: String,
    /// Epicenter.
    pub coordinate: Coordinate,
    /// Origin time, when the feed provides one.
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawEvent {
    /// The coerced magnitude. Every reader of magnitude goes through here.
    #[must_use]
    pub fn magnitude_value(&self) -> f64 {
        self.magnitude.coerce()
    }
}

/// An event enriched relative to an observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent {
    /// Feed-assigned unique event id.
    pub id: String,
    /// Coerced magnitude.
    pub magnitude: f64,
    /// Place text as supplied by the feed.
    pub place: String,
    /// Normalized place, only set when ranking by place.
    pub display_place: Option<String>,
    /// Great-circle distance from the observer in miles.
    pub distance: f64,
    /// Origin time, when known.
    pub timestamp: Option<DateTime<Utc>>,
}

impl EnrichedEvent {
    /// The place text to show: normalized if available, raw otherwise.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_place.as_deref().unwrap_or(&self.place)
    }
}

/// The field an event list is ordered by.
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
pub enum SortField {
    /// Coerced magnitude.
    #[default]
    Magnitude,
    /// Normalized place name.
    #[strum(to_string = "place", serialize = "location")]
    #[serde(alias = "location")]
    Place,
    /// Distance from the observer.
    Distance,
    /// Origin time.
    Time,
}

/// Ordering selector for one ranking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortKey {
    /// Field to order by.
    pub field: SortField,
    /// Largest first when `true`.
    pub descending: bool,
}

impl SortKey {
    /// Ascending order on `field`.
    #[must_use]
    pub const fn ascending(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    /// Descending order on `field`.
    #[must_use]
    pub const fn descending(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// `"ascending"` or `"descending"`.
    #[must_use]
    pub const fn direction(&self) -> &'static str {
        if self.descending {
            "descending"
        } else {
            "ascending"
        }
    }
}

/// The reference location distances are measured from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    /// Reference point.
    pub coordinate: Coordinate,
    /// City name, for report headers only.
    pub city: Option<String>,
    /// Region or state name.
    pub region: Option<String>,
    /// Country code.
    pub country: Option<String>,
}

/// Latitude of the built-in fallback observer (Dallas, TX).
pub const FALLBACK_LATITUDE: f64 = 32.7787;
/// Longitude of the built-in fallback observer (Dallas, TX).
pub const FALLBACK_LONGITUDE: f64 = -96.8217;

impl Observer {
    /// An observer with no descriptive fields.
    #[must_use]
    pub const fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            city: None,
            region: None,
            country: None,
        }
    }

    /// The fixed location used when geolocation is unavailable.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            coordinate: Coordinate {
                latitude: FALLBACK_LATITUDE,
                longitude: FALLBACK_LONGITUDE,
            },
            city: Some("Dallas".to_string()),
            region: Some("Texas".to_string()),
            country: Some("US".to_string()),
        }
    }

    /// Comma-joined city/region/country, skipping absent or blank parts.
    ///
    /// Returns `None` when no part is known.
    #[must_use]
    pub fn describe(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}
