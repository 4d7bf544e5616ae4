//! USGS `GeoJSON` summary feed decoding.
//!
//! See <https://earthquake.usgs.gov/earthquakes/feed/v1.0/geojson.php>.
//!
//! Each feature is decoded on its own so one bad record never fails the
//! whole feed. A bad or missing `mag` is kept and coerced later; a
//! missing id, place, or usable coordinate pair drops the record and
//! bumps [`FeedBatch::skipped`].

use chrono::DateTime;
use quake_map_event_models::{Coordinate, CoordinateError, RawEvent, RawMagnitude};
use serde::Deserialize;

use crate::{FeedBatch, FeedError};

/// Title used when the feed has no metadata block.
pub const DEFAULT_TITLE: &str = "USGS earthquake feed";

#[derive(Deserialize)]
struct FeedDocument {
    metadata: Option<FeedMetadata>,
    features: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct FeedMetadata {
    count: Option<usize>,
    title: Option<String>,
}

#[derive(Deserialize)]
struct FeedFeature {
    id: Option<String>,
    #[serde(default)]
    properties: FeedProperties,
    geometry: Option<FeedGeometry>,
}

#[derive(Default, Deserialize)]
struct FeedProperties {
    #[serde(default)]
    mag: serde_json::Value,
    place: Option<String>,
    #[serde(default)]
    time: serde_json::Value,
}

#[derive(Deserialize)]
struct FeedGeometry {
    #[serde(default)]
    coordinates: Vec<serde_json::Value>,
}

/// Why a record was dropped.
#[derive(Debug, thiserror::Error)]
enum SkipReason {
    #[error("record is not a valid feature: {0}")]
    Undecodable(serde_json::Error),
    #[error("missing id")]
    MissingId,
    #[error("missing place")]
    MissingPlace,
    #[error("missing or short coordinates")]
    MissingCoordinates,
    #[error("{0}")]
    InvalidCoordinate(CoordinateError),
}

/// Decodes a feed document.
///
/// # Errors
///
/// Returns [`FeedError::Json`] if `bytes` is not JSON or has no
/// `features` array. Individual broken records are skipped, not errors.
pub fn parse_feed(bytes: &[u8]) -> Result<FeedBatch, FeedError> {
    let document: FeedDocument = serde_json::from_slice(bytes)?;

    let mut events = Vec::with_capacity(document.features.len());
    let mut skipped = 0usize;

    for (index, feature) in document.features.iter().enumerate() {
        match decode_feature(feature) {
            Ok(event) => events.push(event),
            Err(reason) => {
                skipped += 1;
                let id = feature
                    .get("id")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("<none>");
                log::warn!("Skipping feed record #{index} (id {id}): {reason}");
            }
        }
    }

    let (title, count) = document.metadata.map_or((None, None), |m| (m.title, m.count));

    Ok(FeedBatch {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        count: count.unwrap_or(document.features.len()),
        events,
        skipped,
    })
}

fn decode_feature(value: &serde_json::Value) -> Result<RawEvent, SkipReason> {
    let feature =
        FeedFeature::deserialize(value).map_err(SkipReason::Undecodable)?;

    let id = feature
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or(SkipReason::MissingId)?;

    let place = feature.properties.place.ok_or(SkipReason::MissingPlace)?;

    let coordinates = feature
        .geometry
        .map(|g| g.coordinates)
        .unwrap_or_default();

    // Feed order is [longitude, latitude, depth].
    let (Some(lon), Some(lat)) = (
        coordinates.first().and_then(serde_json::Value::as_f64),
        coordinates.get(1).and_then(serde_json::Value::as_f64),
    ) else {
        return Err(SkipReason::MissingCoordinates);
    };
    let coordinate = Coordinate::new(lat, lon).map_err(SkipReason::InvalidCoordinate)?;

    Ok(RawEvent {
        id,
        magnitude: raw_magnitude(feature.properties.mag),
        place,
        coordinate,
        timestamp: feature
            .properties
            .time
            .as_i64()
            .and_then(DateTime::from_timestamp_millis),
    })
}

fn raw_magnitude(value: serde_json::Value) -> RawMagnitude {
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .map_or(RawMagnitude::Missing, RawMagnitude::Number),
        serde_json::Value::String(s) => RawMagnitude::Text(s),
        _ => RawMagnitude::Missing,
    }
}
