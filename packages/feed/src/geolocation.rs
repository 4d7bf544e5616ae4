//! Observer lookup from an IP geolocation service (ipinfo.io style).
//!
//! The service answers with `{ "loc": "lat,long", "city", "region",
//! "country", ... }`. Some callers hand over records where `loc` is
//! already split into `[lat, long]`; both shapes are accepted.
//!
//! Geolocation is best effort. [`locate`] never fails: any error is logged
//! and the configured fallback observer is used instead.

use std::time::Duration;

use quake_map_event_models::{Coordinate, Observer};
use serde::Deserialize;

use crate::FeedError;

#[derive(Deserialize)]
struct GeolocationRecord {
    loc: Option<LocField>,
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocField {
    Joined(String),
    Split(Vec<LocPart>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocPart {
    Number(f64),
    Text(String),
}

impl LocPart {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Parses a geolocation record into an [`Observer`].
///
/// # Errors
///
/// Returns [`FeedError::Json`] for invalid JSON and [`FeedError::Format`]
/// if `loc` is missing, malformed, or out of range.
pub fn parse_geolocation(bytes: &[u8]) -> Result<Observer, FeedError> {
    let record: GeolocationRecord = serde_json::from_slice(bytes)?;

    let (lat, lon) = match record.loc {
        Some(LocField::Joined(s)) => {
            let mut parts = s.split(',').map(|p| p.trim().parse::<f64>().ok());
            match (parts.next().flatten(), parts.next().flatten(), parts.next()) {
                (Some(lat), Some(lon), None) => (lat, lon),
                _ => return Err(format_error(format!("unparseable loc \"{s}\""))),
            }
        }
        Some(LocField::Split(parts)) => match parts.as_slice() {
            [lat, lon] => match (lat.value(), lon.value()) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => return Err(format_error("non-numeric loc entry".to_string())),
            },
            _ => {
                return Err(format_error(format!(
                    "loc has {} entries, expected 2",
                    parts.len()
                )));
            }
        },
        None => return Err(format_error("missing loc".to_string())),
    };

    let coordinate =
        Coordinate::new(lat, lon).map_err(|e| format_error(format!("loc out of range: {e}")))?;

    Ok(Observer {
        coordinate,
        city: record.city,
        region: record.region,
        country: record.country,
    })
}

const fn format_error(message: String) -> FeedError {
    FeedError::Format { message }
}

/// Looks up the caller's location at `url`.
///
/// Returns a clone of `fallback` if the request fails, times out, or the
/// response cannot be parsed.
pub async fn locate(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    fallback: &Observer,
) -> Observer {
    match fetch_observer(client, url, timeout).await {
        Ok(observer) => {
            log::info!(
                "Located observer at {} ({})",
                observer.coordinate,
                observer.describe().unwrap_or_default()
            );
            observer
        }
        Err(e) => {
            log::warn!("Geolocation via {url} unavailable ({e}), using default location");
            fallback.clone()
        }
    }
}

async fn fetch_observer(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Observer, FeedError> {
    let response = client.get(url).timeout(timeout).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.bytes().await?;
    parse_geolocation(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_joined_loc() {
        let body = br#"{
            "ip": "203.0.113.7",
            "city": "Portland",
            "region": "Oregon",
            "country": "US",
            "loc": "45.5152,-122.6784",
            "postal": "97201"
        }"#;
        let observer = parse_geolocation(body).unwrap();
        assert!((observer.coordinate.latitude() - 45.5152).abs() < 1e-9);
        assert!((observer.coordinate.longitude() - -122.6784).abs() < 1e-9);
        assert_eq!(observer.describe().as_deref(), Some("Portland, Oregon, US"));
    }

    #[test]
    fn parses_split_loc() {
        let observer =
            parse_geolocation(br#"{"loc": ["32.7787", "-96.8217"], "city": "Dallas"}"#).unwrap();
        assert!((observer.coordinate.latitude() - 32.7787).abs() < 1e-9);
        assert_eq!(observer.city.as_deref(), Some("Dallas"));
        assert_eq!(observer.region, None);

        let observer = parse_geolocation(br#"{"loc": [10.5, 20.25]}"#).unwrap();
        assert!((observer.coordinate.longitude() - 20.25).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_loc() {
        for body in [
            &br#"{"city": "Nowhere"}"#[..],
            br#"{"loc": "45.5"}"#,
            br#"{"loc": "a,b"}"#,
            br#"{"loc": "1,2,3"}"#,
            br#"{"loc": ["1"]}"#,
            br#"{"loc": "95.0,10.0"}"#,
        ] {
            assert!(
                matches!(parse_geolocation(body), Err(FeedError::Format { .. })),
                "accepted {}",
                String::from_utf8_lossy(body)
            );
        }
        assert!(matches!(parse_geolocation(b"<html>"), Err(FeedError::Json(_))));
    }
}
