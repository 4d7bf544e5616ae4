//! Picks the observer distances are measured from.

use std::time::Duration;

use quake_map_cli_utils::{MultiProgress, Spinner};
use quake_map_event_models::{Coordinate, CoordinateError, Observer};
use quake_map_feed::config::QuakeMapConfig;
use quake_map_feed::geolocation;

/// How the observer should be found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObserverChoice {
    /// Explicit coordinates from the command line.
    Fixed { latitude: f64, longitude: f64 },
    /// The configured fallback location, no lookup.
    Fallback,
    /// IP geolocation, falling back on failure.
    Geolocate,
}

impl ObserverChoice {
    /// Coordinates win over everything; geolocation runs only when neither
    /// the flag nor the config turns it off.
    #[must_use]
    pub const fn from_flags(
        lat: Option<f64>,
        lon: Option<f64>,
        no_geolocate: bool,
        geolocation_enabled: bool,
    ) -> Self {
        match (lat, lon) {
            (Some(latitude), Some(longitude)) => Self::Fixed {
                latitude,
                longitude,
            },
            _ if no_geolocate || !geolocation_enabled => Self::Fallback,
            _ => Self::Geolocate,
        }
    }
}

/// The observer a run measures from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedObserver {
    /// Where distances are measured from.
    pub observer: Observer,
    /// `true` when a geolocation lookup failed and the fallback was used.
    pub fell_back: bool,
}

/// Resolves `choice` into an [`Observer`].
///
/// # Errors
///
/// Returns [`CoordinateError`] if explicit or configured coordinates are out
/// of range. Geolocation failures are not errors.
pub async fn resolve(
    choice: ObserverChoice,
    config: &QuakeMapConfig,
    client: &reqwest::Client,
    multi: &MultiProgress,
) -> Result<ResolvedObserver, CoordinateError> {
    match choice {
        ObserverChoice::Fixed {
            latitude,
            longitude,
        } => Ok(ResolvedObserver {
            observer: Observer::at(Coordinate::new(latitude, longitude)?),
            fell_back: false,
        }),
        ObserverChoice::Fallback => Ok(ResolvedObserver {
            observer: config.fallback_observer.to_observer()?,
            fell_back: false,
        }),
        ObserverChoice::Geolocate => {
            let fallback = config.fallback_observer.to_observer()?;
            let spinner = Spinner::start(multi, "Locating observer");
            let observer = geolocation::locate(
                client,
                &config.geolocation.url,
                Duration::from_secs(config.geolocation.timeout_secs),
                &fallback,
            )
            .await;
            spinner.finish();
            Ok(ResolvedObserver {
                fell_back: observer == fallback,
                observer,
            })
        }
    }
}
