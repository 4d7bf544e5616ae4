//! Configuration loading.
//!
//! Defaults live in `config/default.toml` and are embedded at compile
//! time. A user file is merged over them key by key, so it only needs to
//! name the settings it changes.

use std::path::{Path, PathBuf};

use quake_map_event_models::{Coordinate, CoordinateError, Observer};
use serde::Deserialize;

/// Environment variable naming a config file to load when none is given
/// explicitly.
pub const CONFIG_ENV_VAR: &str = "QUAKE_MAP_CONFIG";

const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has wrong types.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The fallback observer location is out of range.
    #[error("Invalid fallback observer: {0}")]
    Observer(#[from] CoordinateError),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuakeMapConfig {
    /// Event feed endpoint.
    pub feed: FeedConfig,
    /// IP geolocation lookup.
    pub geolocation: GeolocationConfig,
    /// Observer used when geolocation is off or fails.
    pub fallback_observer: FallbackObserver,
    /// Report layout.
    pub report: ReportConfig,
}

/// Event feed endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    /// Summary feed directory URL.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for transient failures.
    pub max_retries: u32,
}

/// IP geolocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeolocationConfig {
    /// Whether to look the observer up at all.
    pub enabled: bool,
    /// Lookup service URL.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Fixed observer location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FallbackObserver {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// City name.
    pub city: Option<String>,
    /// Region or state.
    pub region: Option<String>,
    /// Country code.
    pub country: Option<String>,
}

impl FallbackObserver {
    /// Converts to an [`Observer`].
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] if the location is out of range.
    pub fn to_observer(&self) -> Result<Observer, CoordinateError> {
        Ok(Observer {
            coordinate: Coordinate::new(self.latitude, self.longitude)?,
            city: self.city.clone(),
            region: self.region.clone(),
            country: self.country.clone(),
        })
    }
}

/// Report layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ReportConfig {
    /// Banner/centering width.
    pub width: usize,
    /// Hide events farther than this many miles.
    pub max_distance: Option<f64>,
}

impl QuakeMapConfig {
    /// The built-in defaults.
    ///
    /// # Panics
    ///
    /// Panics if the embedded default TOML is malformed (a build-time
    /// guarantee since the file is embedded).
    #[must_use]
    pub fn embedded() -> Self {
        toml::from_str(DEFAULT_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
    }

    /// Parses `overrides` and merges it over the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either document is invalid or the fallback
    /// observer is out of range.
    pub fn from_toml_str(overrides: &str) -> Result<Self, ConfigError> {
        let mut merged: toml::Table = DEFAULT_TOML.parse()?;
        let overrides: toml::Table = overrides.parse()?;
        merge_tables(&mut merged, overrides);

        let config: Self = toml::Value::Table(merged).try_into()?;
        config.fallback_observer.to_observer()?;
        Ok(config)
    }

    /// Loads and merges the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Loads `explicit` if given, else the file named by
    /// [`CONFIG_ENV_VAR`], else the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named file cannot be read or is invalid.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Ok(Self::embedded()),
        }
    }
}

/// Recursively overlays `overrides` onto `base`. Nested tables merge;
/// any other value replaces.
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
