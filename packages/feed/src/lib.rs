#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Collaborators that feed the ranking engine.
//!
//! * [`decode`] turns USGS `GeoJSON` summary feeds into [`RawEvent`]s,
//!   skipping (and counting) structurally broken records.
//! * [`source`] defines the [`EventSource`] trait with an HTTP-backed USGS
//!   implementation and an offline file implementation.
//! * [`geolocation`] resolves the observer from an IP lookup service and
//!   falls back to a fixed location when that fails.
//! * [`config`] loads the TOML configuration.

pub mod config;
pub mod decode;
pub mod geolocation;
pub mod query;
pub mod retry;
pub mod source;

use quake_map_event_models::RawEvent;

pub use decode::parse_feed;
pub use query::{FeedPeriod, FeedQuery, MagnitudeBand};
pub use source::{EventSource, FileFeedSource, UsgsFeedSource};

/// Errors from fetching or decoding feeds.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document parsed but has the wrong shape.
    #[error("Malformed document: {message}")]
    Format {
        /// Description of what went wrong.
        message: String,
    },
}

/// One decoded feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedBatch {
    /// Feed title from the metadata block.
    pub title: String,
    /// Event count from the metadata block.
    pub count: usize,
    /// Usable events, in feed order.
    pub events: Vec<RawEvent>,
    /// Records dropped for missing place, id, or coordinates.
    pub skipped: usize,
}
