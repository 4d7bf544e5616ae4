#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic helpers for ranking seismic events.
//!
//! [`distance`] measures great-circle distance in miles between an
//! observer and an epicenter. [`place`] rewrites feed place text into a
//! "largest region first" display form.

pub mod distance;
pub mod place;

pub use distance::{EARTH_RADIUS_MILES, distance};
pub use place::normalize as normalize_place;
