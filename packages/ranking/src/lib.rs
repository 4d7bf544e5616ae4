#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Event ranking.
//!
//! Turns a batch of [`RawEvent`]s into [`EnrichedEvent`]s measured from an
//! [`Observer`], then orders them by a [`SortKey`]. The sort is stable in
//! both directions: events that compare equal keep their batch order.
//!
//! Ranking never drops an event: the output holds exactly the input ids.

use std::cmp::Ordering;

use quake_map_event_models::{EnrichedEvent, Observer, RawEvent, SortField, SortKey};
use quake_map_geography::{distance, normalize_place};

/// Enriches and orders `raw_events` for display.
///
/// Returns an empty vector for an empty batch.
#[must_use]
pub fn rank(raw_events: &[RawEvent], observer: &Observer, key: SortKey) -> Vec<EnrichedEvent> {
    let mut events: Vec<EnrichedEvent> = raw_events
        .iter()
        .map(|raw| enrich(raw, observer, key))
        .collect();

    sort_events(&mut events, key);

    log::debug!(
        "Ranked {} events by {} ({})",
        events.len(),
        key.field,
        key.direction()
    );

    events
}

/// Builds the enriched form of one event.
///
/// The place is only normalized when ranking by place; every other mode
/// shows the feed's text untouched.
#[must_use]
pub fn enrich(raw: &RawEvent, observer: &Observer, key: SortKey) -> EnrichedEvent {
    let display_place = match key.field {
        SortField::Place => Some(normalize_place(&raw.place)),
        SortField::Magnitude | SortField::Distance | SortField::Time => None,
    };

    EnrichedEvent {
        id: raw.id.clone(),
        magnitude: raw.magnitude_value(),
        place: raw.place.clone(),
        display_place,
        distance: distance(observer.coordinate, raw.coordinate),
        timestamp: raw.timestamp,
    }
}

/// Stable-sorts `events` by `key`.
///
/// Descending order reverses the slice, sorts ascending, and reverses
/// again, so ties stay in batch order either way. Events without a
/// timestamp sort before timed ones.
pub fn sort_events(events: &mut [EnrichedEvent], key: SortKey) {
    if key.descending {
        events.reverse();
    }

    events.sort_by(|a, b| compare(a, b, key.field));

    if key.descending {
        events.reverse();
    }
}

fn compare(a: &EnrichedEvent, b: &EnrichedEvent, field: SortField) -> Ordering {
    match field {
        SortField::Magnitude => a.magnitude.total_cmp(&b.magnitude),
        SortField::Place => a.label().cmp(b.label()),
        SortField::Distance => a.distance.total_cmp(&b.distance),
        SortField::Time => a.timestamp.cmp(&b.timestamp),
    }
}
