#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Magnitude statistics for a batch of seismic events.
//!
//! [`summarize`] computes max, mean, median and mode over raw magnitude
//! values. The mode is always defined: when several values share the
//! highest count, the largest of them wins. [`summarize_events`] does the
//! same over enriched events and also picks out the strongest event.

use quake_map_event_models::EnrichedEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from computing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatisticsError {
    /// No values to summarize.
    #[error("no magnitude values to summarize")]
    EmptyInput,

    /// A value is `NaN` or infinite.
    #[error("magnitude value at index {index} is not finite")]
    NonFiniteInput {
        /// Position of the first offending value.
        index: usize,
    },
}

/// The highest-magnitude event of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrongestEvent {
    /// Event id.
    pub id: String,
    /// Coerced magnitude.
    pub magnitude: f64,
    /// Raw place text.
    pub place: String,
}

/// Summary of the magnitudes in one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    /// Number of values summarized.
    pub count: usize,
    /// Largest value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median; the mean of the two middle values for even counts.
    pub median: f64,
    /// Most frequent value, ties broken toward the largest.
    pub mode: f64,
    /// Strongest event, when summarized from events.
    pub strongest: Option<StrongestEvent>,
}

/// Summarizes a slice of magnitude values.
///
/// # Errors
///
/// Returns [`StatisticsError::EmptyInput`] if `values` is empty and
/// [`StatisticsError::NonFiniteInput`] if any value is `NaN` or infinite.
#[allow(clippy::cast_precision_loss)]
pub fn summarize(values: &[f64]) -> Result<StatisticsSummary, StatisticsError> {
    if values.is_empty() {
        return Err(StatisticsError::EmptyInput);
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(StatisticsError::NonFiniteInput { index });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let max = sorted[count - 1];
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 {
        f64::midpoint(sorted[count / 2 - 1], sorted[count / 2])
    } else {
        sorted[count / 2]
    };

    Ok(StatisticsSummary {
        count,
        max,
        mean,
        median,
        mode: mode_of_sorted(&sorted),
        strongest: None,
    })
}

/// Summarizes the magnitudes of `events` and records the strongest one.
///
/// On equal magnitudes the later event in slice order is the strongest.
///
/// # Errors
///
/// Returns [`StatisticsError::EmptyInput`] if `events` is empty.
pub fn summarize_events(events: &[EnrichedEvent]) -> Result<StatisticsSummary, StatisticsError> {
    let magnitudes: Vec<f64> = events.iter().map(|e| e.magnitude).collect();
    let mut summary = summarize(&magnitudes)?;

    summary.strongest = events
        .iter()
        .fold(None::<&EnrichedEvent>, |best, e| match best {
            Some(b) if e.magnitude < b.magnitude => Some(b),
            _ => Some(e),
        })
        .map(|e| StrongestEvent {
            id: e.id.clone(),
            magnitude: e.magnitude,
            place: e.place.clone(),
        });

    log::debug!(
        "Summarized {} magnitudes: max={:.2} mean={:.2} median={:.2} mode={:.2}",
        summary.count,
        summary.max,
        summary.mean,
        summary.median,
        summary.mode
    );

    Ok(summary)
}

/// Mode of an ascending, non-empty slice.
///
/// Runs are visited smallest value first, so taking every run whose count
/// is at least the best so far resolves ties toward the largest value.
fn mode_of_sorted(sorted: &[f64]) -> f64 {
    let mut best_value = sorted[0];
    let mut best_count = 0usize;

    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..]
            .iter()
            .take_while(|v| v.total_cmp(&value).is_eq())
            .count()
            .max(1);
        if run >= best_count {
            best_value = value;
            best_count = run;
        }
        i += run;
    }

    best_value
}
