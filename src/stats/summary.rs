//! Distribution summary for one event's power samples.

use crate::utils::config::{MICROS_PER_SECOND, POWER_UNIT, STAT_PRECISION};
use serde::{Deserialize, Serialize};

/// The six percentile levels kept for every event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Summary statistics for one named power event.
///
/// Immutable once computed. `consumption` (Joules) is present only when an
/// elapsed time was known at summarization time; `carbon_footprint_g` only
/// after carbon enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStat {
    /// Sampling unit as reported by the profiler (always Watts today)
    pub unit: String,

    /// Number of raw samples behind this summary
    pub samples: usize,

    pub min: f64,
    pub max: f64,
    pub mean: f64,

    /// Population standard deviation (divide by N)
    pub std: f64,

    pub percentiles: Percentiles,

    /// Derived energy in Joules: mean power times elapsed seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumption: Option<f64>,

    /// Grams of CO2, attached by the carbon enricher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_footprint_g: Option<f64>,
}

/// Summarize one event's samples into an [`EventStat`]
///
/// **Public** - entry point used by the measurement pipeline and the
/// aggregate rollup.
///
/// # Arguments
/// * `values` - Raw samples in file order
/// * `delta_t` - Elapsed seconds of the run, if timing was available
///
/// # Returns
/// `None` for an empty sample list, otherwise the summary with every figure
/// rounded to a fixed precision so repeated runs are bit-identical.
pub fn summarize(values: &[f64], delta_t: Option<f64>) -> Option<EventStat> {
    if values.is_empty() {
        return None;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    // Consumption multiplies the unrounded mean; rounding happens last.
    let consumption = delta_t.map(|dt| round_to(mean * dt, STAT_PRECISION));

    Some(EventStat {
        unit: POWER_UNIT.to_string(),
        samples: values.len(),
        min: round_to(sorted[0], STAT_PRECISION),
        max: round_to(sorted[sorted.len() - 1], STAT_PRECISION),
        mean: round_to(mean, STAT_PRECISION),
        std: round_to(variance.sqrt(), STAT_PRECISION),
        percentiles: Percentiles {
            p25: round_to(percentile(&sorted, 25.0), STAT_PRECISION),
            p50: round_to(percentile(&sorted, 50.0), STAT_PRECISION),
            p75: round_to(percentile(&sorted, 75.0), STAT_PRECISION),
            p90: round_to(percentile(&sorted, 90.0), STAT_PRECISION),
            p95: round_to(percentile(&sorted, 95.0), STAT_PRECISION),
            p99: round_to(percentile(&sorted, 99.0), STAT_PRECISION),
        },
        consumption,
        carbon_footprint_g: None,
    })
}

/// Elapsed seconds between two microsecond epoch timestamps
///
/// Missing timestamps degrade to `None`, never to zero, so downstream
/// consumption figures stay absent instead of collapsing to 0 J.
pub fn delta_t_seconds(timer_start: Option<i64>, timer_end: Option<i64>) -> Option<f64> {
    match (timer_start, timer_end) {
        (Some(start), Some(end)) => Some((end - start) as f64 / MICROS_PER_SECOND),
        _ => None,
    }
}

/// Round to a fixed number of fractional digits
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Percentile with linear interpolation between closest ranks
///
/// **Private** - `sorted` must be ascending and non-empty.
fn percentile(sorted: &[f64], level: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = level / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
