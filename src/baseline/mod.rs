//! Baseline correction for measured power statistics.
//!
//! Subtracts idle-power statistics from a measurement's statistics to
//! isolate the energy attributable to the workload itself. The corrector is
//! pure: it never touches the document store - the store invokes it when a
//! measurement or a (possibly late) baseline arrives.

use crate::stats::{EventStat, Percentiles};
use crate::store::EventMap;
use log::debug;

/// Derive a `withoutBaseline` view from a baseline and a measurement
///
/// **Public** - invoked by the aggregate store.
///
/// For every event present in both maps, `mean`, `min`, `max`, each
/// percentile and `consumption` are subtracted and clamped at zero.
/// `samples` and `std` are copied from the measurement untouched; downstream
/// comparisons rely on that exact asymmetry, so do not "fix" it here.
/// Events the baseline does not know about pass through unchanged.
pub fn correct_events(baseline: &EventMap, measurement: &EventMap) -> EventMap {
    let mut corrected = EventMap::new();

    for (event, measured) in measurement {
        let entry = match baseline.get(event) {
            Some(base) => subtract_stat(measured, base),
            None => {
                debug!("Event {} has no baseline entry, passing through", event);
                measured.clone()
            }
        };
        corrected.insert(event.clone(), entry);
    }

    corrected
}

/// Subtract one baseline stat from one measured stat, clamping at zero
///
/// **Private** - per-event correction.
fn subtract_stat(measured: &EventStat, base: &EventStat) -> EventStat {
    let consumption = measured
        .consumption
        .map(|c| clamp_zero(c - base.consumption.unwrap_or(0.0)));

    EventStat {
        unit: measured.unit.clone(),
        samples: measured.samples,
        min: clamp_zero(measured.min - base.min),
        max: clamp_zero(measured.max - base.max),
        mean: clamp_zero(measured.mean - base.mean),
        std: measured.std,
        percentiles: Percentiles {
            p25: clamp_zero(measured.percentiles.p25 - base.percentiles.p25),
            p50: clamp_zero(measured.percentiles.p50 - base.percentiles.p50),
            p75: clamp_zero(measured.percentiles.p75 - base.percentiles.p75),
            p90: clamp_zero(measured.percentiles.p90 - base.percentiles.p90),
            p95: clamp_zero(measured.percentiles.p95 - base.percentiles.p95),
            p99: clamp_zero(measured.percentiles.p99 - base.percentiles.p99),
        },
        consumption,
        carbon_footprint_g: None,
    }
}

fn clamp_zero(value: f64) -> f64 {
    value.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::summarize;
    use pretty_assertions::assert_eq;

    fn event_map(entries: Vec<(&str, EventStat)>) -> EventMap {
        entries
            .into_iter()
            .map(|(name, stat)| (name.to_string(), stat))
            .collect()
    }

    #[test]
    fn test_correct_events_subtracts_and_clamps() {
        let baseline = event_map(vec![(
            "pkg",
            summarize(&[2.0, 2.0, 2.0], Some(2.0)).unwrap(),
        )]);
        let measurement = event_map(vec![(
            "pkg",
            summarize(&[10.0, 12.0, 14.0], Some(2.0)).unwrap(),
        )]);

        let corrected = correct_events(&baseline, &measurement);
        let pkg = &corrected["pkg"];

        assert_eq!(pkg.mean, 10.0);
        assert_eq!(pkg.min, 8.0);
        assert_eq!(pkg.max, 12.0);
        assert_eq!(pkg.consumption, Some(20.0));
        // samples and std come from the measurement, uncorrected
        assert_eq!(pkg.samples, 3);
        assert_eq!(pkg.std, 1.633);
    }

    #[test]
    fn test_correct_events_clamps_negative_to_zero() {
        let baseline = event_map(vec![("pkg", summarize(&[20.0], Some(1.0)).unwrap())]);
        let measurement = event_map(vec![("pkg", summarize(&[5.0], Some(1.0)).unwrap())]);

        let corrected = correct_events(&baseline, &measurement);
        let pkg = &corrected["pkg"];

        assert_eq!(pkg.mean, 0.0);
        assert_eq!(pkg.min, 0.0);
        assert_eq!(pkg.max, 0.0);
        assert_eq!(pkg.percentiles.p50, 0.0);
        assert_eq!(pkg.consumption, Some(0.0));
    }

    #[test]
    fn test_correct_events_passes_through_unmatched() {
        let baseline = EventMap::new();
        let measurement = event_map(vec![("cores", summarize(&[3.0], None).unwrap())]);

        let corrected = correct_events(&baseline, &measurement);
        assert_eq!(corrected["cores"], measurement["cores"]);
    }

    #[test]
    fn test_correct_events_missing_baseline_consumption() {
        // Baseline without timing has no consumption; subtraction treats it as 0.
        let baseline = event_map(vec![("pkg", summarize(&[2.0], None).unwrap())]);
        let measurement = event_map(vec![("pkg", summarize(&[12.0], Some(2.0)).unwrap())]);

        let corrected = correct_events(&baseline, &measurement);
        assert_eq!(corrected["pkg"].consumption, Some(24.0));
    }

    #[test]
    fn test_correct_events_no_measurement_consumption() {
        let baseline = event_map(vec![("pkg", summarize(&[2.0], Some(1.0)).unwrap())]);
        let measurement = event_map(vec![("pkg", summarize(&[12.0], None).unwrap())]);

        let corrected = correct_events(&baseline, &measurement);
        assert_eq!(corrected["pkg"].consumption, None);
    }
}
