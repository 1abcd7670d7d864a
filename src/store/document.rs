//! Mutation and rollup logic for [`CommitDocument`].
//!
//! Submissions land here after the store has loaded the document under its
//! key lock: baseline replacement with retroactive correction of earlier
//! measurements, measurement appends, and the cross-measurement aggregate.

use super::schema::{AggregateSummary, Baseline, CommitDocument, EventMap, Measurement};
use crate::baseline::correct_events;
use crate::stats::{delta_t_seconds, round_to, summarize};
use crate::utils::config::STAT_PRECISION;
use crate::utils::error::MissingBaselineError;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

impl CommitDocument {
    /// Replace the baseline and propagate it through the document
    ///
    /// Measurements submitted before the baseline arrived gain their
    /// `withoutBaseline` section now; the rollup is recomputed afterwards.
    pub fn set_baseline(&mut self, baseline: Baseline) {
        self.baseline = Some(baseline);
        self.apply_baseline_retroactively();
        self.recompute_aggregate();
    }

    /// Append a measurement at the next unused slot
    ///
    /// Returns the slot index. When a baseline is already present the
    /// corrected view is derived immediately.
    pub fn push_measurement(
        &mut self,
        with_baseline: EventMap,
        timer_start: Option<i64>,
        timer_end: Option<i64>,
    ) -> u64 {
        let without_baseline = self
            .baseline
            .as_ref()
            .map(|baseline| correct_events(&baseline.events, &with_baseline));

        let index = self.measurements.next_index();
        self.measurements.insert(
            index,
            Measurement {
                timer_start,
                timer_end,
                delta_t_seconds: delta_t_seconds(timer_start, timer_end)
                    .map(|dt| round_to(dt, STAT_PRECISION)),
                with_baseline,
                without_baseline,
            },
        );
        debug!("Appended measurement_{}", index);

        self.recompute_aggregate();
        index
    }

    /// Baseline-corrected statistics per measurement slot
    ///
    /// The whole request fails when the commit never received a baseline -
    /// a partially corrected view would be misleading.
    pub fn corrected_views(&self) -> Result<BTreeMap<u64, &EventMap>, MissingBaselineError> {
        if self.baseline.is_none() {
            return Err(MissingBaselineError);
        }

        Ok(self
            .measurements
            .iter()
            .filter_map(|(index, measurement)| {
                measurement
                    .without_baseline
                    .as_ref()
                    .map(|corrected| (index, corrected))
            })
            .collect())
    }

    /// Fill in `withoutBaseline` for every measurement still lacking it
    ///
    /// **Private** - measurements that already carry a corrected view are
    /// left alone, so the final state is the same whether the baseline
    /// arrived first or last.
    fn apply_baseline_retroactively(&mut self) {
        let Some(baseline) = &self.baseline else {
            return;
        };
        let baseline_events = baseline.events.clone();

        let mut fixed = 0usize;
        for measurement in self.measurements.values_mut() {
            if measurement.without_baseline.is_none() {
                measurement.without_baseline =
                    Some(correct_events(&baseline_events, &measurement.with_baseline));
                fixed += 1;
            }
        }

        if fixed > 0 {
            debug!("Derived withoutBaseline for {} earlier measurements", fixed);
        }
    }

    /// Recompute the rollup across all measurement slots
    ///
    /// A single measurement is copied verbatim into the aggregate. Two or
    /// more are rolled up as a distribution over each event's
    /// per-measurement mean - a deliberately lossy summary that keeps the
    /// document size independent of sample counts.
    pub fn recompute_aggregate(&mut self) {
        if self.measurements.is_empty() {
            self.aggregate = None;
            return;
        }

        let timer_start = self.measurements.values().filter_map(|m| m.timer_start).min();
        let timer_end = self.measurements.values().filter_map(|m| m.timer_end).max();

        let with_maps: Vec<&EventMap> =
            self.measurements.values().map(|m| &m.with_baseline).collect();
        let without_maps: Vec<&EventMap> = self
            .measurements
            .values()
            .filter_map(|m| m.without_baseline.as_ref())
            .collect();

        let (with_baseline, without_baseline) = if with_maps.len() == 1 {
            (
                with_maps[0].clone(),
                without_maps.first().map(|map| (*map).clone()),
            )
        } else {
            let delta_t = delta_t_seconds(timer_start, timer_end);
            (
                rollup_events(&with_maps, delta_t),
                if without_maps.is_empty() {
                    None
                } else {
                    Some(rollup_events(&without_maps, delta_t))
                },
            )
        };

        self.aggregate = Some(AggregateSummary {
            timer_start,
            timer_end,
            with_baseline,
            without_baseline,
        });
    }
}

/// Summarize the per-measurement means of every event
///
/// **Private** - the mean-of-means rollup. `delta_t` spans the earliest
/// start to the latest end across all measurements, so the aggregate
/// consumption covers the whole recorded interval.
fn rollup_events(maps: &[&EventMap], delta_t: Option<f64>) -> EventMap {
    let event_names: BTreeSet<&String> = maps.iter().flat_map(|map| map.keys()).collect();

    let mut rollup = EventMap::new();
    for event in event_names {
        let means: Vec<f64> = maps
            .iter()
            .filter_map(|map| map.get(event))
            .map(|stat| stat.mean)
            .collect();

        if let Some(stat) = summarize(&means, delta_t) {
            rollup.insert(event.clone(), stat);
        }
    }

    rollup
}
