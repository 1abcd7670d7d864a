//! On-disk schema for the per-commit document.
//!
//! The document is the unit of durable state: one JSON file per
//! commit/session key holding the optional idle baseline, every processed
//! measurement run, and the rollup across them. Measurement slots are keyed
//! `measurement_0`, `measurement_1`, ... on disk; in memory they live in an
//! index-ordered map so slot numbering survives serialization.

use crate::stats::EventStat;
use crate::utils::config::MEASUREMENT_KEY_PREFIX;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Per-event statistics, keyed by event name
pub type EventMap = BTreeMap<String, EventStat>;

/// Idle-power statistics for a commit.
///
/// At most one baseline exists per document; resubmission overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_start: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_end: Option<i64>,

    /// Idle statistics per event, flattened alongside the timer fields
    #[serde(flatten)]
    pub events: EventMap,
}

/// One processed run for a commit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_start: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_end: Option<i64>,

    /// Elapsed run time derived from the timers; absent when either timer is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_t_seconds: Option<f64>,

    /// Statistics as measured, idle draw included
    #[serde(rename = "withBaseline")]
    pub with_baseline: EventMap,

    /// Baseline-corrected statistics; absent until a baseline is known
    #[serde(rename = "withoutBaseline", skip_serializing_if = "Option::is_none")]
    pub without_baseline: Option<EventMap>,
}

/// Rollup across all measurements currently in the document.
///
/// With a single measurement this is a verbatim copy of its data; with two
/// or more it is a fresh distribution over the per-measurement means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_start: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_end: Option<i64>,

    #[serde(rename = "withBaseline")]
    pub with_baseline: EventMap,

    #[serde(rename = "withoutBaseline", skip_serializing_if = "Option::is_none")]
    pub without_baseline: Option<EventMap>,
}

/// The persisted per-commit document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Baseline>,

    /// Measurement slots, flattened to `measurement_N` keys on disk
    #[serde(flatten)]
    pub measurements: MeasurementSet,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateSummary>,

    /// Intensity scalar used for the last enrichment pass, grams CO2 per kWh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_intensity: Option<f64>,
}

/// Index-ordered measurement slots.
///
/// Wraps a `BTreeMap<u64, Measurement>` so iteration follows numeric slot
/// order (`measurement_10` after `measurement_9`, not after `measurement_1`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSet(BTreeMap<u64, Measurement>);

impl MeasurementSet {
    /// Next unused slot index: `max(existing) + 1`, or 0 when empty
    pub fn next_index(&self) -> u64 {
        self.0
            .last_key_value()
            .map(|(index, _)| index + 1)
            .unwrap_or(0)
    }

    pub fn insert(&mut self, index: u64, measurement: Measurement) {
        self.0.insert(index, measurement);
    }

    pub fn get(&self, index: u64) -> Option<&Measurement> {
        self.0.get(&index)
    }

    /// Slots in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Measurement)> {
        self.0.iter().map(|(index, m)| (*index, m))
    }

    pub fn values(&self) -> impl Iterator<Item = &Measurement> {
        self.0.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Measurement> {
        self.0.values_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for MeasurementSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, measurement) in &self.0 {
            map.serialize_entry(&format!("{}{}", MEASUREMENT_KEY_PREFIX, index), measurement)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MeasurementSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = MeasurementSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map of {}N slots", MEASUREMENT_KEY_PREFIX)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut slots = BTreeMap::new();

                while let Some(key) = access.next_key::<String>()? {
                    let index = key
                        .strip_prefix(MEASUREMENT_KEY_PREFIX)
                        .and_then(|suffix| suffix.parse::<u64>().ok())
                        .ok_or_else(|| {
                            serde::de::Error::custom(format!("unexpected document key: {}", key))
                        })?;
                    slots.insert(index, access.next_value::<Measurement>()?);
                }

                Ok(MeasurementSet(slots))
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}
