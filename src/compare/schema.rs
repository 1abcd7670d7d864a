//! Schema for comparison results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-event comparison entries, keyed by event name
pub type ComparisonResult = BTreeMap<String, EventComparison>;

/// Classification of a single delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaStatus {
    /// Refactor consumes less than base
    Improved,
    /// Refactor consumes more than base
    Regressed,
    NoChange,
    /// The event exists in base but not in refactor
    MissingInRefactor,
    /// One side has no consumption figure
    MissingConsumption,
    /// One side has no carbon footprint figure
    MissingCarbonFootprint,
}

impl DeltaStatus {
    /// Stable wire/terminal label (`improved`, `missing_in_refactor`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            DeltaStatus::Improved => "improved",
            DeltaStatus::Regressed => "regressed",
            DeltaStatus::NoChange => "no_change",
            DeltaStatus::MissingInRefactor => "missing_in_refactor",
            DeltaStatus::MissingConsumption => "missing_consumption",
            DeltaStatus::MissingCarbonFootprint => "missing_carbon_footprint",
        }
    }
}

/// Consumption and carbon deltas for one event.
///
/// Absent figures serialize as explicit nulls: a gap is reported, never
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventComparison {
    pub base_consumption: Option<f64>,
    pub refactor_consumption: Option<f64>,

    /// `refactor - base`, in Joules; present only when both sides have one
    pub difference: Option<f64>,
    pub status: DeltaStatus,

    pub base_carbon_footprint: Option<f64>,
    pub refactor_carbon_footprint: Option<f64>,

    /// `refactor - base`, in grams CO2
    pub carbon_difference: Option<f64>,
    pub carbon_status: DeltaStatus,
}
