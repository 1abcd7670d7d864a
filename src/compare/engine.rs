//! Comparison engine implementation.

use super::schema::{ComparisonResult, DeltaStatus, EventComparison};
use crate::stats::EventStat;
use crate::store::CommitDocument;
use crate::utils::error::CompareError;
use log::{debug, warn};

/// Compare two finalized commit documents
///
/// **Public** - main entry point for comparison.
///
/// The diff is driven by the base document's `aggregate.withBaseline`
/// events: refactor-only events are not reported. A base document without
/// an aggregate cannot anchor a comparison and fails the whole request; a
/// refactor without one degrades to every event reporting
/// `missing_in_refactor`.
///
/// # Errors
/// * `CompareError::MissingAggregate` - the base document has no aggregate
pub fn compare_documents(
    base: &CommitDocument,
    refactor: &CommitDocument,
) -> Result<ComparisonResult, CompareError> {
    let base_events = &base
        .aggregate
        .as_ref()
        .ok_or(CompareError::MissingAggregate("base"))?
        .with_baseline;

    let refactor_events = match &refactor.aggregate {
        Some(aggregate) => &aggregate.with_baseline,
        None => {
            warn!("Refactor document has no aggregate; reporting all events as missing");
            return Ok(base_events
                .iter()
                .map(|(event, stat)| (event.clone(), missing_in_refactor(stat)))
                .collect());
        }
    };

    debug!(
        "Comparing {} base events against {} refactor events",
        base_events.len(),
        refactor_events.len()
    );

    let mut comparison = ComparisonResult::new();
    for (event, base_stat) in base_events {
        let entry = match refactor_events.get(event) {
            Some(refactor_stat) => compare_event(base_stat, refactor_stat),
            None => missing_in_refactor(base_stat),
        };
        comparison.insert(event.clone(), entry);
    }

    Ok(comparison)
}

/// Classify consumption and carbon deltas for one event present on both sides
///
/// **Private** - per-event classification.
fn compare_event(base: &EventStat, refactor: &EventStat) -> EventComparison {
    let (difference, status) = classify(
        base.consumption,
        refactor.consumption,
        DeltaStatus::MissingConsumption,
    );
    let (carbon_difference, carbon_status) = classify(
        base.carbon_footprint_g,
        refactor.carbon_footprint_g,
        DeltaStatus::MissingCarbonFootprint,
    );

    EventComparison {
        base_consumption: base.consumption,
        refactor_consumption: refactor.consumption,
        difference,
        status,
        base_carbon_footprint: base.carbon_footprint_g,
        refactor_carbon_footprint: refactor.carbon_footprint_g,
        carbon_difference,
        carbon_status,
    }
}

/// Delta and status for one figure pair; `missing` is used when either side
/// lacks the figure.
fn classify(
    base: Option<f64>,
    refactor: Option<f64>,
    missing: DeltaStatus,
) -> (Option<f64>, DeltaStatus) {
    match (base, refactor) {
        (Some(base), Some(refactor)) => {
            let difference = refactor - base;
            let status = if difference < 0.0 {
                DeltaStatus::Improved
            } else if difference > 0.0 {
                DeltaStatus::Regressed
            } else {
                DeltaStatus::NoChange
            };
            (Some(difference), status)
        }
        _ => (None, missing),
    }
}

fn missing_in_refactor(base: &EventStat) -> EventComparison {
    EventComparison {
        base_consumption: base.consumption,
        refactor_consumption: None,
        difference: None,
        status: DeltaStatus::MissingInRefactor,
        base_carbon_footprint: base.carbon_footprint_g,
        refactor_carbon_footprint: None,
        carbon_difference: None,
        carbon_status: DeltaStatus::MissingInRefactor,
    }
}
