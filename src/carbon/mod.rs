//! Carbon footprint enrichment.
//!
//! Converts each event's energy consumption into grams of CO2 using a
//! time-varying grid intensity fetched from an external source. Enrichment
//! is best-effort: statistics are persisted whether or not the intensity
//! was available.

mod intensity;

pub use intensity::{ElectricityMapClient, FixedIntensity, IntensitySource};

use crate::stats::round_to;
use crate::store::{CommitDocument, EventMap};
use crate::utils::config::{CARBON_PRECISION, JOULES_PER_KWH};

/// Attach carbon footprints throughout a document, in place
///
/// **Public** - applied under the store's key lock so the persisted
/// document gains the figures atomically. The intensity used is recorded at
/// the document root; entries without a consumption figure are untouched.
pub fn enrich_document(document: &mut CommitDocument, intensity: f64) {
    document.carbon_intensity = Some(intensity);

    if let Some(baseline) = document.baseline.as_mut() {
        enrich_events(&mut baseline.events, intensity);
    }

    for measurement in document.measurements.values_mut() {
        enrich_events(&mut measurement.with_baseline, intensity);
        if let Some(corrected) = measurement.without_baseline.as_mut() {
            enrich_events(corrected, intensity);
        }
    }

    if let Some(aggregate) = document.aggregate.as_mut() {
        enrich_events(&mut aggregate.with_baseline, intensity);
        if let Some(corrected) = aggregate.without_baseline.as_mut() {
            enrich_events(corrected, intensity);
        }
    }
}

/// Attach carbon footprints to one event map
///
/// `carbon_footprint_g = consumption_J / 3_600_000 * intensity`, rounded to
/// six fractional digits.
pub fn enrich_events(events: &mut EventMap, intensity: f64) {
    for stat in events.values_mut() {
        if let Some(consumption) = stat.consumption {
            stat.carbon_footprint_g =
                Some(round_to(consumption / JOULES_PER_KWH * intensity, CARBON_PRECISION));
        }
    }
}
