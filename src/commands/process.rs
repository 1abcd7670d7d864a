//! Process command implementation.
//! Runs the full ingestion pipeline: parse -> summarize -> submit to the
//! commit document -> best-effort carbon enrichment.

use super::models::ProcessArgs;
use crate::carbon::{enrich_document, ElectricityMapClient, FixedIntensity, IntensitySource};
use crate::method::Method;
use crate::render::document_markdown;
use crate::store::{Baseline, CommitDocument, CommitStore};
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;

/// Execute the process command
pub fn execute_process(args: ProcessArgs) -> Result<()> {
    // Step 1: Read the raw report
    let report = fs::read_to_string(&args.report)
        .with_context(|| format!("Failed to read report {}", args.report.display()))?;

    // Step 2: Resolve the measurement method and run its pipeline
    let method: Method = args.method.parse()?;
    let timer_start = parse_timer(args.timer_start.as_deref(), "timer_start");
    let timer_end = parse_timer(args.timer_end.as_deref(), "timer_end");
    let run = method.process(&report, timer_start, timer_end)?;

    if run.events.is_empty() {
        warn!("No samples found in {}", args.report.display());
    }

    // Step 3: Submit to the commit document
    let store = CommitStore::new(&args.store_dir);
    let document = if args.baseline {
        store
            .submit_baseline(
                &args.key,
                Baseline {
                    timer_start: run.timer_start,
                    timer_end: run.timer_end,
                    events: run.events,
                },
            )
            .context("Failed to submit baseline")?
    } else {
        let (index, document) = store
            .submit_measurement(&args.key, run.events, run.timer_start, run.timer_end)
            .context("Failed to submit measurement")?;
        info!("Stored measurement_{} for {}", index, args.key);
        document
    };

    // Step 4: Carbon enrichment, best-effort
    let document = enrich_if_possible(&store, &args, document)?;

    // Step 5: Optional terminal summary
    if args.print_summary {
        println!("{}", document_markdown(&document));
    }

    Ok(())
}

/// Attach carbon figures when an intensity is available
///
/// **Private** - a failed fetch is logged and skipped; the submission
/// itself has already been persisted.
fn enrich_if_possible(
    store: &CommitStore,
    args: &ProcessArgs,
    document: CommitDocument,
) -> Result<CommitDocument> {
    let source: Box<dyn IntensitySource> = if let Some(intensity) = args.carbon_intensity {
        Box::new(FixedIntensity(intensity))
    } else if args.fetch_carbon {
        Box::new(ElectricityMapClient::new(args.intensity_token.clone())?)
    } else {
        return Ok(document);
    };

    match source.current_intensity() {
        Ok(intensity) => {
            let (_, document) = store
                .update(&args.key, |document| enrich_document(document, intensity))
                .context("Failed to persist carbon enrichment")?;
            info!("Enriched {} with intensity {} g/kWh", args.key, intensity);
            Ok(document)
        }
        Err(e) => {
            warn!("Carbon intensity unavailable, skipping enrichment: {}", e);
            Ok(document)
        }
    }
}

/// Parse an uploaded timer field, degrading to None on bad input
fn parse_timer(value: Option<&str>, field: &str) -> Option<i64> {
    let raw = value?.trim();
    match raw.parse::<i64>() {
        Ok(micros) => Some(micros),
        Err(_) => {
            warn!("Ignoring non-numeric {}: {:?}", field, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timer() {
        assert_eq!(parse_timer(Some("1718000000000000"), "timer_start"), Some(1_718_000_000_000_000));
        assert_eq!(parse_timer(Some(" 42 "), "timer_start"), Some(42));
        assert_eq!(parse_timer(Some("soon"), "timer_start"), None);
        assert_eq!(parse_timer(None, "timer_start"), None);
    }
}
