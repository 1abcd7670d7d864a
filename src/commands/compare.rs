//! Compare command implementation.
//! Loads two finalized commit documents, classifies every per-event delta
//! and optionally writes the comparison JSON for downstream reporting.

use super::models::CompareArgs;
use crate::compare::{compare_documents, ComparisonResult, DeltaStatus};
use crate::store::read_document;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

/// Execute the compare command
pub fn execute_compare(args: CompareArgs) -> Result<()> {
    // Step 1: Load both documents
    let base = load(&args.base, "base")?;
    let refactor = load(&args.refactor, "refactor")?;

    // Step 2: Run the comparison
    let comparison = compare_documents(&base, &refactor).context("Failed to compare documents")?;

    // Step 3: Write output if requested
    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&comparison)?;
        fs::write(path, json).context("Failed to write comparison JSON")?;
        println!("Comparison written to {}", path.display().to_string().cyan());
    }

    // Step 4: Terminal summary
    if args.summary {
        print_summary(&comparison);
    }

    // Step 5: Verdict
    let regressions = comparison
        .values()
        .filter(|entry| entry.status == DeltaStatus::Regressed)
        .count();
    if args.fail_on_regression && regressions > 0 {
        bail!("energy regression detected in {} event(s)", regressions);
    }

    Ok(())
}

fn load(path: &Path, side: &str) -> Result<crate::store::CommitDocument> {
    if !path.exists() {
        bail!("{} document not found: {}", side, path.display());
    }
    read_document(path).with_context(|| format!("Failed to read {} document", side))
}

/// Print one colored verdict line per event
///
/// **Private** - green means the refactor consumes less, red more.
fn print_summary(comparison: &ComparisonResult) {
    for (event, entry) in comparison {
        let status = match entry.status {
            DeltaStatus::Improved => entry.status.as_str().green(),
            DeltaStatus::Regressed => entry.status.as_str().red(),
            _ => entry.status.as_str().yellow(),
        };

        let delta = match entry.difference {
            Some(difference) => format!("{:+.3} J", difference),
            None => "n/a".to_string(),
        };

        println!("{:30} {} ({})", event, status, delta);
    }
}
