//! Argument structs shared between main.rs and the command implementations.

use anyhow::{bail, Result};
use std::path::PathBuf;

/// Arguments for the process command
#[derive(Debug, Clone)]
pub struct ProcessArgs {
    /// Raw report file from the profiling tool
    pub report: PathBuf,

    /// Directory holding the per-commit documents
    pub store_dir: PathBuf,

    /// Commit/session key the run belongs to
    pub key: String,

    /// Submit as the idle baseline instead of a measurement
    pub baseline: bool,

    /// Measurement method name (perf, pcm)
    pub method: String,

    /// Run boundaries in epoch microseconds, as uploaded
    pub timer_start: Option<String>,
    pub timer_end: Option<String>,

    /// Fixed carbon intensity in g CO2/kWh; skips the network fetch
    pub carbon_intensity: Option<f64>,

    /// Fetch the current intensity from the electricity map API
    pub fetch_carbon: bool,

    /// Auth token for the intensity API
    pub intensity_token: Option<String>,

    /// Print the markdown report after processing
    pub print_summary: bool,
}

/// Arguments for the compare command
#[derive(Debug, Clone)]
pub struct CompareArgs {
    /// Base commit document
    pub base: PathBuf,

    /// Refactor commit document
    pub refactor: PathBuf,

    /// Optional path for the comparison JSON
    pub output: Option<PathBuf>,

    /// Print a per-event verdict summary
    pub summary: bool,

    /// Exit non-zero when any event's consumption regressed
    pub fail_on_regression: bool,
}

/// Validate process arguments before doing any work
pub fn validate_process_args(args: &ProcessArgs) -> Result<()> {
    if !args.report.exists() {
        bail!("report file not found: {}", args.report.display());
    }

    if args.key.trim().is_empty() {
        bail!("commit key must not be empty");
    }

    Ok(())
}
