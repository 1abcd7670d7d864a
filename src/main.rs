//! Wattsci CLI
//!
//! Ingests raw power sampling reports into per-commit energy documents and
//! compares commits for energy/carbon regressions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use wattsci::commands::{
    execute_compare, execute_process, validate_process_args, CompareArgs, ProcessArgs,
};
use wattsci::render::document_markdown;
use wattsci::store::read_document;

/// Wattsci - energy measurement aggregation for CI runs
#[derive(Parser, Debug)]
#[command(name = "wattsci")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Process a raw report into a commit document
    Process {
        /// Raw report file from the profiling tool
        #[arg(short, long)]
        report: PathBuf,

        /// Directory holding the per-commit documents
        #[arg(short, long, default_value = "wattsci-store")]
        store_dir: PathBuf,

        /// Commit/session key the run belongs to
        #[arg(short, long)]
        key: String,

        /// Submit as the idle baseline instead of a measurement
        #[arg(long)]
        baseline: bool,

        /// Measurement method
        #[arg(short, long, default_value = "perf")]
        method: String,

        /// Run start in epoch microseconds
        #[arg(long)]
        timer_start: Option<String>,

        /// Run end in epoch microseconds
        #[arg(long)]
        timer_end: Option<String>,

        /// Fixed carbon intensity (g CO2/kWh), skips the network fetch
        #[arg(long)]
        carbon_intensity: Option<f64>,

        /// Fetch the current grid intensity from the electricity map API
        #[arg(long)]
        fetch_carbon: bool,

        /// Auth token for the intensity API
        #[arg(long, env = "WATTSCI_INTENSITY_TOKEN")]
        intensity_token: Option<String>,

        /// Print the markdown report after processing
        #[arg(long)]
        summary: bool,
    },

    /// Compare two commit documents (base vs refactor)
    Compare {
        /// Base commit document
        #[arg(short, long)]
        base: PathBuf,

        /// Refactor commit document
        #[arg(short, long)]
        refactor: PathBuf,

        /// Output path for the comparison JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a per-event verdict summary
        #[arg(long)]
        summary: bool,

        /// Exit non-zero when any event's consumption regressed
        #[arg(long)]
        fail_on_regression: bool,
    },

    /// Validate a commit document file
    Validate {
        /// Path to the document JSON
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the markdown report for a commit document
    Report {
        /// Path to the document JSON
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Process {
            report,
            store_dir,
            key,
            baseline,
            method,
            timer_start,
            timer_end,
            carbon_intensity,
            fetch_carbon,
            intensity_token,
            summary,
        } => {
            let args = ProcessArgs {
                report,
                store_dir,
                key,
                baseline,
                method,
                timer_start,
                timer_end,
                carbon_intensity,
                fetch_carbon,
                intensity_token,
                print_summary: summary,
            };

            validate_process_args(&args)?;
            execute_process(args)?;
        }

        Commands::Compare {
            base,
            refactor,
            output,
            summary,
            fail_on_regression,
        } => {
            execute_compare(CompareArgs {
                base,
                refactor,
                output,
                summary,
                fail_on_regression,
            })?;
        }

        Commands::Validate { file } => {
            validate_document_file(file)?;
        }

        Commands::Report { file } => {
            let document = read_document(&file)?;
            println!("{}", document_markdown(&document));
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a commit document file
///
/// **Private** - internal command implementation
fn validate_document_file(file_path: PathBuf) -> Result<()> {
    if !file_path.exists() {
        anyhow::bail!("document not found: {}", file_path.display());
    }

    println!("Validating document: {}", file_path.display());

    let document = read_document(&file_path)?;

    println!("✓ Valid commit document");
    println!("  Baseline: {}", if document.baseline.is_some() { "present" } else { "absent" });
    println!("  Measurements: {}", document.measurements.len());
    println!("  Aggregate: {}", if document.aggregate.is_some() { "present" } else { "absent" });
    if let Some(intensity) = document.carbon_intensity {
        println!("  Carbon intensity: {} g/kWh", intensity);
    }

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Wattsci v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Energy measurement aggregation and regression detection for CI runs.");
}
