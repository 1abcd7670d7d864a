//! Raw profiling-report parsing.
//!
//! Extracts per-event power samples from the text reports produced by the
//! external sampling tool.

mod report;

pub use report::{parse_report, EventSamples};
