//! Line-oriented parser for raw power sampling reports.
//!
//! Each sample line carries a timestamp field, a value field, a unit token
//! and the event identifier. Everything else (headers, footers, counter
//! noise) is skipped silently - the parser never fails on malformed input.

use log::{debug, trace};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Ordered samples per event name, in file order
pub type EventSamples = BTreeMap<String, Vec<f64>>;

/// Shape of one sample line: timestamp, value, unit token, event identifier.
/// The decimal separator of the numeric fields may be `,` or `.` depending
/// on the sampler's locale.
const LINE_PATTERN: &str = r"^\s*([\d.,]+)\s+([\d.,]+)\s+\w+\s+(\S+)";

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(LINE_PATTERN).expect("valid sample line pattern"))
}

/// Parse a raw report into per-event sample lists
///
/// **Public** - main entry point for parsing
///
/// Sample order within an event preserves file order. Lines that do not
/// match the expected shape, or whose value field does not survive numeric
/// conversion, are dropped. An empty map is a valid (if useless) result.
pub fn parse_report(text: &str) -> EventSamples {
    let mut samples = EventSamples::new();
    let mut skipped = 0usize;

    for line in text.lines() {
        let Some(captures) = line_pattern().captures(line) else {
            skipped += 1;
            continue;
        };

        let value_str = captures[2].replace(',', ".");
        let Ok(value) = value_str.parse::<f64>() else {
            trace!("Dropping sample line with unparseable value: {}", line);
            skipped += 1;
            continue;
        };

        let event = captures[3].to_string();
        samples.entry(event).or_default().push(value);
    }

    debug!(
        "Parsed {} events from report ({} lines skipped)",
        samples.len(),
        skipped
    );

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPORT: &str = "\
# started on Tue Jul  1 10:00:00 2025

     1.000276916         12,50 W    power/energy-pkg/
     1.000276916          3,20 W    power/energy-cores/
     2.000554123         14,10 W    power/energy-pkg/
     2.000554123          2,90 W    power/energy-cores/

       3.001234567 seconds time elapsed
";

    #[test]
    fn test_parse_report_groups_by_event() {
        let samples = parse_report(REPORT);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples["power/energy-pkg/"], vec![12.5, 14.1]);
        assert_eq!(samples["power/energy-cores/"], vec![3.2, 2.9]);
    }

    #[test]
    fn test_parse_report_skips_noise() {
        let samples = parse_report("no samples here\n# comment only\n");
        assert!(samples.is_empty());
    }

    #[test]
    fn test_parse_report_accepts_dot_decimals() {
        let samples = parse_report("  1.5  10.25  W  pkg\n");
        assert_eq!(samples["pkg"], vec![10.25]);
    }

    #[test]
    fn test_parse_report_preserves_file_order() {
        let samples = parse_report("1 3,0 W pkg\n2 1,0 W pkg\n3 2,0 W pkg\n");
        assert_eq!(samples["pkg"], vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_parse_report_empty_input() {
        assert!(parse_report("").is_empty());
    }
}
