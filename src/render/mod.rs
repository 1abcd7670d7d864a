//! Markdown rendering of commit documents.
//!
//! Produces the human-readable measurement report: one statistics table per
//! measurement slot in index order, followed by the aggregate section.

use crate::stats::{delta_t_seconds, EventStat};
use crate::store::{CommitDocument, EventMap};
use std::fmt::Write;

const TABLE_HEADERS: [&str; 13] = [
    "Event", "Samples", "Min", "Max", "Mean", "Std Dev", "p25", "p50", "p75", "p90", "p95",
    "p99", "Consumption (J)",
];

/// Render a document as a markdown report
///
/// **Public** - used by the `report` CLI subcommand and by external
/// reporting collaborators that want the standard table layout.
pub fn document_markdown(document: &CommitDocument) -> String {
    let mut md = String::from("# Energy Measurement Report\n\n");

    if document.measurements.is_empty() && document.aggregate.is_none() {
        md.push_str("_No data to summarize_\n");
        return md;
    }

    for (index, measurement) in document.measurements.iter() {
        let interval = format_interval(measurement.timer_start, measurement.timer_end);
        let _ = writeln!(md, "## Measurement {} (Interval: {})\n", index, interval);
        md.push_str(&events_table(&measurement.with_baseline));
        md.push('\n');
    }

    if let Some(aggregate) = &document.aggregate {
        let interval = format_interval(aggregate.timer_start, aggregate.timer_end);
        let _ = writeln!(md, "## Aggregate (Interval: {})\n", interval);
        md.push_str(&events_table(&aggregate.with_baseline));
    }

    md
}

/// Markdown table over one event map
fn events_table(events: &EventMap) -> String {
    let mut table = String::new();
    let _ = writeln!(table, "| {} |", TABLE_HEADERS.join(" | "));
    let _ = writeln!(table, "|{}", "---|".repeat(TABLE_HEADERS.len()));

    for (event, stat) in events {
        let _ = writeln!(table, "| {} |", stat_row(event, stat).join(" | "));
    }

    table
}

fn stat_row(event: &str, stat: &EventStat) -> Vec<String> {
    vec![
        event.to_string(),
        stat.samples.to_string(),
        format!("{:.3}", stat.min),
        format!("{:.3}", stat.max),
        format!("{:.3}", stat.mean),
        format!("{:.3}", stat.std),
        format!("{:.3}", stat.percentiles.p25),
        format!("{:.3}", stat.percentiles.p50),
        format!("{:.3}", stat.percentiles.p75),
        format!("{:.3}", stat.percentiles.p90),
        format!("{:.3}", stat.percentiles.p95),
        format!("{:.3}", stat.percentiles.p99),
        stat.consumption
            .map(|c| format!("{:.3}", c))
            .unwrap_or_else(|| "N/A".to_string()),
    ]
}

fn format_interval(timer_start: Option<i64>, timer_end: Option<i64>) -> String {
    match delta_t_seconds(timer_start, timer_end) {
        Some(delta) => format!("{:.3} s", delta),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::summarize;

    fn pkg_events(delta_t: Option<f64>) -> EventMap {
        let mut events = EventMap::new();
        events.insert(
            "pkg".to_string(),
            summarize(&[10.0, 12.0, 14.0], delta_t).unwrap(),
        );
        events
    }

    #[test]
    fn test_empty_document() {
        let md = document_markdown(&CommitDocument::default());
        assert!(md.contains("_No data to summarize_"));
    }

    #[test]
    fn test_measurement_sections_in_index_order() {
        let mut document = CommitDocument::default();
        document.push_measurement(pkg_events(Some(2.0)), Some(0), Some(2_000_000));
        document.push_measurement(pkg_events(Some(2.0)), Some(0), Some(2_000_000));

        let md = document_markdown(&document);
        let first = md.find("## Measurement 0").unwrap();
        let second = md.find("## Measurement 1").unwrap();
        assert!(first < second);
        assert!(md.contains("## Aggregate (Interval: 2.000 s)"));
        assert!(md.contains("| pkg | 3 | 10.000 | 14.000 | 12.000 |"));
    }

    #[test]
    fn test_missing_timing_renders_na() {
        let mut document = CommitDocument::default();
        document.push_measurement(pkg_events(None), None, None);

        let md = document_markdown(&document);
        assert!(md.contains("## Measurement 0 (Interval: N/A)"));
        assert!(md.contains("| N/A |"));
    }
}
