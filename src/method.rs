//! Measurement-method dispatch.
//!
//! Each supported profiling tool is a variant of [`Method`] with one
//! `process` operation turning a raw report into summarized per-event
//! statistics. Adding a tool means adding a variant, not branching on
//! strings at the call sites.

use crate::parser::parse_report;
use crate::stats::{delta_t_seconds, summarize};
use crate::store::EventMap;
use crate::utils::error::MethodError;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Supported profiling tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Linux perf power sampling (`perf stat -I ...` text reports)
    Perf,
    /// Intel PCM counter reports
    Pcm,
}

/// One processed run, ready for submission to the store
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRun {
    pub events: EventMap,
    pub timer_start: Option<i64>,
    pub timer_end: Option<i64>,
}

impl Method {
    /// Process one raw report into per-event statistics
    ///
    /// # Arguments
    /// * `report` - Raw report text from the profiling tool
    /// * `timer_start` / `timer_end` - Run boundaries in epoch microseconds,
    ///   if the uploader captured them
    ///
    /// # Errors
    /// * `MethodError::Unsupported` - the variant has no processor yet
    pub fn process(
        &self,
        report: &str,
        timer_start: Option<i64>,
        timer_end: Option<i64>,
    ) -> Result<ProcessedRun, MethodError> {
        match self {
            Method::Perf => {
                let delta_t = delta_t_seconds(timer_start, timer_end);
                let samples = parse_report(report);
                debug!(
                    "perf report: {} events, delta_t={:?}",
                    samples.len(),
                    delta_t
                );

                let events: EventMap = samples
                    .iter()
                    .filter_map(|(event, values)| {
                        summarize(values, delta_t).map(|stat| (event.clone(), stat))
                    })
                    .collect();

                Ok(ProcessedRun {
                    events,
                    timer_start,
                    timer_end,
                })
            }
            // TODO: parse the per-socket Watts columns of pcm CSV output.
            Method::Pcm => Err(MethodError::Unsupported("pcm")),
        }
    }
}

impl FromStr for Method {
    type Err = MethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "perf" => Ok(Method::Perf),
            "pcm" => Ok(Method::Pcm),
            other => Err(MethodError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Perf => write!(f, "perf"),
            Method::Pcm => write!(f, "pcm"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_str() {
        assert_eq!("perf".parse::<Method>().unwrap(), Method::Perf);
        assert_eq!("pcm".parse::<Method>().unwrap(), Method::Pcm);
        assert!(matches!(
            "rapl".parse::<Method>(),
            Err(MethodError::Unknown(_))
        ));
    }

    #[test]
    fn test_perf_process_pipeline() {
        let report = "1.0 10,0 W pkg\n2.0 12,0 W pkg\n3.0 14,0 W pkg\n";
        let run = Method::Perf
            .process(report, Some(0), Some(2_000_000))
            .unwrap();

        assert_eq!(run.events["pkg"].mean, 12.0);
        assert_eq!(run.events["pkg"].consumption, Some(24.0));
        assert_eq!(run.timer_start, Some(0));
    }

    #[test]
    fn test_perf_process_without_timing() {
        let run = Method::Perf.process("1.0 10,0 W pkg\n", None, None).unwrap();
        assert_eq!(run.events["pkg"].consumption, None);
    }

    #[test]
    fn test_pcm_is_unsupported() {
        assert!(matches!(
            Method::Pcm.process("", None, None),
            Err(MethodError::Unsupported("pcm"))
        ));
    }
}
