//! Statistical summarization of power samples.
//!
//! Turns a list of raw Watt samples (plus an optional elapsed time) into a
//! distribution summary with derived energy consumption.

mod summary;

pub use summary::{
    delta_t_seconds, round_to, summarize, EventStat, Percentiles,
};
