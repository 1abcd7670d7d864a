//! Configuration and constants shared across the crate.

use std::time::Duration;

/// Default timeout for carbon-intensity HTTP requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a writer waits for the per-commit document lock
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Fractional digits kept for all persisted statistics
pub const STAT_PRECISION: u32 = 3;

/// Fractional digits kept for carbon footprint figures
pub const CARBON_PRECISION: u32 = 6;

// Unit conversions
// Timestamps arrive as integer microseconds since the epoch;
// consumption is Joules, carbon intensity is grams CO2 per kWh.
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;
pub const JOULES_PER_KWH: f64 = 3_600_000.0;

/// Unit reported by the power sampler for every event
pub const POWER_UNIT: &str = "W";

/// Key prefix for measurement slots in the persisted document
pub const MEASUREMENT_KEY_PREFIX: &str = "measurement_";

/// Default endpoint for the external carbon-intensity source
pub const DEFAULT_INTENSITY_URL: &str =
    "https://api.electricitymap.org/v3/carbon-intensity/latest";
