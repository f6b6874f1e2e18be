//! Unit conversions and display formatting.

use chrono::{DateTime, Utc};

/// Feet per meter.
pub const FEET_PER_METER: f64 = 3.28084;

/// Nautical miles per kilometre.
pub const NM_PER_KM: f64 = 0.539957;

/// Cruise threshold: 1000 ft expressed in meters.
pub const CRUISE_ALTITUDE_THRESHOLD_M: f64 = 304.8;

/// Convert meters to feet.
#[inline]
pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Convert feet to meters.
#[inline]
pub fn feet_to_meters(feet: f64) -> f64 {
    feet / FEET_PER_METER
}

/// Convert kilometres to nautical miles.
#[inline]
pub fn km_to_nm(km: f64) -> f64 {
    km * NM_PER_KM
}

/// Format a duration in seconds as `"{H}h {M}m"`.
///
/// Minutes are truncated; negative or non-finite input formats as `0h 0m`.
pub fn format_hours_minutes(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}h {}m", total / 3600, (total % 3600) / 60)
}

/// Format a Unix timestamp in seconds as an RFC 3339 UTC time.
///
/// `None` for non-finite or out-of-range input.
pub fn format_timestamp(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    let time: DateTime<Utc> = DateTime::from_timestamp(whole as i64, nanos)?;
    Some(time.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}
