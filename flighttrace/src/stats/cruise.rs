//! Cruise-phase analysis.
//!
//! A cruise segment is one above ~1000 ft (absolute altitude stands in for
//! AGL since terrain elevation is unavailable) with a positive groundspeed.

use std::collections::HashMap;

use crate::model::TelemetrySegment;
use crate::units::{km_to_nm, meters_to_feet, CRUISE_ALTITUDE_THRESHOLD_M};

/// Width of the altitude bins used for the modal cruise altitude, in feet.
pub const CRUISE_ALTITUDE_BIN_FT: f64 = 100.0;

/// True for segments above the cruise threshold with positive groundspeed.
pub fn is_cruise_segment(segment: &TelemetrySegment) -> bool {
    let high_enough = segment
        .altitude_meters()
        .is_some_and(|alt| alt > CRUISE_ALTITUDE_THRESHOLD_M);
    let moving = segment
        .groundspeed_knots
        .is_some_and(|speed| speed.is_finite() && speed > 0.0);
    high_enough && moving
}

/// Distance-weighted cruise speed in knots.
///
/// Each cruise segment's time is its length in nautical miles divided by its
/// groundspeed; the result is total cruise distance over total cruise time.
/// Segments without coordinates carry no distance and are ignored. Returns 0
/// when no cruise time accumulates.
pub fn cruise_speed<'a, I>(segments: I) -> f64
where
    I: IntoIterator<Item = &'a TelemetrySegment>,
{
    let mut distance_nm = 0.0;
    let mut hours = 0.0;

    for segment in segments.into_iter().filter(|s| is_cruise_segment(s)) {
        let (Some(_), Some(speed)) = (segment.endpoints(), segment.groundspeed_knots) else {
            continue;
        };
        let nm = km_to_nm(segment.length_km());
        distance_nm += nm;
        hours += nm / speed;
    }

    if hours > 0.0 {
        distance_nm / hours
    } else {
        0.0
    }
}

/// Most common cruise altitude in feet.
///
/// Cruise altitudes are rounded to the nearest 100 ft bin; the most frequent
/// bin wins, ties going to the bin encountered first. `None` without cruise
/// segments.
pub fn modal_cruise_altitude<'a, I>(segments: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a TelemetrySegment>,
{
    // Bins in first-encounter order, with a lookup from bin to position
    let mut bins: Vec<(i64, usize)> = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();

    for segment in segments.into_iter().filter(|s| is_cruise_segment(s)) {
        let Some(altitude_m) = segment.altitude_meters() else {
            continue;
        };
        let bin = (meters_to_feet(altitude_m) / CRUISE_ALTITUDE_BIN_FT).round() as i64;
        match positions.get(&bin) {
            Some(&i) => bins[i].1 += 1,
            None => {
                positions.insert(bin, bins.len());
                bins.push((bin, 1));
            }
        }
    }

    let mut best: Option<(i64, usize)> = None;
    for &(bin, count) in &bins {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((bin, count));
        }
    }

    best.map(|(bin, _)| bin as f64 * CRUISE_ALTITUDE_BIN_FT)
}
