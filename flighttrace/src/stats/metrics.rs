//! Per-segment aggregate metrics.
//!
//! Every function here is total: segments missing the relevant field are
//! skipped, and empty input yields zeros.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{FlightPath, PathId, TelemetrySegment};

/// Minimum, maximum and cumulative climb, in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AltitudeStats {
    pub min: f64,
    pub max: f64,
    /// Sum of positive altitude deltas between consecutive defined altitudes.
    pub gain: f64,
}

/// Maximum and mean groundspeed over moving segments, in knots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedStats {
    pub max: f64,
    pub avg: f64,
}

/// Total great-circle distance in kilometres.
///
/// Segments without a valid coordinate pair contribute 0.
pub fn total_distance<'a, I>(segments: I) -> f64
where
    I: IntoIterator<Item = &'a TelemetrySegment>,
{
    segments.into_iter().map(TelemetrySegment::length_km).sum()
}

/// Altitude range and elevation gain in iteration order.
///
/// Segments without an altitude are skipped; they do not reset the reference
/// the next defined altitude is compared against.
pub fn altitude_stats<'a, I>(segments: I) -> AltitudeStats
where
    I: IntoIterator<Item = &'a TelemetrySegment>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut gain = 0.0;
    let mut previous: Option<f64> = None;

    for altitude in segments
        .into_iter()
        .filter_map(TelemetrySegment::altitude_meters)
    {
        min = min.min(altitude);
        max = max.max(altitude);
        if let Some(prev) = previous {
            if altitude > prev {
                gain += altitude - prev;
            }
        }
        previous = Some(altitude);
    }

    if previous.is_none() {
        return AltitudeStats::default();
    }

    AltitudeStats { min, max, gain }
}

/// Groundspeed statistics over strictly positive speeds.
///
/// Zero and negative speeds are treated as "not moving" and discarded.
pub fn speed_stats<'a, I>(segments: I) -> SpeedStats
where
    I: IntoIterator<Item = &'a TelemetrySegment>,
{
    let mut max = 0.0_f64;
    let mut sum = 0.0;
    let mut count = 0usize;

    for speed in segments
        .into_iter()
        .filter_map(|segment| segment.groundspeed_knots)
        .filter(|speed| speed.is_finite() && *speed > 0.0)
    {
        max = max.max(speed);
        sum += speed;
        count += 1;
    }

    if count == 0 {
        return SpeedStats::default();
    }

    SpeedStats {
        max,
        avg: sum / count as f64,
    }
}

/// Distance flown per flight, in kilometres.
pub fn distance_by_path<'a, I>(segments: I) -> HashMap<PathId, f64>
where
    I: IntoIterator<Item = &'a TelemetrySegment>,
{
    let mut distances: HashMap<PathId, f64> = HashMap::new();
    for segment in segments {
        *distances.entry(segment.path_id).or_insert(0.0) += segment.length_km();
    }
    distances
}

/// Distance of the longest single flight in kilometres (0 without segments).
pub fn longest_flight<'a, I>(segments: I) -> f64
where
    I: IntoIterator<Item = &'a TelemetrySegment>,
{
    distance_by_path(segments)
        .into_values()
        .fold(0.0, f64::max)
}

/// Total recorded flight time in seconds.
///
/// For each distinct flight in `paths`, the span between its earliest and
/// latest timestamped segment is summed. Flights with fewer than two
/// timestamps contribute 0.
pub fn flight_time<'a, 'p, I, P>(segments: I, paths: P) -> f64
where
    I: IntoIterator<Item = &'a TelemetrySegment>,
    P: IntoIterator<Item = &'p FlightPath>,
{
    let ids: HashSet<PathId> = paths.into_iter().map(|path| path.id).collect();
    let mut spans: HashMap<PathId, (f64, f64)> = HashMap::new();

    for segment in segments {
        if !ids.contains(&segment.path_id) {
            continue;
        }
        let Some(time) = segment.time.filter(|t| t.is_finite()) else {
            continue;
        };
        spans
            .entry(segment.path_id)
            .and_modify(|(min, max)| {
                *min = min.min(time);
                *max = max.max(time);
            })
            .or_insert((time, time));
    }

    spans.values().map(|(min, max)| max - min).sum()
}
