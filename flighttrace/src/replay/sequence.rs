//! Time-ordered replay track and per-instant queries.
//!
//! A track is the timestamped segments of one flight sorted by time. Each
//! query here is a pure function of the track and a replay time, so the
//! playback loop can recompute the current frame from scratch every tick.

use serde::{Deserialize, Serialize};

use super::error::ReplayError;
use crate::geo::bearing_between;
use crate::model::{GeoPoint, PathId, TelemetrySegment};

/// Number of segments ahead used to smooth the displayed heading.
pub const DEFAULT_LOOKAHEAD: usize = 5;

/// Minimum time delta used as the interpolation denominator, in seconds.
const MIN_TIME_DELTA: f64 = 1e-3;

/// A segment with its (known) timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSegment {
    pub time: f64,
    pub segment: TelemetrySegment,
}

/// Timestamp bounds of a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
}

impl TimeRange {
    /// Duration covered, in seconds.
    pub fn duration(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp a replay time into the range.
    pub fn clamp(&self, t: f64) -> f64 {
        if t.is_nan() {
            return self.min;
        }
        t.clamp(self.min, self.max)
    }
}

/// Segments bracketing a replay time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location<'a> {
    pub current: Option<&'a TimedSegment>,
    pub next: Option<&'a TimedSegment>,
    pub index: Option<usize>,
}

/// Interpolated aircraft state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayPosition {
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: Option<f64>,
    pub speed_knots: Option<f64>,
}

/// Build the replay track for one flight.
///
/// Keeps the flight's segments that carry a finite timestamp and sorts them
/// ascending by time. The sort is stable, so equal timestamps keep input
/// order.
pub fn prepare(segments: &[TelemetrySegment], flight_id: PathId) -> Vec<TimedSegment> {
    let mut track: Vec<TimedSegment> = segments
        .iter()
        .filter(|segment| segment.path_id == flight_id)
        .filter_map(|segment| {
            let time = segment.time.filter(|t| t.is_finite())?;
            Some(TimedSegment {
                time,
                segment: segment.clone(),
            })
        })
        .collect();
    track.sort_by(|a, b| a.time.total_cmp(&b.time));
    track
}

/// Earliest and latest timestamp of a track; `{0, 0}` when empty.
pub fn time_range(ordered: &[TimedSegment]) -> TimeRange {
    match (ordered.first(), ordered.last()) {
        (Some(first), Some(last)) => TimeRange {
            min: first.time,
            max: last.time,
        },
        _ => TimeRange::default(),
    }
}

/// Find the segment active at replay time `t`.
///
/// `current` is the last segment whose time is `<= t`, or the first segment
/// when `t` precedes the track.
pub fn locate(ordered: &[TimedSegment], t: f64) -> Location<'_> {
    if ordered.is_empty() {
        return Location {
            current: None,
            next: None,
            index: None,
        };
    }

    let index = ordered.partition_point(|s| s.time <= t).saturating_sub(1);
    Location {
        current: ordered.get(index),
        next: ordered.get(index + 1),
        index: Some(index),
    }
}

fn lerp(a: f64, b: f64, fraction: f64) -> f64 {
    a + (b - a) * fraction
}

fn lerp_optional(a: Option<f64>, b: Option<f64>, fraction: f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(lerp(a, b, fraction)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Interpolate the aircraft state at replay time `t`.
///
/// Moves linearly from the end of `current` to the start of `next`. Without a
/// usable `next`, the end of `current` is returned as-is. `None` when
/// `current` has no coordinates.
pub fn interpolate(
    current: &TimedSegment,
    next: Option<&TimedSegment>,
    t: f64,
) -> Option<ReplayPosition> {
    let end = current.segment.end()?;
    let altitude = current.segment.altitude_meters();
    let speed = current.segment.groundspeed_knots;

    let Some((next, next_start)) = next.and_then(|n| n.segment.start().map(|start| (n, start)))
    else {
        return Some(ReplayPosition {
            lat: end.lat,
            lon: end.lon,
            altitude_m: altitude,
            speed_knots: speed,
        });
    };

    let delta = (next.time - current.time).max(MIN_TIME_DELTA);
    let raw = (t - current.time) / delta;
    let fraction = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };

    Some(ReplayPosition {
        lat: lerp(end.lat, next_start.lat, fraction),
        lon: lerp(end.lon, next_start.lon, fraction),
        altitude_m: lerp_optional(altitude, next.segment.altitude_meters(), fraction),
        speed_knots: lerp_optional(speed, next.segment.groundspeed_knots, fraction),
    })
}

/// Aircraft state at replay time `t` on a whole track.
///
/// Same as [`interpolate`] on the located segments, except that a segment
/// without coordinates keeps its own altitude and speed and is placed at the
/// last point reached before it (the first point after it at the start of a
/// track). `None` only when the track has no coordinates at all.
pub fn position_at(ordered: &[TimedSegment], t: f64) -> Option<ReplayPosition> {
    let location = locate(ordered, t);
    let current = location.current?;
    if let Some(position) = interpolate(current, location.next, t) {
        return Some(position);
    }

    let point = last_known_point(ordered, location.index.unwrap_or(0))?;
    Some(ReplayPosition {
        lat: point.lat,
        lon: point.lon,
        altitude_m: current.segment.altitude_meters(),
        speed_knots: current.segment.groundspeed_knots,
    })
}

fn last_known_point(ordered: &[TimedSegment], index: usize) -> Option<GeoPoint> {
    let (before, after) = ordered.split_at(index.min(ordered.len()));
    before
        .iter()
        .rev()
        .find_map(|s| s.segment.end())
        .or_else(|| after.iter().find_map(|s| s.segment.start()))
}

/// Heading at `index`, smoothed by looking `lookahead` segments ahead.
///
/// On the last segment the segment's own start-to-end bearing is used.
pub fn smoothed_bearing(ordered: &[TimedSegment], index: usize, lookahead: usize) -> Option<f64> {
    let current = ordered.get(index)?;
    let last = ordered.len() - 1;

    if index == last {
        let (start, end) = current.segment.endpoints()?;
        return Some(bearing_between(start, end));
    }

    let target = (index + lookahead.max(1)).min(last);
    let from = current.segment.end()?;
    let to = ordered[target].segment.end()?;
    Some(bearing_between(from, to))
}

/// Check that a set of segments can be replayed.
pub fn validate(segments: &[TelemetrySegment]) -> Result<(), ReplayError> {
    if segments.is_empty() {
        return Err(ReplayError::NoSegments);
    }
    if !segments
        .iter()
        .any(|segment| segment.time.is_some_and(f64::is_finite))
    {
        return Err(ReplayError::NoTimestamps);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeoPoint;

    fn leg(path_id: PathId, time: f64, start: (f64, f64), end: (f64, f64)) -> TelemetrySegment {
        TelemetrySegment::new(
            path_id,
            GeoPoint::new(start.0, start.1),
            GeoPoint::new(end.0, end.1),
        )
        .with_time(time)
    }

    fn track() -> Vec<TimedSegment> {
        let segments = vec![
            leg(1, 20.0, (0.2, 0.0), (0.3, 0.0)).with_altitude_m(1200.0),
            leg(1, 0.0, (0.0, 0.0), (0.1, 0.0))
                .with_altitude_m(1000.0)
                .with_groundspeed(100.0),
            leg(2, 5.0, (9.0, 9.0), (9.1, 9.0)),
            leg(1, 10.0, (0.1, 0.0), (0.2, 0.0))
                .with_altitude_m(1100.0)
                .with_groundspeed(120.0),
            TelemetrySegment::without_coords(1),
        ];
        prepare(&segments, 1)
    }

    #[test]
    fn test_prepare_filters_and_sorts() {
        let track = track();
        let times: Vec<f64> = track.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0.0, 10.0, 20.0]);
        assert!(track.iter().all(|s| s.segment.path_id == 1));
    }

    #[test]
    fn test_prepare_is_stable_for_equal_times() {
        let segments = vec![
            leg(1, 5.0, (0.0, 0.0), (1.0, 0.0)).with_altitude_m(1.0),
            leg(1, 5.0, (0.0, 0.0), (1.0, 0.0)).with_altitude_m(2.0),
        ];
        let track = prepare(&segments, 1);
        assert_eq!(track[0].segment.altitude_m, Some(1.0));
        assert_eq!(track[1].segment.altitude_m, Some(2.0));
    }

    #[test]
    fn test_time_range() {
        assert_eq!(time_range(&track()), TimeRange { min: 0.0, max: 20.0 });
        assert_eq!(time_range(&[]), TimeRange::default());

        let single = &track()[..1];
        assert_eq!(time_range(single), TimeRange { min: 0.0, max: 0.0 });
    }

    #[test]
    fn test_locate_exact_timestamp() {
        let track = track();
        let location = locate(&track, 10.0);
        assert_eq!(location.index, Some(1));
        assert_eq!(location.current.map(|s| s.time), Some(10.0));
        assert_eq!(location.next.map(|s| s.time), Some(20.0));
    }

    #[test]
    fn test_locate_before_and_after() {
        let track = track();
        let before = locate(&track, -5.0);
        assert_eq!(before.index, Some(0));
        assert_eq!(before.next.map(|s| s.time), Some(10.0));

        let after = locate(&track, 99.0);
        assert_eq!(after.index, Some(2));
        assert!(after.next.is_none());
    }

    #[test]
    fn test_locate_empty() {
        let location = locate(&[], 1.0);
        assert_eq!(location.index, None);
        assert!(location.current.is_none());
        assert!(location.next.is_none());
    }

    #[test]
    fn test_interpolate_boundaries() {
        let track = track();
        let (current, next) = (&track[0], Some(&track[1]));

        let start = interpolate(current, next, 0.0).unwrap();
        assert_eq!((start.lat, start.lon), (0.1, 0.0));
        assert_eq!(start.altitude_m, Some(1000.0));
        assert_eq!(start.speed_knots, Some(100.0));

        let end = interpolate(current, next, 10.0).unwrap();
        assert_eq!((end.lat, end.lon), (0.1, 0.0));
        assert_eq!(end.altitude_m, Some(1100.0));
        assert_eq!(end.speed_knots, Some(120.0));
    }

    #[test]
    fn test_interpolate_midpoint_and_clamp() {
        let segments = vec![
            leg(1, 0.0, (0.0, 0.0), (1.0, 0.0)).with_altitude_m(100.0),
            leg(1, 10.0, (2.0, 0.0), (3.0, 0.0)).with_altitude_m(300.0),
        ];
        let track = prepare(&segments, 1);

        let mid = interpolate(&track[0], Some(&track[1]), 5.0).unwrap();
        assert!((mid.lat - 1.5).abs() < 1e-12);
        assert_eq!(mid.altitude_m, Some(200.0));

        let past = interpolate(&track[0], Some(&track[1]), 50.0).unwrap();
        assert_eq!(past.lat, 2.0);
    }

    #[test]
    fn test_interpolate_one_sided_values() {
        let track = track();
        // track[2] has altitude but no speed
        let mid = interpolate(&track[1], Some(&track[2]), 15.0).unwrap();
        assert_eq!(mid.altitude_m, Some(1150.0));
        assert_eq!(mid.speed_knots, Some(120.0));
    }

    #[test]
    fn test_interpolate_without_next_or_coords() {
        let track = track();
        let last = interpolate(&track[2], None, 1000.0).unwrap();
        assert_eq!((last.lat, last.lon), (0.3, 0.0));
        assert_eq!(last.altitude_m, Some(1200.0));

        let bare = TimedSegment {
            time: 0.0,
            segment: TelemetrySegment::without_coords(1),
        };
        assert!(interpolate(&bare, Some(&track[0]), 0.0).is_none());
    }

    #[test]
    fn test_position_at_keeps_attitude_of_bare_segment() {
        let segments = vec![
            leg(1, 0.0, (0.0, 0.0), (0.1, 0.0))
                .with_altitude_m(1000.0)
                .with_groundspeed(90.0),
            TelemetrySegment::without_coords(1)
                .with_altitude_m(3000.0)
                .with_groundspeed(120.0)
                .with_time(10.0),
            leg(1, 20.0, (0.2, 0.0), (0.3, 0.0)).with_altitude_m(1200.0),
        ];
        let track = prepare(&segments, 1);

        let position = position_at(&track, 15.0).unwrap();
        assert_eq!((position.lat, position.lon), (0.1, 0.0));
        assert_eq!(position.altitude_m, Some(3000.0));
        assert_eq!(position.speed_knots, Some(120.0));

        // Coordinated segments still interpolate
        let before = position_at(&track, 0.0).unwrap();
        assert_eq!(before.altitude_m, Some(1000.0));
    }

    #[test]
    fn test_position_at_bare_first_segment_uses_next_point() {
        let segments = vec![
            TelemetrySegment::without_coords(1)
                .with_altitude_m(50.0)
                .with_time(0.0),
            leg(1, 10.0, (0.5, 0.5), (0.6, 0.5)),
        ];
        let track = prepare(&segments, 1);

        let position = position_at(&track, 2.0).unwrap();
        assert_eq!((position.lat, position.lon), (0.5, 0.5));
        assert_eq!(position.altitude_m, Some(50.0));
    }

    #[test]
    fn test_position_at_without_any_coordinates() {
        let segments = vec![TelemetrySegment::without_coords(1)
            .with_altitude_m(50.0)
            .with_time(0.0)];
        let track = prepare(&segments, 1);
        assert!(position_at(&track, 0.0).is_none());
        assert!(position_at(&[], 0.0).is_none());
    }

    #[test]
    fn test_interpolate_zero_delta() {
        let segments = vec![
            leg(1, 5.0, (0.0, 0.0), (1.0, 0.0)),
            leg(1, 5.0, (2.0, 0.0), (3.0, 0.0)),
        ];
        let track = prepare(&segments, 1);
        let pos = interpolate(&track[0], Some(&track[1]), 5.0).unwrap();
        assert_eq!(pos.lat, 1.0);
    }

    #[test]
    fn test_smoothed_bearing() {
        let track = track();
        // Heading north along the meridian
        let heading = smoothed_bearing(&track, 0, DEFAULT_LOOKAHEAD).unwrap();
        assert!(heading.abs() < 1e-6, "got {}", heading);

        let last = smoothed_bearing(&track, 2, DEFAULT_LOOKAHEAD).unwrap();
        assert!(last.abs() < 1e-6, "got {}", last);

        assert!(smoothed_bearing(&track, 3, DEFAULT_LOOKAHEAD).is_none());
        assert!(smoothed_bearing(&[], 0, DEFAULT_LOOKAHEAD).is_none());
    }

    #[test]
    fn test_smoothed_bearing_looks_ahead() {
        let segments = vec![
            leg(1, 0.0, (0.0, 0.0), (0.0, 0.1)),
            leg(1, 1.0, (0.0, 0.1), (0.1, 0.1)),
            leg(1, 2.0, (0.1, 0.1), (0.1, 0.2)),
        ];
        let track = prepare(&segments, 1);
        // From (0, 0.1) to the end of the last segment (0.1, 0.2): north-east
        let heading = smoothed_bearing(&track, 0, 5).unwrap();
        assert!((heading - 45.0).abs() < 0.1, "got {}", heading);
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(&[]), Err(ReplayError::NoSegments));
        assert_eq!(
            validate(&[TelemetrySegment::without_coords(1)]),
            Err(ReplayError::NoTimestamps)
        );
        assert_eq!(
            validate(&[TelemetrySegment::without_coords(1).with_time(3.0)]),
            Ok(())
        );
    }
}
