//! Value ranges for map coloring.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{PathId, TelemetrySegment};

/// Closed interval of observed values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Create a range; the bounds are swapped if given out of order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` within the range, clamped to `[0, 1]`.
    ///
    /// A degenerate (zero-width) range maps everything to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 || !span.is_finite() || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    fn extend(range: Option<Self>, value: f64) -> Option<Self> {
        Some(match range {
            Some(r) => Self {
                min: r.min.min(value),
                max: r.max.max(value),
            },
            None => Self {
                min: value,
                max: value,
            },
        })
    }
}

fn selected(segment: &TelemetrySegment, selection: Option<&HashSet<PathId>>) -> bool {
    selection.map_or(true, |ids| ids.contains(&segment.path_id))
}

/// Altitude range in meters, optionally restricted to selected flights.
pub fn altitude_range<'a, I>(segments: I, selection: Option<&HashSet<PathId>>) -> Option<ValueRange>
where
    I: IntoIterator<Item = &'a TelemetrySegment>,
{
    segments
        .into_iter()
        .filter(|segment| selected(segment, selection))
        .filter_map(TelemetrySegment::altitude_meters)
        .filter(|alt| alt.is_finite())
        .fold(None, ValueRange::extend)
}

/// Groundspeed range in knots over strictly positive speeds.
pub fn speed_range<'a, I>(segments: I, selection: Option<&HashSet<PathId>>) -> Option<ValueRange>
where
    I: IntoIterator<Item = &'a TelemetrySegment>,
{
    segments
        .into_iter()
        .filter(|segment| selected(segment, selection))
        .filter_map(|segment| segment.groundspeed_knots)
        .filter(|speed| speed.is_finite() && *speed > 0.0)
        .fold(None, ValueRange::extend)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(path_id: PathId, altitude: Option<f64>, speed: Option<f64>) -> TelemetrySegment {
        TelemetrySegment {
            altitude_m: altitude,
            groundspeed_knots: speed,
            ..TelemetrySegment::without_coords(path_id)
        }
    }

    #[test]
    fn test_normalize() {
        let range = ValueRange::new(100.0, 300.0);
        assert_eq!(range.normalize(100.0), 0.0);
        assert_eq!(range.normalize(200.0), 0.5);
        assert_eq!(range.normalize(300.0), 1.0);
        assert_eq!(range.normalize(50.0), 0.0);
        assert_eq!(range.normalize(900.0), 1.0);
    }

    #[test]
    fn test_normalize_degenerate_range() {
        let range = ValueRange::new(42.0, 42.0);
        assert_eq!(range.normalize(42.0), 0.0);
        assert_eq!(range.normalize(100.0), 0.0);
    }

    #[test]
    fn test_altitude_range() {
        let segments = vec![
            segment(1, Some(500.0), None),
            segment(1, None, None),
            segment(2, Some(2500.0), None),
            segment(3, Some(100.0), None),
        ];
        assert_eq!(
            altitude_range(&segments, None),
            Some(ValueRange::new(100.0, 2500.0))
        );

        let selection: HashSet<PathId> = [1, 2].into_iter().collect();
        assert_eq!(
            altitude_range(&segments, Some(&selection)),
            Some(ValueRange::new(500.0, 2500.0))
        );
    }

    #[test]
    fn test_speed_range_positive_only() {
        let segments = vec![
            segment(1, None, Some(0.0)),
            segment(1, None, Some(85.0)),
            segment(1, None, Some(140.0)),
        ];
        assert_eq!(
            speed_range(&segments, None),
            Some(ValueRange::new(85.0, 140.0))
        );
    }

    #[test]
    fn test_ranges_empty() {
        assert_eq!(altitude_range(&[], None), None);
        assert_eq!(speed_range(&[segment(1, None, Some(0.0))], None), None);
    }
}
