//! Telemetry segments.

use serde::{Deserialize, Serialize};

use super::{GeoPoint, PathId};
use crate::units::FEET_PER_METER;

/// One interval of a recorded flight.
///
/// A segment is usable for geometry only when `coords` holds exactly two
/// points (start and end); anything else is treated as "no coordinates".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetrySegment {
    /// Owning flight.
    pub path_id: PathId,

    /// Start and end point of the interval.
    #[serde(default)]
    pub coords: Vec<GeoPoint>,

    /// Altitude in meters.
    #[serde(default)]
    pub altitude_m: Option<f64>,

    /// Altitude in feet.
    #[serde(default)]
    pub altitude_ft: Option<f64>,

    /// Groundspeed in knots.
    #[serde(default, alias = "groundspeed")]
    pub groundspeed_knots: Option<f64>,

    /// Timestamp in seconds, monotonic within a flight.
    #[serde(default, alias = "timestamp")]
    pub time: Option<f64>,
}

impl TelemetrySegment {
    /// Create a segment between two points.
    pub fn new(path_id: PathId, start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            path_id,
            coords: vec![start, end],
            ..Default::default()
        }
    }

    /// Create a segment without coordinates.
    pub fn without_coords(path_id: PathId) -> Self {
        Self {
            path_id,
            ..Default::default()
        }
    }

    /// Set the altitude in meters.
    pub fn with_altitude_m(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }

    /// Set the groundspeed in knots.
    pub fn with_groundspeed(mut self, knots: f64) -> Self {
        self.groundspeed_knots = Some(knots);
        self
    }

    /// Set the timestamp in seconds.
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    /// Start and end point, if the segment has a valid coordinate pair.
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        match self.coords.as_slice() {
            [start, end] => Some((*start, *end)),
            _ => None,
        }
    }

    /// Start point of a valid coordinate pair.
    pub fn start(&self) -> Option<GeoPoint> {
        self.endpoints().map(|(start, _)| start)
    }

    /// End point of a valid coordinate pair.
    pub fn end(&self) -> Option<GeoPoint> {
        self.endpoints().map(|(_, end)| end)
    }

    /// Altitude in meters, derived from feet when only feet are recorded.
    pub fn altitude_meters(&self) -> Option<f64> {
        self.altitude_m
            .or_else(|| self.altitude_ft.map(|ft| ft / FEET_PER_METER))
            .filter(|alt| alt.is_finite())
    }

    /// Great-circle length of the segment in kilometres (0 without coordinates).
    pub fn length_km(&self) -> f64 {
        self.endpoints()
            .map(|(start, end)| crate::geo::distance(start, end))
            .unwrap_or(0.0)
    }
}
