//! Telemetry data model.
//!
//! These types mirror the JSON payloads delivered by dataset sources. They are
//! produced upstream (track ingestion is not part of this crate) and are only
//! ever read by the aggregator and the replay sequencer.

mod dataset;
mod flight;
mod segment;

pub use dataset::{Dataset, DatasetMetadata};
pub use flight::{Airport, FlightPath, PathId};
pub use segment::TelemetrySegment;

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
///
/// Serialized as a `[lat, lon]` pair, which is how coordinate lists are
/// stored in dataset payloads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.lat, point.lon]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            crate::geo::to_dms(self.lat, true),
            crate::geo::to_dms(self.lon, false)
        )
    }
}
