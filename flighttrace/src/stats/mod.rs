//! Statistics aggregation.
//!
//! Pure functions over slices of [`FlightPath`] and [`TelemetrySegment`]:
//! filter flights by year and aircraft, then derive distance, altitude,
//! speed, cruise and flight-time figures for the matching segments.
//! [`filtered_statistics`] bundles everything into one serializable record.
//!
//! The map layer additionally gets [`ValueRange`]s and per-segment
//! [`SegmentStyle`]s.
//!
//! # Example
//!
//! ```ignore
//! use flighttrace::stats::{filtered_statistics, StatisticsQuery};
//!
//! let query = StatisticsQuery::new(&dataset.path_info, &dataset.path_segments)
//!     .with_year("2025")
//!     .with_coordinate_count(dataset.coordinates.len());
//! let stats = filtered_statistics(&query);
//! println!("{} flights, {}", stats.num_paths, stats.total_flight_time);
//! ```
//!
//! [`FlightPath`]: crate::model::FlightPath
//! [`TelemetrySegment`]: crate::model::TelemetrySegment

mod cruise;
mod filter;
mod metrics;
mod ranges;
mod style;
mod summary;

pub use cruise::{cruise_speed, is_cruise_segment, modal_cruise_altitude, CRUISE_ALTITUDE_BIN_FT};
pub use filter::{
    aggregate_aircraft, collect_airports, filter_paths, filter_segments_by_paths, path_ids,
    AircraftSummary, ALL,
};
pub use metrics::{
    altitude_stats, distance_by_path, flight_time, longest_flight, speed_stats, total_distance,
    AltitudeStats, SpeedStats,
};
pub use ranges::{altitude_range, speed_range, ValueRange};
pub use style::{gradient_color, segment_style, ColorMode, LineStyle, SegmentStyle, StyleConfig};
pub use summary::{filtered_statistics, FlightStatistics, StatisticsQuery};
