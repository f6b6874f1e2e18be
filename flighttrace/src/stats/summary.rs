//! Filtered statistics summary.

use serde::{Deserialize, Serialize};

use super::cruise::{cruise_speed, is_cruise_segment, modal_cruise_altitude};
use super::filter::{
    aggregate_aircraft, collect_airports, filter_paths, filter_segments_by_paths, AircraftSummary,
    ALL,
};
use super::metrics::{altitude_stats, flight_time, longest_flight, speed_stats, total_distance};
use crate::model::{FlightPath, TelemetrySegment};
use crate::units::{feet_to_meters, format_hours_minutes, km_to_nm, meters_to_feet};

/// Input to [`filtered_statistics`].
#[derive(Debug, Clone, Copy)]
pub struct StatisticsQuery<'a> {
    /// All known flights.
    pub paths: &'a [FlightPath],
    /// All known segments.
    pub segments: &'a [TelemetrySegment],
    /// Year filter, or `"all"`.
    pub year: &'a str,
    /// Aircraft registration filter, or `"all"`.
    pub aircraft: &'a str,
    /// Raw point count to report; defaults to the matched segment count.
    pub coordinate_count: Option<usize>,
}

impl<'a> StatisticsQuery<'a> {
    /// Query over every flight with no filters.
    pub fn new(paths: &'a [FlightPath], segments: &'a [TelemetrySegment]) -> Self {
        Self {
            paths,
            segments,
            year: ALL,
            aircraft: ALL,
            coordinate_count: None,
        }
    }

    /// Restrict to one year.
    pub fn with_year(mut self, year: &'a str) -> Self {
        self.year = year;
        self
    }

    /// Restrict to one aircraft registration.
    pub fn with_aircraft(mut self, aircraft: &'a str) -> Self {
        self.aircraft = aircraft;
        self
    }

    /// Report this many raw coordinate points.
    pub fn with_coordinate_count(mut self, count: usize) -> Self {
        self.coordinate_count = Some(count);
        self
    }
}

/// Flat statistics record for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightStatistics {
    pub total_points: usize,
    pub num_paths: usize,
    pub num_airports: usize,
    pub airport_names: Vec<String>,
    pub num_aircraft: usize,
    pub aircraft_list: Vec<AircraftSummary>,

    pub total_distance_km: f64,
    pub total_distance_nm: f64,
    pub longest_flight_km: f64,
    pub longest_flight_nm: f64,

    pub min_altitude_m: f64,
    pub min_altitude_ft: f64,
    pub max_altitude_m: f64,
    pub max_altitude_ft: f64,
    pub elevation_gain_m: f64,
    pub elevation_gain_ft: f64,

    pub max_groundspeed_knots: f64,
    pub avg_groundspeed_knots: f64,
    pub cruise_speed_knots: f64,
    pub most_common_cruise_altitude_ft: f64,
    pub most_common_cruise_altitude_m: f64,
    /// Number of segments classified as cruise.
    pub cruise_segments: usize,

    pub total_flight_time_seconds: f64,
    /// Formatted as `"{H}h {M}m"`.
    pub total_flight_time: String,
}

impl Default for FlightStatistics {
    fn default() -> Self {
        Self {
            total_points: 0,
            num_paths: 0,
            num_airports: 0,
            airport_names: Vec::new(),
            num_aircraft: 0,
            aircraft_list: Vec::new(),
            total_distance_km: 0.0,
            total_distance_nm: 0.0,
            longest_flight_km: 0.0,
            longest_flight_nm: 0.0,
            min_altitude_m: 0.0,
            min_altitude_ft: 0.0,
            max_altitude_m: 0.0,
            max_altitude_ft: 0.0,
            elevation_gain_m: 0.0,
            elevation_gain_ft: 0.0,
            max_groundspeed_knots: 0.0,
            avg_groundspeed_knots: 0.0,
            cruise_speed_knots: 0.0,
            most_common_cruise_altitude_ft: 0.0,
            most_common_cruise_altitude_m: 0.0,
            cruise_segments: 0,
            total_flight_time_seconds: 0.0,
            total_flight_time: format_hours_minutes(0.0),
        }
    }
}

/// Compute the summary for the flights matching the query's filters.
///
/// An empty match yields [`FlightStatistics::default()`].
pub fn filtered_statistics(query: &StatisticsQuery<'_>) -> FlightStatistics {
    let paths = filter_paths(query.paths, query.year, query.aircraft);
    if paths.is_empty() {
        return FlightStatistics::default();
    }

    let segments = filter_segments_by_paths(query.segments, paths.iter().copied());
    let segs = || segments.iter().copied();

    let airports = collect_airports(paths.iter().copied());
    let aircraft = aggregate_aircraft(paths.iter().copied());

    let distance_km = total_distance(segs());
    let longest_km = longest_flight(segs());
    let altitude = altitude_stats(segs());
    let speed = speed_stats(segs());
    let cruise_kt = cruise_speed(segs());
    let cruise_segments = segs().filter(|s| is_cruise_segment(s)).count();
    let modal_ft = modal_cruise_altitude(segs()).unwrap_or(0.0);
    let seconds = flight_time(segs(), paths.iter().copied());

    FlightStatistics {
        total_points: query.coordinate_count.unwrap_or(segments.len()),
        num_paths: paths.len(),
        num_airports: airports.len(),
        airport_names: airports.into_iter().collect(),
        num_aircraft: aircraft.len(),
        aircraft_list: aircraft,
        total_distance_km: distance_km,
        total_distance_nm: km_to_nm(distance_km),
        longest_flight_km: longest_km,
        longest_flight_nm: km_to_nm(longest_km),
        min_altitude_m: altitude.min,
        min_altitude_ft: meters_to_feet(altitude.min),
        max_altitude_m: altitude.max,
        max_altitude_ft: meters_to_feet(altitude.max),
        elevation_gain_m: altitude.gain,
        elevation_gain_ft: meters_to_feet(altitude.gain),
        max_groundspeed_knots: speed.max,
        avg_groundspeed_knots: speed.avg,
        cruise_speed_knots: cruise_kt,
        most_common_cruise_altitude_ft: modal_ft,
        most_common_cruise_altitude_m: feet_to_meters(modal_ft),
        cruise_segments,
        total_flight_time_seconds: seconds,
        total_flight_time: format_hours_minutes(seconds),
    }
}
