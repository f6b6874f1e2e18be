//! FlightTrace - Telemetry analytics and replay for recorded flight tracks
//!
//! This library turns recorded flight telemetry (position, altitude, groundspeed
//! and time, grouped into flights) into aggregate statistics for a filtered set
//! of flights and a time-indexed replay of a single flight.
//!
//! # Modules
//!
//! - [`geo`] - Great-circle distance, bearing and DMS formatting
//! - [`model`] - Flight paths, telemetry segments, airports and datasets
//! - [`dataset`] - Multi-resolution dataset cache with injectable sources
//! - [`stats`] - Statistics aggregation, value ranges and render hints
//! - [`replay`] - Replay sequencing, camera hints and the playback driver
//! - [`config`] - Configuration file handling
//! - [`logging`] - Tracing subscriber setup

pub mod config;
pub mod dataset;
pub mod geo;
pub mod logging;
pub mod model;
pub mod replay;
pub mod stats;
pub mod units;

/// Library version, taken from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
