//! Replay sequencer.
//!
//! Turns one flight's segments into a time-ordered track and answers, for any
//! replay time, where the aircraft is, which way it is heading and how the
//! map camera should follow it.
//!
//! # Layers
//!
//! - [`prepare`], [`locate`], [`position_at`], [`smoothed_bearing`]: pure
//!   queries over a prepared track
//! - [`ReplaySession`]: state machine mapping wall-clock time to replay time
//! - [`ReplayDriver`]: tokio task publishing one [`ReplayFrame`] per tick
//!
//! # Example
//!
//! ```ignore
//! use flighttrace::replay::{ReplayConfig, ReplayDriver, ReplaySession};
//!
//! let mut session = ReplaySession::new(ReplayConfig::default());
//! session.prepare(&dataset.path_segments, flight_id)?;
//! let mut driver = ReplayDriver::new(session);
//! let frames = driver.subscribe();
//! driver.play();
//! ```

mod camera;
mod driver;
mod error;
mod sequence;
mod session;

pub use camera::{
    auto_zoom, progress, should_recenter, ViewBounds, ZoomConfig, DEFAULT_RECENTER_MARGIN,
};
pub use driver::{ReplayDriver, ReplayHandle, SharedSession};
pub use error::ReplayError;
pub use sequence::{
    interpolate, locate, position_at, prepare, smoothed_bearing, time_range, validate, Location,
    ReplayPosition, TimeRange, TimedSegment, DEFAULT_LOOKAHEAD,
};
pub use session::{ReplayConfig, ReplayFrame, ReplaySession, ReplayState, DEFAULT_FRAME_INTERVAL};
