//! Replay errors.

use thiserror::Error;

/// Errors that prevent a replay from being prepared or driven.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum ReplayError {
    /// There are no segments to replay.
    #[error("No segments available for replay")]
    NoSegments,

    /// None of the segments carries a timestamp.
    #[error("No timestamped segments available for replay")]
    NoTimestamps,

    /// Playback speed must be finite and greater than zero.
    #[error("Invalid playback speed {0}: must be greater than zero")]
    InvalidSpeed(f64),
}
