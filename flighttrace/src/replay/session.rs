//! Replay session state machine.
//!
//! ```text
//! Idle ──prepare──► Prepared ──play──► Playing ◄──play/pause──► Paused
//!   ▲                                     │                       │
//!   └──────────reset──────── Stopped ◄────┴─────────stop──────────┘
//! ```
//!
//! A session maps wall-clock instants to replay time through an anchor
//! (instant, replay time) captured whenever playback starts or is rebased.
//! Frames are snapshots computed from the anchor, so asking twice for the
//! same instant yields the same frame.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::camera::{auto_zoom, progress, ZoomConfig, DEFAULT_RECENTER_MARGIN};
use super::error::ReplayError;
use super::sequence::{
    locate, position_at, prepare, smoothed_bearing, time_range, validate, ReplayPosition,
    TimeRange, TimedSegment, DEFAULT_LOOKAHEAD,
};
use crate::model::{PathId, TelemetrySegment};

/// Default tick period of the playback driver.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle state of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayState {
    /// Nothing prepared.
    #[default]
    Idle,
    /// Track loaded, positioned at the start.
    Prepared,
    /// Replay time advances with the wall clock.
    Playing,
    /// Replay time frozen.
    Paused,
    /// Playback ended by the user; position back at the start.
    Stopped,
}

impl fmt::Display for ReplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplayState::Idle => "idle",
            ReplayState::Prepared => "prepared",
            ReplayState::Playing => "playing",
            ReplayState::Paused => "paused",
            ReplayState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Replay parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    /// Segments looked ahead when smoothing the heading.
    pub lookahead: usize,
    /// Auto-zoom parameters.
    pub zoom: ZoomConfig,
    /// Fraction of the view span that triggers recentering.
    pub recenter_margin: f64,
    /// Tick period of the playback driver.
    pub frame_interval: Duration,
    /// Initial playback speed multiplier.
    pub playback_speed: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            zoom: ZoomConfig::default(),
            recenter_margin: DEFAULT_RECENTER_MARGIN,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            playback_speed: 1.0,
        }
    }
}

impl ReplayConfig {
    /// Set the heading lookahead.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Set the auto-zoom parameters.
    pub fn with_zoom(mut self, zoom: ZoomConfig) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the recenter margin.
    pub fn with_recenter_margin(mut self, margin: f64) -> Self {
        self.recenter_margin = margin;
        self
    }

    /// Set the driver tick period.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Set the initial playback speed.
    pub fn with_playback_speed(mut self, speed: f64) -> Self {
        self.playback_speed = speed;
        self
    }
}

/// Snapshot of the replay at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Replay time in seconds.
    pub time: f64,
    /// Index of the active segment in the track.
    pub index: usize,
    /// Interpolated aircraft state; `None` when the active segment has no coordinates.
    pub position: Option<ReplayPosition>,
    /// Smoothed heading in degrees.
    pub heading: Option<f64>,
    /// Suggested map zoom.
    pub zoom: u8,
    /// Percentage of the track covered.
    pub progress: f64,
    /// True once replay time reached the end of the track.
    pub finished: bool,
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    instant: Instant,
    time: f64,
}

/// A single-flight replay.
#[derive(Debug)]
pub struct ReplaySession {
    config: ReplayConfig,
    flight_id: Option<PathId>,
    track: Vec<TimedSegment>,
    range: TimeRange,
    state: ReplayState,
    /// Replay time while not playing, and the rebase point while playing.
    time: f64,
    anchor: Option<Anchor>,
    speed: f64,
}

impl Default for ReplaySession {
    fn default() -> Self {
        Self::new(ReplayConfig::default())
    }
}

impl ReplaySession {
    /// Create an idle session.
    ///
    /// A non-positive configured playback speed falls back to 1.0.
    pub fn new(config: ReplayConfig) -> Self {
        let speed = if config.playback_speed.is_finite() && config.playback_speed > 0.0 {
            config.playback_speed
        } else {
            1.0
        };
        Self {
            config,
            flight_id: None,
            track: Vec::new(),
            range: TimeRange::default(),
            state: ReplayState::Idle,
            time: 0.0,
            anchor: None,
            speed,
        }
    }

    /// Load one flight's track and position at its start.
    ///
    /// Returns the number of timestamped segments in the track.
    pub fn prepare(
        &mut self,
        segments: &[TelemetrySegment],
        flight_id: PathId,
    ) -> Result<usize, ReplayError> {
        let flight: Vec<TelemetrySegment> = segments
            .iter()
            .filter(|segment| segment.path_id == flight_id)
            .cloned()
            .collect();
        validate(&flight)?;

        self.track = prepare(&flight, flight_id);
        self.range = time_range(&self.track);
        self.flight_id = Some(flight_id);
        self.time = self.range.min;
        self.anchor = None;
        self.transition(ReplayState::Prepared);

        info!(
            flight_id,
            segments = self.track.len(),
            duration_s = self.range.duration(),
            "Replay prepared"
        );
        Ok(self.track.len())
    }

    /// Start or resume playback. Returns false when there is nothing to play.
    ///
    /// Playing from the end of the track restarts from the beginning.
    pub fn play(&mut self, now: Instant) -> bool {
        match self.state {
            ReplayState::Idle => false,
            ReplayState::Playing => true,
            ReplayState::Prepared | ReplayState::Paused | ReplayState::Stopped => {
                if self.time >= self.range.max && self.range.duration() > 0.0 {
                    self.time = self.range.min;
                }
                self.anchor = Some(Anchor {
                    instant: now,
                    time: self.time,
                });
                self.transition(ReplayState::Playing);
                true
            }
        }
    }

    /// Freeze replay time. No-op unless playing.
    pub fn pause(&mut self, now: Instant) {
        if self.state != ReplayState::Playing {
            return;
        }
        self.time = self.current_time(now);
        self.anchor = None;
        self.transition(ReplayState::Paused);
    }

    /// Stop playback and rewind to the start. No-op when idle or stopped.
    pub fn stop(&mut self) {
        if matches!(self.state, ReplayState::Idle | ReplayState::Stopped) {
            return;
        }
        self.time = self.range.min;
        self.anchor = None;
        self.transition(ReplayState::Stopped);
    }

    /// Drop the track and return to idle.
    pub fn reset(&mut self) {
        self.track.clear();
        self.range = TimeRange::default();
        self.flight_id = None;
        self.time = 0.0;
        self.anchor = None;
        self.transition(ReplayState::Idle);
    }

    /// Jump to replay time `t`, clamped to the track.
    ///
    /// While playing, playback continues from `t` at the next frame.
    pub fn seek(&mut self, t: f64) {
        if self.state == ReplayState::Idle {
            return;
        }
        self.time = self.range.clamp(t);
        if self.state == ReplayState::Playing {
            self.anchor = None;
        }
        debug!(time = self.time, "Replay seek");
    }

    /// Change the playback speed multiplier.
    pub fn set_speed(&mut self, speed: f64, now: Instant) -> Result<(), ReplayError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ReplayError::InvalidSpeed(speed));
        }
        if self.state == ReplayState::Playing {
            self.time = self.current_time(now);
            self.anchor = Some(Anchor {
                instant: now,
                time: self.time,
            });
        }
        self.speed = speed;
        debug!(speed, "Replay speed changed");
        Ok(())
    }

    /// Replay time at `now`, clamped to the track.
    pub fn current_time(&self, now: Instant) -> f64 {
        match (self.state, self.anchor) {
            (ReplayState::Playing, Some(anchor)) => {
                let elapsed = now.saturating_duration_since(anchor.instant).as_secs_f64();
                self.range.clamp(anchor.time + elapsed * self.speed)
            }
            _ => self.time,
        }
    }

    /// Compute the frame at `now`.
    ///
    /// Reaching the end of the track clamps to the last timestamp, marks the
    /// frame finished and pauses the session. `None` when idle.
    pub fn frame_at(&mut self, now: Instant) -> Option<ReplayFrame> {
        if self.track.is_empty() {
            return None;
        }

        if self.state == ReplayState::Playing && self.anchor.is_none() {
            self.anchor = Some(Anchor {
                instant: now,
                time: self.time,
            });
        }

        let time = self.current_time(now);
        let finished = time >= self.range.max;
        if finished && self.state == ReplayState::Playing {
            self.time = self.range.max;
            self.anchor = None;
            self.transition(ReplayState::Paused);
            info!(flight_id = ?self.flight_id, "Replay reached end of track");
        }

        Some(self.frame_for(time, finished))
    }

    fn frame_for(&self, time: f64, finished: bool) -> ReplayFrame {
        let location = locate(&self.track, time);
        let index = location.index.unwrap_or(0);
        let position = position_at(&self.track, time);
        let heading = smoothed_bearing(&self.track, index, self.config.lookahead);
        let zoom = auto_zoom(
            position.and_then(|p| p.altitude_m).unwrap_or(0.0),
            position.and_then(|p| p.speed_knots).unwrap_or(0.0),
            &self.config.zoom,
        );

        ReplayFrame {
            time,
            index,
            position,
            heading,
            zoom,
            progress: progress(time - self.range.min, self.range.duration()),
            finished,
        }
    }

    fn transition(&mut self, next: ReplayState) {
        if self.state != next {
            info!(from = %self.state, to = %next, "Replay state changed");
            self.state = next;
        }
    }

    /// Current state.
    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// Prepared flight, if any.
    pub fn flight_id(&self) -> Option<PathId> {
        self.flight_id
    }

    /// The prepared track.
    pub fn track(&self) -> &[TimedSegment] {
        &self.track
    }

    /// Timestamp bounds of the prepared track.
    pub fn time_range(&self) -> TimeRange {
        self.range
    }

    /// Playback speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Session parameters.
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }
}
