//! Playback driver.
//!
//! Runs a [`ReplaySession`] in real time: a tokio task ticks every
//! `frame_interval` and publishes the latest [`ReplayFrame`] on a `watch`
//! channel. The task is owned by a [`ReplayHandle`] and stops when its
//! cancellation token fires or the track finishes.
//!
//! # Example
//!
//! ```ignore
//! let mut driver = ReplayDriver::new(session);
//! let mut frames = driver.subscribe();
//! driver.play();
//! while frames.changed().await.is_ok() {
//!     if let Some(frame) = frames.borrow_and_update().clone() {
//!         render(&frame);
//!     }
//! }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::error::ReplayError;
use super::session::{ReplayFrame, ReplaySession, ReplayState};

/// Session shared between the driver task and its controller.
pub type SharedSession = Arc<Mutex<ReplaySession>>;

/// Handle to a running playback task.
#[derive(Debug)]
pub struct ReplayHandle {
    cancellation: CancellationToken,
    task: JoinHandle<()>,
}

impl ReplayHandle {
    /// Stop the task. Safe to call more than once.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Check if the task has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Check if the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Get the cancellation token.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Wait for the task to exit.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Real-time controller for a replay session.
///
/// Control calls must be made from within a tokio runtime.
pub struct ReplayDriver {
    session: SharedSession,
    frames: watch::Sender<Option<ReplayFrame>>,
    handle: Option<ReplayHandle>,
}

impl ReplayDriver {
    /// Wrap a session. Nothing runs until [`play`](Self::play).
    pub fn new(session: ReplaySession) -> Self {
        let (frames, _) = watch::channel(None);
        Self {
            session: Arc::new(Mutex::new(session)),
            frames,
            handle: None,
        }
    }

    /// Subscribe to published frames.
    pub fn subscribe(&self) -> watch::Receiver<Option<ReplayFrame>> {
        self.frames.subscribe()
    }

    /// The shared session.
    pub fn session(&self) -> SharedSession {
        Arc::clone(&self.session)
    }

    /// Current session state.
    pub fn state(&self) -> ReplayState {
        self.session.lock().state()
    }

    /// Whether a playback task is running.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled() && !handle.is_finished())
    }

    /// Start or resume playback. Returns false when nothing is prepared.
    pub fn play(&mut self) -> bool {
        self.cancel_task();

        let interval = {
            let mut session = self.session.lock();
            if !session.play(now()) {
                return false;
            }
            session.config().frame_interval
        };

        self.handle = Some(spawn_ticker(
            Arc::clone(&self.session),
            self.frames.clone(),
            interval,
        ));
        true
    }

    /// Pause playback. The task is cancelled before the state changes.
    pub fn pause(&mut self) {
        self.cancel_task();
        let mut session = self.session.lock();
        session.pause(now());
        self.frames.send_replace(session.frame_at(now()));
    }

    /// Stop playback and rewind. The task is cancelled before the state changes.
    pub fn stop(&mut self) {
        self.cancel_task();
        let mut session = self.session.lock();
        session.stop();
        self.frames.send_replace(session.frame_at(now()));
    }

    /// Jump to replay time `t`.
    pub fn seek(&self, t: f64) {
        let mut session = self.session.lock();
        session.seek(t);
        if session.state() != ReplayState::Playing {
            self.frames.send_replace(session.frame_at(now()));
        }
    }

    /// Change the playback speed multiplier.
    pub fn set_speed(&self, speed: f64) -> Result<(), ReplayError> {
        self.session.lock().set_speed(speed, now())
    }

    /// Detach the running task, if any, leaving it cancelled.
    ///
    /// The session keeps its state; join the handle to wait for the task to
    /// exit.
    pub fn take_handle(&mut self) -> Option<ReplayHandle> {
        let handle = self.handle.take()?;
        handle.cancel();
        Some(handle)
    }

    fn cancel_task(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

impl Drop for ReplayDriver {
    fn drop(&mut self) {
        self.cancel_task();
    }
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

fn spawn_ticker(
    session: SharedSession,
    frames: watch::Sender<Option<ReplayFrame>>,
    interval: Duration,
) -> ReplayHandle {
    let cancellation = CancellationToken::new();
    let token = cancellation.clone();
    let period = interval.max(Duration::from_millis(1));

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!(interval_ms = period.as_millis() as u64, "Replay ticker started");

        loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    debug!("Replay ticker cancelled");
                    break;
                }

                _ = ticker.tick() => {
                    if !tick(&session, &frames, &token) {
                        break;
                    }
                }
            }
        }
    });

    ReplayHandle { cancellation, task }
}

/// Publish one frame. Returns false when the ticker should exit.
///
/// The frame is published under the session lock, so a concurrent pause or
/// stop always publishes after it.
fn tick(
    session: &SharedSession,
    frames: &watch::Sender<Option<ReplayFrame>>,
    token: &CancellationToken,
) -> bool {
    let mut session = session.lock();
    if token.is_cancelled() {
        return false;
    }
    let frame = session.frame_at(now());
    let finished = frame.as_ref().map_or(true, |f| f.finished);
    frames.send_replace(frame);
    if finished {
        info!(flight_id = ?session.flight_id(), "Replay finished");
    }
    !finished
}
