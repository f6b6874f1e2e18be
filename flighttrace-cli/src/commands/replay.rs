//! `flighttrace replay` - replay one flight in real time.

use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use flighttrace::dataset::ALL_YEARS;
use flighttrace::model::{GeoPoint, PathId};
use flighttrace::replay::{
    should_recenter, ReplayDriver, ReplayFrame, ReplaySession, ViewBounds,
};
use flighttrace::units::{format_hours_minutes, format_timestamp, meters_to_feet};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Half-extent of the virtual map view used for recenter hints, in degrees.
const VIEW_HALF_SPAN_DEG: f64 = 0.05;

/// Arguments for the replay command.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Flight (path) id to replay
    #[arg(long)]
    pub flight: PathId,

    /// Detail tier to load (default: [data] default_tier)
    #[arg(long)]
    pub tier: Option<String>,

    /// Year to load, or "all"
    #[arg(long, default_value = ALL_YEARS)]
    pub year: String,

    /// Playback speed multiplier (default: [replay] playback_speed)
    #[arg(long)]
    pub speed: Option<f64>,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<usize>,

    /// Print one JSON frame per line instead of a progress display
    #[arg(long)]
    pub json: bool,
}

/// Run the replay command.
pub async fn run(runner: &CliRunner, args: ReplayArgs) -> Result<(), CliError> {
    runner.log_startup("replay");
    let tier = runner.tier_or_default(args.tier);
    let dataset = runner.cache().load(&tier, &args.year).await?;

    let config = runner.config().replay_config();
    let margin = config.recenter_margin;
    let mut session = ReplaySession::new(config);
    let segments = session.prepare(&dataset.path_segments, args.flight)?;
    if let Some(speed) = args.speed {
        session.set_speed(speed, Instant::now())?;
    }
    let range = session.time_range();
    let speed = session.speed();

    if !args.json {
        println!(
            "Replaying flight {} ({} segments, {} of flight time at {}x)",
            style(args.flight).bold(),
            segments,
            format_hours_minutes(range.duration()),
            speed
        );
    }

    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut driver = ReplayDriver::new(session);
    let mut frames = driver.subscribe();
    let bar = (!args.json).then(progress_bar);
    let mut view: Option<ViewBounds> = None;
    let mut published = 0usize;

    driver.play();
    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!(flight = args.flight, "Replay interrupted");
                break;
            }

            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = frames.borrow_and_update().clone();
                let Some(frame) = frame else {
                    continue;
                };
                published += 1;

                let recenter = track_view(&mut view, &frame, margin);
                if args.json {
                    println!("{}", serde_json::to_string(&frame)?);
                } else if let Some(bar) = &bar {
                    bar.set_position(frame.progress.round() as u64);
                    bar.println(format_frame(&frame, recenter));
                }

                let limit_reached = args.max_frames.is_some_and(|max| published >= max);
                if frame.finished || limit_reached {
                    break;
                }
            }
        }
    }

    driver.stop();
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    info!(flight = args.flight, frames = published, "Replay ended");

    if !args.json {
        println!("{} {} frames", style("Done:").green().bold(), published);
    }
    Ok(())
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    if let Ok(template) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}") {
        bar.set_style(template);
    }
    bar.enable_steady_tick(Duration::from_millis(200));
    bar
}

/// Keep a virtual map view centered on the aircraft.
///
/// Returns true when the view had to move.
fn track_view(view: &mut Option<ViewBounds>, frame: &ReplayFrame, margin: f64) -> bool {
    let Some(position) = frame.position else {
        return false;
    };
    let point = GeoPoint::new(position.lat, position.lon);
    match view.as_ref() {
        Some(bounds) if !should_recenter(point, bounds, margin) => false,
        _ => {
            *view = Some(ViewBounds::around(
                point,
                VIEW_HALF_SPAN_DEG,
                VIEW_HALF_SPAN_DEG,
            ));
            true
        }
    }
}

fn format_frame(frame: &ReplayFrame, recenter: bool) -> String {
    let time = format_timestamp(frame.time).unwrap_or_else(|| format!("{:.0}s", frame.time));
    let position = frame
        .position
        .map(|p| GeoPoint::new(p.lat, p.lon).to_string())
        .unwrap_or_else(|| "(no position)".to_string());
    let altitude = frame
        .position
        .and_then(|p| p.altitude_m)
        .map(|m| format!("{:>6.0} ft", meters_to_feet(m)))
        .unwrap_or_else(|| "     - ft".to_string());
    let speed = frame
        .position
        .and_then(|p| p.speed_knots)
        .map(|kt| format!("{:>4.0} kt", kt))
        .unwrap_or_else(|| "   - kt".to_string());
    let heading = frame
        .heading
        .map(|h| format!("{:03.0}", h))
        .unwrap_or_else(|| "---".to_string());

    format!(
        "{} {} {} {} hdg {} z{}{}",
        style(time).dim(),
        position,
        altitude,
        speed,
        heading,
        frame.zoom,
        if recenter { " [recenter]" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flighttrace::replay::ReplayPosition;

    fn frame_at(lat: f64, lon: f64) -> ReplayFrame {
        ReplayFrame {
            time: 0.0,
            index: 0,
            position: Some(ReplayPosition {
                lat,
                lon,
                altitude_m: Some(1000.0),
                speed_knots: Some(95.0),
            }),
            heading: Some(90.0),
            zoom: 14,
            progress: 0.0,
            finished: false,
        }
    }

    #[test]
    fn test_track_view_recenters_near_edge() {
        let mut view = None;
        assert!(track_view(&mut view, &frame_at(37.0, -122.0), 0.2));
        assert!(!track_view(&mut view, &frame_at(37.01, -122.0), 0.2));
        assert!(track_view(&mut view, &frame_at(37.045, -122.0), 0.2));
    }

    #[test]
    fn test_format_frame_includes_fields() {
        let line = format_frame(&frame_at(37.0, -122.0), true);
        assert!(line.contains("kt"));
        assert!(line.contains("hdg 090"));
        assert!(line.contains("[recenter]"));
    }
}
