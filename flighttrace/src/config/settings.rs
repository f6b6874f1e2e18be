//! Settings structs for each section of `config.ini`.
//!
//! Pure data types; parsing lives in `parser`, serialization in `writer`.

use std::path::PathBuf;
use std::time::Duration;

use crate::dataset::{DatasetCacheConfig, DetailTier};
use crate::replay::{ReplayConfig, ZoomConfig, DEFAULT_LOOKAHEAD, DEFAULT_RECENTER_MARGIN};

/// Default driver tick period in milliseconds.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 100;

/// Default maximum number of cached datasets (0 = unbounded).
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 0;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// Dataset location settings
    pub data: DataSettings,
    /// Dataset cache settings
    pub cache: CacheSettings,
    /// Replay settings
    pub replay: ReplaySettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Where datasets are loaded from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSettings {
    /// Local directory holding `metadata.json` and the per-tier files.
    pub directory: Option<PathBuf>,
    /// Base URL serving the same files; used when no directory is set.
    pub base_url: Option<String>,
    /// Tier used when none is given on the command line.
    pub default_tier: DetailTier,
}

/// Dataset cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Maximum cached datasets; 0 means unbounded.
    pub max_entries: u64,
}

/// Replay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySettings {
    pub lookahead: usize,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub cruise_altitude_m: f64,
    pub cruise_speed_knots: f64,
    pub recenter_margin: f64,
    pub frame_interval_ms: u64,
    pub playback_speed: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggingSettings {
    /// Log file path; defaults to `~/.flighttrace/flighttrace.log`.
    pub file: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl Default for ReplaySettings {
    fn default() -> Self {
        let zoom = ZoomConfig::default();
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            min_zoom: zoom.min_zoom,
            max_zoom: zoom.max_zoom,
            cruise_altitude_m: zoom.cruise_altitude_m,
            cruise_speed_knots: zoom.cruise_speed_knots,
            recenter_margin: DEFAULT_RECENTER_MARGIN,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            playback_speed: 1.0,
        }
    }
}

impl ConfigFile {
    /// Dataset cache configuration derived from `[cache]`.
    pub fn cache_config(&self) -> DatasetCacheConfig {
        match self.cache.max_entries {
            0 => DatasetCacheConfig::default(),
            n => DatasetCacheConfig::default().with_max_entries(n),
        }
    }

    /// Replay configuration derived from `[replay]`.
    pub fn replay_config(&self) -> ReplayConfig {
        let replay = &self.replay;
        ReplayConfig::default()
            .with_lookahead(replay.lookahead)
            .with_zoom(
                ZoomConfig::default()
                    .with_zoom_range(replay.min_zoom, replay.max_zoom)
                    .with_cruise(replay.cruise_altitude_m, replay.cruise_speed_knots),
            )
            .with_recenter_margin(replay.recenter_margin)
            .with_frame_interval(Duration::from_millis(replay.frame_interval_ms))
            .with_playback_speed(replay.playback_speed)
    }
}
