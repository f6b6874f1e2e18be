//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::dataset::DetailTier;

const MARGIN_REASON: &str = "must be between 0 and 0.5";
const FRAME_INTERVAL_REASON: &str = "must be a positive integer (milliseconds)";

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [data] section
    if let Some(section) = ini.section(Some("data")) {
        if let Some(v) = non_empty(section, "directory") {
            config.data.directory = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section, "base_url") {
            config.data.base_url = Some(v.trim_end_matches('/').to_string());
        }
        if let Some(v) = non_empty(section, "default_tier") {
            config.data.default_tier =
                DetailTier::from_str(v).map_err(|_| ConfigFileError::InvalidValue {
                    section: "data".to_string(),
                    key: "default_tier".to_string(),
                    value: v.to_string(),
                    reason: "must be one of: z0_4, z5_7, z8_10, z11_13, z14_plus".to_string(),
                })?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = non_empty(section, "max_entries") {
            config.cache.max_entries = parse_number(
                v,
                "cache",
                "max_entries",
                "must be a non-negative integer (0 = unbounded)",
            )?;
        }
    }

    // [replay] section
    if let Some(section) = ini.section(Some("replay")) {
        let replay = &mut config.replay;
        if let Some(v) = non_empty(section, "lookahead") {
            replay.lookahead =
                parse_number(v, "replay", "lookahead", "must be a positive integer")?;
        }
        if let Some(v) = non_empty(section, "min_zoom") {
            replay.min_zoom = parse_number(v, "replay", "min_zoom", "must be an integer 0-22")?;
        }
        if let Some(v) = non_empty(section, "max_zoom") {
            replay.max_zoom = parse_number(v, "replay", "max_zoom", "must be an integer 0-22")?;
        }
        if let Some(v) = non_empty(section, "cruise_altitude_m") {
            replay.cruise_altitude_m = parse_positive(
                v,
                "replay",
                "cruise_altitude_m",
                "must be a positive number (meters)",
            )?;
        }
        if let Some(v) = non_empty(section, "cruise_speed_knots") {
            replay.cruise_speed_knots = parse_positive(
                v,
                "replay",
                "cruise_speed_knots",
                "must be a positive number (knots)",
            )?;
        }
        if let Some(v) = non_empty(section, "recenter_margin") {
            let margin: f64 = parse_number(v, "replay", "recenter_margin", MARGIN_REASON)?;
            if !(0.0..=0.5).contains(&margin) {
                return Err(invalid(v, "replay", "recenter_margin", MARGIN_REASON));
            }
            replay.recenter_margin = margin;
        }
        if let Some(v) = non_empty(section, "frame_interval_ms") {
            let interval: u64 =
                parse_number(v, "replay", "frame_interval_ms", FRAME_INTERVAL_REASON)?;
            if interval == 0 {
                return Err(invalid(v, "replay", "frame_interval_ms", FRAME_INTERVAL_REASON));
            }
            replay.frame_interval_ms = interval;
        }
        if let Some(v) = non_empty(section, "playback_speed") {
            replay.playback_speed =
                parse_positive(v, "replay", "playback_speed", "must be a positive number")?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = Some(expand_tilde(v));
        }
    }

    Ok(config)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(value: &str, section: &str, key: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value.parse().map_err(|_| invalid(value, section, key, reason))
}

fn parse_positive(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<f64, ConfigFileError> {
    let parsed: f64 = parse_number(value, section, key, reason)?;
    if parsed.is_finite() && parsed > 0.0 {
        Ok(parsed)
    } else {
        Err(invalid(value, section, key, reason))
    }
}

/// Expand a leading `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
