//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented INI representation written to `config.ini`, and
//! the flat `section.key = value` listing used by `config list`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let directory = optional_path(config.data.directory.as_deref());
    let base_url = config.data.base_url.as_deref().unwrap_or("");
    let log_file = optional_path(config.logging.file.as_deref());
    let replay = &config.replay;

    format!(
        r#"[data]
; Local directory holding metadata.json and the <tier>_<year>.json files
; Example: directory = ~/flight-data
directory = {}
; Base URL serving the same files (used when directory is empty)
; Example: base_url = https://example.com/flight-data
base_url = {}
; Detail tier used when none is given: z0_4, z5_7, z8_10, z11_13, z14_plus
default_tier = {}

[cache]
; Maximum number of datasets kept in memory (0 = unbounded)
max_entries = {}

[replay]
; Segments looked ahead when smoothing the heading (default: 5)
lookahead = {}
; Zoom range used by auto-zoom (default: 10-16)
min_zoom = {}
max_zoom = {}
; Cruise reference values for auto-zoom (default: 5000 m, 100 kt)
cruise_altitude_m = {}
cruise_speed_knots = {}
; Fraction of the view span that triggers recentering (default: 0.2)
recenter_margin = {}
; Playback tick period in milliseconds (default: 100)
frame_interval_ms = {}
; Playback speed multiplier (default: 1)
playback_speed = {}

[logging]
; Log file path (default: ~/.flighttrace/flighttrace.log)
file = {}
"#,
        directory,
        base_url,
        config.data.default_tier,
        config.cache.max_entries,
        replay.lookahead,
        replay.min_zoom,
        replay.max_zoom,
        replay.cruise_altitude_m,
        replay.cruise_speed_knots,
        replay.recenter_margin,
        replay.frame_interval_ms,
        replay.playback_speed,
        log_file,
    )
}

/// Flatten a `ConfigFile` into `(section.key, value)` pairs.
pub fn to_entries(config: &ConfigFile) -> Vec<(&'static str, String)> {
    let replay = &config.replay;
    vec![
        ("data.directory", optional_path(config.data.directory.as_deref())),
        (
            "data.base_url",
            config.data.base_url.clone().unwrap_or_default(),
        ),
        ("data.default_tier", config.data.default_tier.to_string()),
        ("cache.max_entries", config.cache.max_entries.to_string()),
        ("replay.lookahead", replay.lookahead.to_string()),
        ("replay.min_zoom", replay.min_zoom.to_string()),
        ("replay.max_zoom", replay.max_zoom.to_string()),
        ("replay.cruise_altitude_m", replay.cruise_altitude_m.to_string()),
        ("replay.cruise_speed_knots", replay.cruise_speed_knots.to_string()),
        ("replay.recenter_margin", replay.recenter_margin.to_string()),
        ("replay.frame_interval_ms", replay.frame_interval_ms.to_string()),
        ("replay.playback_speed", replay.playback_speed.to_string()),
        ("logging.file", optional_path(config.logging.file.as_deref())),
    ]
}

fn optional_path(path: Option<&Path>) -> String {
    path.map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ini::Ini;

    #[test]
    fn test_written_config_parses_back() {
        let mut config = ConfigFile::default();
        config.data.base_url = Some("https://example.com/data".to_string());
        config.replay.recenter_margin = 0.3;

        let content = to_config_string(&config);
        let ini = Ini::load_from_str(&content).unwrap();
        let parsed = super::super::parser::parse_ini(&ini).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_entries_cover_every_section() {
        let entries = to_entries(&ConfigFile::default());
        for prefix in ["data.", "cache.", "replay.", "logging."] {
            assert!(entries.iter().any(|(key, _)| key.starts_with(prefix)));
        }
        let tier = entries
            .iter()
            .find(|(key, _)| *key == "data.default_tier")
            .map(|(_, v)| v.as_str());
        assert_eq!(tier, Some("z0_4"));
    }
}
