//! Per-segment render hints.
//!
//! Colors come from a five-stop gradient over the normalized altitude or
//! speed. Weight and opacity depend on whether a selection is active and
//! whether the segment belongs to it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ranges::ValueRange;
use crate::model::{PathId, TelemetrySegment};

/// Gradient stops from low to high, as RGB.
const GRADIENT: [(u8, u8, u8); 5] = [
    (0x2b, 0x83, 0xba),
    (0xab, 0xdd, 0xa4),
    (0xff, 0xff, 0xbf),
    (0xfd, 0xae, 0x61),
    (0xd7, 0x19, 0x1c),
];

/// Value a segment is colored by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Altitude,
    Speed,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Altitude => write!(f, "altitude"),
            ColorMode::Speed => write!(f, "speed"),
        }
    }
}

/// Line weight and opacity for one selection state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub weight: f64,
    pub opacity: f64,
}

/// Styling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Color for segments without the colored value.
    pub neutral_color: String,
    /// Segment in the active selection.
    pub selected: LineStyle,
    /// Segment outside the active selection.
    pub unselected: LineStyle,
    /// No selection active.
    pub default: LineStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            neutral_color: "#888888".to_string(),
            selected: LineStyle {
                weight: 4.0,
                opacity: 0.9,
            },
            unselected: LineStyle {
                weight: 2.0,
                opacity: 0.25,
            },
            default: LineStyle {
                weight: 3.0,
                opacity: 0.8,
            },
        }
    }
}

impl StyleConfig {
    /// Set the neutral color.
    pub fn with_neutral_color(mut self, color: impl Into<String>) -> Self {
        self.neutral_color = color.into();
        self
    }

    /// Set the style of selected segments.
    pub fn with_selected(mut self, weight: f64, opacity: f64) -> Self {
        self.selected = LineStyle { weight, opacity };
        self
    }

    /// Set the style of segments outside the selection.
    pub fn with_unselected(mut self, weight: f64, opacity: f64) -> Self {
        self.unselected = LineStyle { weight, opacity };
        self
    }
}

/// Render hint for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStyle {
    /// `#rrggbb`.
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

/// Gradient color at position `t` in `[0, 1]`.
pub fn gradient_color(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (GRADIENT.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(GRADIENT.len() - 2);
    let frac = scaled - lower as f64;

    let (r0, g0, b0) = GRADIENT[lower];
    let (r1, g1, b1) = GRADIENT[lower + 1];
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

    format!("#{:02x}{:02x}{:02x}", mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// Style a segment for the map layer.
///
/// Without a range, or when the segment lacks the colored value, the neutral
/// color is used.
pub fn segment_style(
    segment: &TelemetrySegment,
    mode: ColorMode,
    range: Option<&ValueRange>,
    selection: Option<&HashSet<PathId>>,
    config: &StyleConfig,
) -> SegmentStyle {
    let value = match mode {
        ColorMode::Altitude => segment.altitude_meters(),
        ColorMode::Speed => segment.groundspeed_knots.filter(|speed| *speed > 0.0),
    };

    let color = match (value, range) {
        (Some(v), Some(range)) if v.is_finite() => gradient_color(range.normalize(v)),
        _ => config.neutral_color.clone(),
    };

    let line = match selection {
        Some(ids) if ids.contains(&segment.path_id) => config.selected,
        Some(_) => config.unselected,
        None => config.default,
    };

    SegmentStyle {
        color,
        weight: line.weight,
        opacity: line.opacity,
    }
}
