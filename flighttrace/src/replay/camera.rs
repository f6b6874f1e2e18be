//! Camera hints: auto-zoom, recentering and progress.

use serde::{Deserialize, Serialize};

use crate::model::GeoPoint;

/// Default fraction of the view span treated as the recenter margin.
pub const DEFAULT_RECENTER_MARGIN: f64 = 0.2;

/// Parameters for [`auto_zoom`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Zoom used at or above twice the cruise reference values.
    pub min_zoom: u8,
    /// Zoom used on the ground.
    pub max_zoom: u8,
    /// Reference cruise altitude in meters.
    pub cruise_altitude_m: f64,
    /// Reference cruise speed in knots.
    pub cruise_speed_knots: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_zoom: 10,
            max_zoom: 16,
            cruise_altitude_m: 5000.0,
            cruise_speed_knots: 100.0,
        }
    }
}

impl ZoomConfig {
    /// Set the zoom bounds. The bounds are swapped if given out of order.
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom.min(max_zoom);
        self.max_zoom = min_zoom.max(max_zoom);
        self
    }

    /// Set the cruise reference values.
    pub fn with_cruise(mut self, altitude_m: f64, speed_knots: f64) -> Self {
        self.cruise_altitude_m = altitude_m;
        self.cruise_speed_knots = speed_knots;
        self
    }
}

fn factor(value: f64, reference: f64) -> f64 {
    if !(value.is_finite() && reference.is_finite()) || reference <= 0.0 {
        return 0.0;
    }
    (value / reference).clamp(0.0, 2.0)
}

/// Pick a map zoom from altitude and speed.
///
/// Higher and faster zooms out: each value is expressed as a factor of its
/// cruise reference (capped at 2), the two factors are averaged, and the zoom
/// drops from `max_zoom` by up to the full zoom span.
pub fn auto_zoom(altitude_m: f64, speed_knots: f64, config: &ZoomConfig) -> u8 {
    let (min, max) = (
        config.min_zoom.min(config.max_zoom) as f64,
        config.min_zoom.max(config.max_zoom) as f64,
    );
    let combined = (factor(altitude_m, config.cruise_altitude_m)
        + factor(speed_knots, config.cruise_speed_knots))
        / 2.0;
    let zoom = max - combined * (max - min) * 0.5;
    zoom.clamp(min, max).round() as u8
}

/// Visible map area in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl ViewBounds {
    /// Bounds of the given half-extent around a center point.
    pub fn around(center: GeoPoint, half_lat: f64, half_lon: f64) -> Self {
        Self {
            north: center.lat + half_lat,
            south: center.lat - half_lat,
            east: center.lon + half_lon,
            west: center.lon - half_lon,
        }
    }

    /// Whether the point lies inside the bounds.
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat <= self.north
            && point.lat >= self.south
            && point.lon <= self.east
            && point.lon >= self.west
    }
}

/// Whether the camera should recenter on `position`.
///
/// True when the position is outside the bounds, or within `margin` (a
/// fraction of the view span) of any edge.
pub fn should_recenter(position: GeoPoint, bounds: &ViewBounds, margin: f64) -> bool {
    if !bounds.contains(position) {
        return true;
    }

    let margin = if margin.is_finite() {
        margin.clamp(0.0, 0.5)
    } else {
        DEFAULT_RECENTER_MARGIN
    };
    let lat_margin = (bounds.north - bounds.south) * margin;
    let lon_margin = (bounds.east - bounds.west) * margin;

    position.lat > bounds.north - lat_margin
        || position.lat < bounds.south + lat_margin
        || position.lon > bounds.east - lon_margin
        || position.lon < bounds.west + lon_margin
}

/// Progress through a replay as a percentage in `[0, 100]`.
pub fn progress(current: f64, max: f64) -> f64 {
    if !(current.is_finite() && max.is_finite()) || max <= 0.0 {
        return 0.0;
    }
    (current / max * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_zoom_on_ground_is_max() {
        let config = ZoomConfig::default();
        assert_eq!(auto_zoom(0.0, 0.0, &config), 16);
    }

    #[test]
    fn test_auto_zoom_at_cruise_is_midpoint() {
        let config = ZoomConfig::default();
        // Both factors 1 -> 16 - 1 * 6 * 0.5 = 13
        assert_eq!(auto_zoom(5000.0, 100.0, &config), 13);
    }

    #[test]
    fn test_auto_zoom_caps_factors() {
        let config = ZoomConfig::default();
        assert_eq!(auto_zoom(50_000.0, 900.0, &config), 10);
        assert_eq!(auto_zoom(-300.0, -5.0, &config), 16);
        assert_eq!(auto_zoom(f64::NAN, f64::INFINITY, &config), 16);
    }

    #[test]
    fn test_auto_zoom_custom_range() {
        let config = ZoomConfig::default().with_zoom_range(14, 8);
        assert_eq!(config.min_zoom, 8);
        assert_eq!(auto_zoom(10_000.0, 200.0, &config), 8);
    }

    #[test]
    fn test_should_recenter() {
        let bounds = ViewBounds {
            north: 10.0,
            south: 0.0,
            east: 10.0,
            west: 0.0,
        };
        assert!(!should_recenter(GeoPoint::new(5.0, 5.0), &bounds, 0.2));
        assert!(should_recenter(GeoPoint::new(9.0, 5.0), &bounds, 0.2));
        assert!(should_recenter(GeoPoint::new(5.0, 1.0), &bounds, 0.2));
        assert!(should_recenter(GeoPoint::new(20.0, 5.0), &bounds, 0.2));
    }

    #[test]
    fn test_view_bounds_around() {
        let bounds = ViewBounds::around(GeoPoint::new(37.0, -122.0), 0.5, 1.0);
        assert_eq!(bounds.north, 37.5);
        assert_eq!(bounds.west, -123.0);
        assert!(!should_recenter(GeoPoint::new(37.0, -122.0), &bounds, DEFAULT_RECENTER_MARGIN));
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress(50.0, 200.0), 25.0);
        assert_eq!(progress(10.0, 0.0), 0.0);
        assert_eq!(progress(300.0, 200.0), 100.0);
        assert_eq!(progress(-1.0, 200.0), 0.0);
    }
}
