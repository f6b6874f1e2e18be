//! Resolution-tagged dataset bundles.

use serde::{Deserialize, Serialize};

use super::{FlightPath, GeoPoint, TelemetrySegment};

/// Everything a tier/year combination contributes.
///
/// Datasets are immutable once loaded; the cache shares them as `Arc<Dataset>`
/// and builds the "all years" view by concatenating per-year datasets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Detail tier identifier this dataset was produced for.
    #[serde(default)]
    pub resolution: Option<String>,

    /// Raw coordinate points for density rendering.
    #[serde(default)]
    pub coordinates: Vec<GeoPoint>,

    /// Telemetry segments.
    #[serde(default)]
    pub path_segments: Vec<TelemetrySegment>,

    /// Flights referenced by the segments.
    #[serde(default)]
    pub path_info: Vec<FlightPath>,

    /// Point count before tier decimation.
    #[serde(default)]
    pub original_points: u64,

    /// Point count kept in this tier.
    #[serde(default)]
    pub included_points: u64,
}

impl Dataset {
    /// Concatenate datasets in iteration order.
    ///
    /// Coordinate, segment and path lists are appended; point counts are summed.
    /// The resolution tag is taken from the first dataset that has one.
    pub fn concat<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a Dataset>,
    {
        let mut merged = Dataset::default();
        for part in parts {
            if merged.resolution.is_none() {
                merged.resolution = part.resolution.clone();
            }
            merged.coordinates.extend_from_slice(&part.coordinates);
            merged.path_segments.extend_from_slice(&part.path_segments);
            merged.path_info.extend_from_slice(&part.path_info);
            merged.original_points += part.original_points;
            merged.included_points += part.included_points;
        }
        merged
    }

    /// True when the dataset carries no flights, segments or points.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty() && self.path_segments.is_empty() && self.path_info.is_empty()
    }
}

/// Dataset index published alongside the per-year files.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Concrete years for which datasets exist.
    #[serde(default, alias = "years")]
    pub available_years: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(year: &str, points: u64, paths: u64) -> Dataset {
        Dataset {
            resolution: Some("z0_4".to_string()),
            coordinates: (0..points).map(|i| GeoPoint::new(i as f64, 0.0)).collect(),
            path_segments: (0..paths)
                .map(|id| TelemetrySegment::without_coords(id))
                .collect(),
            path_info: (0..paths).map(|id| FlightPath::new(id).with_year(year)).collect(),
            original_points: points * 10,
            included_points: points,
        }
    }

    #[test]
    fn test_concat_appends_in_order_and_sums_counts() {
        let a = dataset("2024", 2, 1);
        let b = dataset("2025", 3, 2);

        let merged = Dataset::concat([&a, &b]);

        assert_eq!(merged.coordinates.len(), 5);
        assert_eq!(merged.path_segments.len(), 3);
        assert_eq!(merged.path_info.len(), 3);
        assert_eq!(merged.path_info[0].year.as_deref(), Some("2024"));
        assert_eq!(merged.path_info[2].year.as_deref(), Some("2025"));
        assert_eq!(merged.original_points, 50);
        assert_eq!(merged.included_points, 5);
        assert_eq!(merged.resolution.as_deref(), Some("z0_4"));
    }

    #[test]
    fn test_concat_of_nothing_is_empty() {
        let merged = Dataset::concat(std::iter::empty());
        assert!(merged.is_empty());
        assert_eq!(merged.original_points, 0);
    }

    #[test]
    fn test_metadata_years_alias() {
        let meta: DatasetMetadata = serde_json::from_str(r#"{"years": ["2024", "2025"]}"#).unwrap();
        assert_eq!(meta.available_years, vec!["2024", "2025"]);
    }
}
