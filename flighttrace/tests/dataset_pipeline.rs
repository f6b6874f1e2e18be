//! Integration tests for the dataset pipeline.
//!
//! These tests drive the public API end to end:
//! - Directory source → dataset cache → merged "all years" view
//! - Statistics over a cached dataset
//! - Replay session over a cached flight
//!
//! Run with: `cargo test --test dataset_pipeline`

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tempfile::TempDir;

use flighttrace::dataset::{
    DatasetCache, DatasetError, DatasetKey, DetailTier, DirectorySource, LoadOptions,
    SourceError, YearSelector,
};
use flighttrace::model::{Dataset, DatasetMetadata, FlightPath, GeoPoint, TelemetrySegment};
use flighttrace::replay::{validate, ReplayConfig, ReplaySession, ReplayState};
use flighttrace::stats::{filtered_statistics, StatisticsQuery};

// ============================================================================
// Helper Functions
// ============================================================================

fn flight(id: u64, year: &str, registration: &str) -> FlightPath {
    FlightPath {
        id,
        year: Some(year.to_string()),
        aircraft_registration: Some(registration.to_string()),
        aircraft_type: Some("C172".to_string()),
        start_airport: Some("KPAO".to_string()),
        end_airport: Some("KHAF".to_string()),
    }
}

/// A straight northbound track of `count` one-second segments.
fn track(id: u64, count: usize) -> Vec<TelemetrySegment> {
    (0..count)
        .map(|i| {
            let lat = 37.0 + i as f64 * 0.01;
            TelemetrySegment::new(id, GeoPoint::new(lat, -122.0), GeoPoint::new(lat + 0.01, -122.0))
                .with_altitude_m(1000.0 + i as f64 * 100.0)
                .with_groundspeed(100.0)
                .with_time(i as f64)
        })
        .collect()
}

fn dataset(paths: Vec<FlightPath>, segments: Vec<TelemetrySegment>) -> Dataset {
    Dataset {
        resolution: Some("z14_plus".to_string()),
        coordinates: segments.iter().filter_map(|s| s.start()).collect(),
        original_points: segments.len() as u64 * 2,
        included_points: segments.len() as u64,
        path_segments: segments,
        path_info: paths,
    }
}

fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) {
    fs::write(dir.join(name), serde_json::to_vec(value).unwrap()).unwrap();
}

/// Data directory with two years of z14_plus data.
fn data_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_json(
        temp.path(),
        "metadata.json",
        &DatasetMetadata {
            available_years: vec!["2024".to_string(), "2023".to_string()],
        },
    );
    write_json(
        temp.path(),
        "z14_plus_2023.json",
        &dataset(vec![flight(1, "2023", "N111")], track(1, 4)),
    );
    write_json(
        temp.path(),
        "z14_plus_2024.json",
        &dataset(vec![flight(2, "2024", "N222")], track(2, 3)),
    );
    temp
}

fn cache_for(dir: &TempDir) -> DatasetCache {
    DatasetCache::new(Arc::new(DirectorySource::new(dir.path())))
}

// ============================================================================
// Dataset Cache
// ============================================================================

#[tokio::test]
async fn test_all_years_merges_in_year_order() {
    let dir = data_dir();
    let cache = cache_for(&dir);

    let merged = cache.load("z14_plus", "all").await.unwrap();

    let ids: Vec<u64> = merged.path_info.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(merged.path_segments.len(), 7);
    assert_eq!(merged.included_points, 7);
    assert_eq!(merged.original_points, 14);

    // The per-year datasets are cached alongside the merged view
    assert!(cache.is_cached("z14_plus", "2023"));
    assert!(cache.is_cached("z14_plus", "2024"));
    assert!(cache.is_cached("z14_plus", "all"));
    assert!(!cache.is_cached("z11_13", "all"));
}

#[tokio::test]
async fn test_cached_load_does_not_refetch() {
    let dir = data_dir();
    let cache = cache_for(&dir);

    let first = cache.load("z14_plus", "all").await.unwrap();
    let fetches = cache.stats().await.fetches;
    // metadata.json plus one file per year
    assert_eq!(fetches, 3);

    // Removing the files proves the second load is served from memory
    fs::remove_file(dir.path().join("z14_plus_2023.json")).unwrap();
    let second = cache.load("z14_plus", "all").await.unwrap();
    let year = cache.load("z14_plus", "2023").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(year.path_info[0].id, 1);

    let stats = cache.stats().await;
    assert_eq!(stats.fetches, 3);
    assert!(stats.hits >= 2);
}

#[tokio::test]
async fn test_invalid_input_has_no_side_effects() {
    let dir = data_dir();
    let cache = cache_for(&dir);

    let err = cache.load("z99", "2023").await.unwrap_err();
    assert!(matches!(err, DatasetError::InvalidTier(_)));

    let err = cache.load("z14_plus", "1999").await.unwrap_err();
    assert!(matches!(err, DatasetError::InvalidYear(_)));

    let stats = cache.stats().await;
    assert_eq!(stats.fetches, 0);
    assert_eq!(stats.entries, 0);
}

#[tokio::test]
async fn test_missing_year_reports_not_found() {
    let dir = data_dir();
    let cache = cache_for(&dir);

    let err = cache.load("z14_plus", "2022").await.unwrap_err();
    match err {
        DatasetError::Source { resource, source } => {
            assert_eq!(resource, "z14_plus_2022.json");
            assert_eq!(source, SourceError::NotFound("z14_plus_2022.json".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(cache.try_load("z14_plus", "2022").await.is_none());
    assert!(!cache.is_cached("z14_plus", "2022"));
}

#[tokio::test]
async fn test_malformed_payload_reports_decode_error() {
    let dir = data_dir();
    fs::write(dir.path().join("z8_10_2023.json"), b"{ not json").unwrap();
    let cache = cache_for(&dir);

    let err = cache.load("z8_10", "2023").await.unwrap_err();
    assert!(matches!(err, DatasetError::Decode { .. }));
}

#[tokio::test]
async fn test_hooks_fire_only_for_upstream_loads() {
    let dir = data_dir();
    let cache = cache_for(&dir);
    let started = Arc::new(AtomicUsize::new(0));
    let succeeded = Arc::new(AtomicUsize::new(0));

    let options = || {
        let started = Arc::clone(&started);
        let succeeded = Arc::clone(&succeeded);
        LoadOptions::new(DetailTier::Z14Plus, YearSelector::Year(2023))
            .on_load_start(move |_key: &DatasetKey| {
                started.fetch_add(1, Ordering::SeqCst);
            })
            .on_load_end(move |_key: &DatasetKey, success: bool| {
                if success {
                    succeeded.fetch_add(1, Ordering::SeqCst);
                }
            })
    };

    cache.load_with(options()).await.unwrap();
    cache.load_with(options()).await.unwrap();

    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(succeeded.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Statistics and Replay
// ============================================================================

#[tokio::test]
async fn test_statistics_over_cached_dataset() {
    let dir = data_dir();
    let cache = cache_for(&dir);
    let merged = cache.load("z14_plus", "all").await.unwrap();

    let all = filtered_statistics(&StatisticsQuery::new(
        &merged.path_info,
        &merged.path_segments,
    ));
    assert_eq!(all.num_paths, 2);
    assert_eq!(all.num_aircraft, 2);
    assert_eq!(all.total_points, 7);

    let one_year = filtered_statistics(
        &StatisticsQuery::new(&merged.path_info, &merged.path_segments).with_year("2024"),
    );
    assert_eq!(one_year.num_paths, 1);
    assert_eq!(one_year.total_points, 3);
    assert_eq!(one_year.max_groundspeed_knots, 100.0);

    let nobody = filtered_statistics(
        &StatisticsQuery::new(&merged.path_info, &merged.path_segments).with_aircraft("N999"),
    );
    assert_eq!(nobody.num_paths, 0);
    assert_eq!(nobody.total_flight_time, "0h 0m");
}

#[tokio::test]
async fn test_replay_session_over_cached_flight() {
    let dir = data_dir();
    let cache = cache_for(&dir);
    let merged = cache.load("z14_plus", "all").await.unwrap();

    validate(&merged.path_segments).unwrap();

    let mut session = ReplaySession::new(ReplayConfig::default());
    let count = session.prepare(&merged.path_segments, 1).unwrap();
    assert_eq!(count, 4);
    assert_eq!(session.state(), ReplayState::Prepared);
    assert_eq!(session.time_range().min, 0.0);
    assert_eq!(session.time_range().max, 3.0);

    session.seek(1.5);
    let frame = session.frame_at(Instant::now()).unwrap();
    assert_eq!(frame.time, 1.5);
    assert_eq!(frame.index, 1);
    assert_eq!(frame.progress, 50.0);
    assert!(!frame.finished);

    let position = frame.position.unwrap();
    assert!(position.lat > 37.0 && position.lat < 37.05);
    assert!((position.lon + 122.0).abs() < 1e-9);
    // Due north
    assert!(frame.heading.unwrap() < 1e-6 || frame.heading.unwrap() > 359.999);
}

#[tokio::test]
async fn test_replay_of_unknown_flight_fails() {
    let dir = data_dir();
    let cache = cache_for(&dir);
    let merged = cache.load("z14_plus", "all").await.unwrap();

    let mut session = ReplaySession::default();
    assert!(session.prepare(&merged.path_segments, 42).is_err());
    assert_eq!(session.state(), ReplayState::Idle);
}
