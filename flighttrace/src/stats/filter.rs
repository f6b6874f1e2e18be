//! Flight and segment selection.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{FlightPath, PathId, TelemetrySegment};

/// Filter value that disables a filter.
pub const ALL: &str = "all";

/// Flights whose year and aircraft match the given criteria.
///
/// `"all"` disables a criterion. The year compares the stringified flight year
/// by string equality; the aircraft compares the registration exactly. A flight
/// missing the filtered field never matches a concrete value.
pub fn filter_paths<'a>(
    paths: &'a [FlightPath],
    year: &str,
    aircraft: &str,
) -> Vec<&'a FlightPath> {
    paths
        .iter()
        .filter(|path| year == ALL || path.year.as_deref() == Some(year))
        .filter(|path| aircraft == ALL || path.aircraft_registration.as_deref() == Some(aircraft))
        .collect()
}

/// Union of non-empty departure and arrival airport codes.
pub fn collect_airports<'a, I>(paths: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a FlightPath>,
{
    paths
        .into_iter()
        .flat_map(|path| [path.start_airport.as_deref(), path.end_airport.as_deref()])
        .flatten()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Flight count for one aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftSummary {
    /// Registration (tail number).
    pub registration: String,
    /// Type designator of the first flight seen for this registration.
    pub aircraft_type: Option<String>,
    /// Number of flights.
    pub flights: usize,
}

/// Group flights by registration, most flights first.
///
/// Ties keep first-encounter order. Flights without a registration are skipped.
pub fn aggregate_aircraft<'a, I>(paths: I) -> Vec<AircraftSummary>
where
    I: IntoIterator<Item = &'a FlightPath>,
{
    let mut summaries: Vec<AircraftSummary> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for path in paths {
        let Some(registration) = path.aircraft_registration.as_deref() else {
            continue;
        };
        match index.get(registration) {
            Some(&i) => {
                let summary = &mut summaries[i];
                summary.flights += 1;
                if summary.aircraft_type.is_none() {
                    summary.aircraft_type = path.aircraft_type.clone();
                }
            }
            None => {
                index.insert(registration, summaries.len());
                summaries.push(AircraftSummary {
                    registration: registration.to_string(),
                    aircraft_type: path.aircraft_type.clone(),
                    flights: 1,
                });
            }
        }
    }

    // sort_by is stable, so equal counts stay in encounter order
    summaries.sort_by(|a, b| b.flights.cmp(&a.flights));
    summaries
}

/// Ids of a set of flights.
pub fn path_ids<'a, I>(paths: I) -> HashSet<PathId>
where
    I: IntoIterator<Item = &'a FlightPath>,
{
    paths.into_iter().map(|path| path.id).collect()
}

/// Segments belonging to any of the given flights.
pub fn filter_segments_by_paths<'a, 'p, I>(
    segments: &'a [TelemetrySegment],
    paths: I,
) -> Vec<&'a TelemetrySegment>
where
    I: IntoIterator<Item = &'p FlightPath>,
{
    let ids = path_ids(paths);
    segments
        .iter()
        .filter(|segment| ids.contains(&segment.path_id))
        .collect()
}
