//! `flighttrace stats` - statistics for a filtered set of flights.

use clap::Args;
use flighttrace::stats::{filtered_statistics, FlightStatistics, StatisticsQuery, ALL};
use tracing::info;

use super::common::{heading, row};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the stats command.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Detail tier to load (default: [data] default_tier)
    #[arg(long)]
    pub tier: Option<String>,

    /// Year to load and filter by, or "all"
    #[arg(long, default_value = ALL)]
    pub year: String,

    /// Aircraft registration to filter by, or "all"
    #[arg(long, default_value = ALL)]
    pub aircraft: String,

    /// Print the statistics as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the stats command.
pub async fn run(runner: &CliRunner, args: StatsArgs) -> Result<(), CliError> {
    runner.log_startup("stats");
    let tier = runner.tier_or_default(args.tier);

    let dataset = runner.cache().load(&tier, &args.year).await?;
    let query = StatisticsQuery::new(&dataset.path_info, &dataset.path_segments)
        .with_year(&args.year)
        .with_aircraft(&args.aircraft)
        .with_coordinate_count(dataset.coordinates.len());
    let stats = filtered_statistics(&query);

    info!(
        tier = %tier,
        year = %args.year,
        aircraft = %args.aircraft,
        flights = stats.num_paths,
        "Statistics computed"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_statistics(&stats);
    }
    Ok(())
}

fn print_statistics(stats: &FlightStatistics) {
    heading("Flights");
    row("Flights", stats.num_paths);
    row("Points", stats.total_points);
    row("Flight time", &stats.total_flight_time);
    row(
        "Airports",
        format!("{} ({})", stats.num_airports, stats.airport_names.join(", ")),
    );
    row("Aircraft", stats.num_aircraft);
    for aircraft in &stats.aircraft_list {
        let kind = aircraft.aircraft_type.as_deref().unwrap_or("unknown type");
        println!(
            "    {:<12} {:<8} {} flights",
            aircraft.registration, kind, aircraft.flights
        );
    }

    println!();
    heading("Distance");
    row(
        "Total",
        format!(
            "{:.1} km ({:.1} nm)",
            stats.total_distance_km, stats.total_distance_nm
        ),
    );
    row(
        "Longest flight",
        format!(
            "{:.1} km ({:.1} nm)",
            stats.longest_flight_km, stats.longest_flight_nm
        ),
    );

    println!();
    heading("Altitude");
    row(
        "Range",
        format!(
            "{:.0}-{:.0} m ({:.0}-{:.0} ft)",
            stats.min_altitude_m, stats.max_altitude_m, stats.min_altitude_ft, stats.max_altitude_ft
        ),
    );
    row(
        "Elevation gain",
        format!(
            "{:.0} m ({:.0} ft)",
            stats.elevation_gain_m, stats.elevation_gain_ft
        ),
    );
    row(
        "Common cruise",
        format!(
            "{:.0} ft ({:.0} m)",
            stats.most_common_cruise_altitude_ft, stats.most_common_cruise_altitude_m
        ),
    );

    println!();
    heading("Speed");
    row("Max groundspeed", format!("{:.0} kt", stats.max_groundspeed_knots));
    row("Avg groundspeed", format!("{:.0} kt", stats.avg_groundspeed_knots));
    row(
        "Cruise speed",
        format!(
            "{:.0} kt over {} segments",
            stats.cruise_speed_knots, stats.cruise_segments
        ),
    );
}
