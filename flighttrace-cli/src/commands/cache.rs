//! Dataset cache CLI commands.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clap::Subcommand;
use console::style;
use flighttrace::dataset::{
    DatasetError, DatasetKey, DetailTier, LoadOptions, SourceRequest, YearSelector, ALL_YEARS,
};
use flighttrace::model::DatasetMetadata;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::common::{heading, row};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Load datasets for every tier (or one tier) and report cache counters
    Warm {
        /// Only warm this tier
        #[arg(long)]
        tier: Option<String>,

        /// Year to warm, or "all"
        #[arg(long, default_value = ALL_YEARS)]
        year: String,
    },
    /// Show the source's available years and resource names
    Inspect,
}

/// Run a cache subcommand.
pub async fn run(runner: &CliRunner, action: CacheAction) -> Result<(), CliError> {
    match action {
        CacheAction::Warm { tier, year } => run_warm(runner, tier, &year).await,
        CacheAction::Inspect => run_inspect(runner).await,
    }
}

async fn run_warm(runner: &CliRunner, tier: Option<String>, year: &str) -> Result<(), CliError> {
    runner.log_startup("cache warm");

    let year = YearSelector::parse(year)?;
    let tiers: Vec<DetailTier> = match tier {
        Some(tier) => vec![DetailTier::from_str(&tier)?],
        None => DetailTier::ALL.to_vec(),
    };

    let bar = ProgressBar::new(tiers.len() as u64);
    if let Ok(template) = ProgressStyle::with_template("{bar:30.green/white} {pos}/{len} {msg}") {
        bar.set_style(template);
    }

    let fetched = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let cache = runner.cache();

    for tier in tiers {
        let start_bar = bar.clone();
        let end_fetched = Arc::clone(&fetched);
        let end_failed = Arc::clone(&failed);
        let options = LoadOptions::new(tier, year)
            .on_load_start(move |key: &DatasetKey| {
                start_bar.set_message(format!("loading {}", key));
            })
            .on_load_end(move |_key: &DatasetKey, success: bool| {
                if success {
                    end_fetched.fetch_add(1, Ordering::Relaxed);
                } else {
                    end_failed.fetch_add(1, Ordering::Relaxed);
                }
            });

        match cache.load_with(options).await {
            Ok(dataset) => {
                bar.println(format!(
                    "{} {:<9} {} flights, {} segments",
                    style("ok").green(),
                    tier,
                    dataset.path_info.len(),
                    dataset.path_segments.len()
                ));
            }
            Err(e) => {
                warn!(tier = %tier, error = %e, "Warm-up failed");
                bar.println(format!("{} {:<9} {}", style("failed").red(), tier, e));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let stats = cache.stats().await;
    info!(%stats, "Cache warmed");
    heading("Cache");
    row("Entries", stats.entries);
    row("Fetches", stats.fetches);
    row("Resources loaded", fetched.load(Ordering::Relaxed));
    row("Resources failed", failed.load(Ordering::Relaxed));
    Ok(())
}

async fn run_inspect(runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("cache inspect");

    let request = SourceRequest::Metadata;
    let resource = request.resource_name();
    let bytes = runner.source().fetch(&request).await?;
    let metadata: DatasetMetadata =
        serde_json::from_slice(&bytes).map_err(|e| DatasetError::Decode {
            resource: resource.clone(),
            reason: e.to_string(),
        })?;

    heading("Source");
    row("Location", runner.location());
    row("Metadata", &resource);
    row(
        "Available years",
        if metadata.available_years.is_empty() {
            "(none)".to_string()
        } else {
            metadata.available_years.join(", ")
        },
    );

    println!();
    heading("Resources");
    for tier in DetailTier::ALL {
        let names: Vec<String> = metadata
            .available_years
            .iter()
            .filter_map(|year| DatasetKey::parse(tier.as_str(), year).ok())
            .map(|key| key.resource_name())
            .collect();
        row(tier.as_str(), names.join("  "));
    }
    Ok(())
}
