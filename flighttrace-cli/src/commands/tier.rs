//! `flighttrace tier` - show which detail tier a zoom level maps to.

use clap::Args;
use console::style;
use flighttrace::dataset::{resolve_detail_tier, DetailTier};

use crate::error::CliError;

/// Arguments for the tier command.
#[derive(Debug, Args)]
pub struct TierArgs {
    /// Map zoom level (fractional values allowed)
    pub zoom: f64,
}

/// Run the tier command.
pub fn run(args: TierArgs) -> Result<(), CliError> {
    let resolved = resolve_detail_tier(args.zoom);

    for tier in DetailTier::ALL {
        let marker = if tier == resolved { ">" } else { " " };
        let line = format!("{} {:<9} {}", marker, tier.as_str(), tier.description());
        if tier == resolved {
            println!("{}", style(line).green().bold());
        } else {
            println!("{}", style(line).dim());
        }
    }
    Ok(())
}
