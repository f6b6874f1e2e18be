//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and dataset cache
//! construction so command handlers stay small.

use std::path::PathBuf;
use std::sync::Arc;

use flighttrace::config::ConfigFile;
use flighttrace::dataset::{DatasetCache, DatasetSource};
use flighttrace::logging::{init_logging, split_log_path, LoggingGuard};
use tracing::info;

use crate::commands::common::{build_source, DataLocation};
use crate::error::CliError;

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub data_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub debug: bool,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    _logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    /// Where datasets come from
    location: DataLocation,
    /// Source the cache loads through
    source: Arc<dyn DatasetSource>,
    /// Shared dataset cache
    cache: Arc<DatasetCache>,
}

impl CliRunner {
    /// Load config, initialize logging and build the dataset cache.
    ///
    /// Command-line locations take precedence over the config file.
    pub fn new(options: &GlobalOptions) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(config.logging.file.as_deref());
        // Command output goes to stdout, so log events only go to the file
        let logging_guard = init_logging(&log_dir, &log_file, false, options.debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let location = DataLocation::resolve(
            options.data_dir.clone(),
            options.base_url.clone(),
            &config.data,
        )?;
        let source: Arc<dyn DatasetSource> = build_source(&location)?;
        let cache = Arc::new(DatasetCache::with_config(
            Arc::clone(&source),
            config.cache_config(),
        ));

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            location,
            source,
            cache,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Get the shared dataset cache.
    pub fn cache(&self) -> Arc<DatasetCache> {
        Arc::clone(&self.cache)
    }

    /// The dataset source, for requests that bypass the cache.
    pub fn source(&self) -> Arc<dyn DatasetSource> {
        Arc::clone(&self.source)
    }

    /// Where datasets are loaded from.
    pub fn location(&self) -> &DataLocation {
        &self.location
    }

    /// Tier from the command line, or the configured default.
    pub fn tier_or_default(&self, tier: Option<String>) -> String {
        tier.unwrap_or_else(|| self.config.data.default_tier.to_string())
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("FlightTrace v{}", flighttrace::VERSION);
        info!(source = %self.location, "FlightTrace CLI: {} command", command);
    }
}
