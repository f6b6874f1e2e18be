//! Common types and utilities shared across CLI commands.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use console::style;
use flighttrace::config::DataSettings;
use flighttrace::dataset::{DatasetSource, DirectorySource, HttpSource};

use crate::error::CliError;

/// Where datasets are loaded from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataLocation {
    /// Local directory with `metadata.json` and per-tier files.
    Directory(PathBuf),
    /// Base URL serving the same layout.
    Url(String),
}

impl DataLocation {
    /// Pick the data location.
    ///
    /// Precedence: `--data-dir`, `--base-url`, `[data] directory`,
    /// `[data] base_url`.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        base_url: Option<String>,
        settings: &DataSettings,
    ) -> Result<Self, CliError> {
        if let Some(dir) = data_dir {
            return Ok(DataLocation::Directory(dir));
        }
        if let Some(url) = base_url {
            return Ok(DataLocation::Url(url));
        }
        if let Some(dir) = &settings.directory {
            return Ok(DataLocation::Directory(dir.clone()));
        }
        if let Some(url) = &settings.base_url {
            return Ok(DataLocation::Url(url.clone()));
        }
        Err(CliError::Config(
            "No dataset location configured. Use --data-dir, --base-url, \
             or set [data] directory in config.ini"
                .to_string(),
        ))
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataLocation::Directory(dir) => write!(f, "{}", dir.display()),
            DataLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Build the dataset source for a location.
pub fn build_source(location: &DataLocation) -> Result<Arc<dyn DatasetSource>, CliError> {
    match location {
        DataLocation::Directory(dir) => Ok(Arc::new(DirectorySource::new(dir.clone()))),
        DataLocation::Url(url) => Ok(Arc::new(HttpSource::new(url.clone())?)),
    }
}

/// Print a section heading.
pub fn heading(title: &str) {
    println!("{}", style(title).bold().underlined());
}

/// Print an aligned `label: value` row.
pub fn row(label: &str, value: impl fmt::Display) {
    println!("  {:<22} {}", style(format!("{}:", label)).dim(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_wins_over_config() {
        let settings = DataSettings {
            directory: Some(PathBuf::from("/config/data")),
            base_url: Some("https://example.com".to_string()),
            ..Default::default()
        };

        let location =
            DataLocation::resolve(Some(PathBuf::from("/cli/data")), None, &settings).unwrap();
        assert_eq!(location, DataLocation::Directory(PathBuf::from("/cli/data")));

        let location =
            DataLocation::resolve(None, Some("https://cli.example.com".to_string()), &settings)
                .unwrap();
        assert_eq!(location, DataLocation::Url("https://cli.example.com".to_string()));
    }

    #[test]
    fn test_config_directory_before_url() {
        let settings = DataSettings {
            directory: Some(PathBuf::from("/config/data")),
            base_url: Some("https://example.com".to_string()),
            ..Default::default()
        };
        let location = DataLocation::resolve(None, None, &settings).unwrap();
        assert_eq!(location, DataLocation::Directory(PathBuf::from("/config/data")));
    }

    #[test]
    fn test_missing_location_is_config_error() {
        let result = DataLocation::resolve(None, None, &DataSettings::default());
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
