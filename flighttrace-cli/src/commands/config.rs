//! Configuration CLI commands.
//!
//! Provides `config get`, `config list`, `config path` and `config init` for
//! inspecting the configuration file from the command line.

use clap::Subcommand;
use flighttrace::config::{config_file_path, to_entries, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., replay.lookahead)
        key: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,

    /// Write a default configuration file if none exists
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Init => run_init(),
    }
}

fn run_get(key: &str) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let value = lookup(&config, key).ok_or_else(|| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'flighttrace config list' to see available keys.",
            key
        ))
    })?;

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";
    for (name, value) in to_entries(&config) {
        let (section, key) = name.split_once('.').unwrap_or(("", name));

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        if value.is_empty() {
            println!("  {} = (not set)", key);
        } else {
            println!("  {} = {}", key, value);
        }
    }
    Ok(())
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_init() -> Result<(), CliError> {
    let existed = config_file_path().exists();
    let path = ConfigFile::ensure_exists()?;
    if existed {
        println!("Configuration already exists at {}", path.display());
    } else {
        println!("Wrote default configuration to {}", path.display());
    }
    Ok(())
}

fn lookup(config: &ConfigFile, key: &str) -> Option<String> {
    to_entries(config)
        .into_iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_key() {
        let mut config = ConfigFile::default();
        config.replay.lookahead = 8;
        assert_eq!(lookup(&config, "replay.lookahead").as_deref(), Some("8"));
        assert_eq!(lookup(&config, "data.base_url").as_deref(), Some(""));
    }

    #[test]
    fn test_lookup_unknown_key() {
        let config = ConfigFile::default();
        assert!(lookup(&config, "replay.nope").is_none());
        assert!(lookup(&config, "lookahead").is_none());
    }
}
