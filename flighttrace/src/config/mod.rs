//! Configuration file support.
//!
//! User settings live in `~/.flighttrace/config.ini`:
//!
//! ```ini
//! [data]
//! directory = ~/flight-data
//! default_tier = z8_10
//!
//! [replay]
//! playback_speed = 4
//! ```
//!
//! Missing keys fall back to the library defaults; invalid values are
//! reported as [`ConfigFileError::InvalidValue`].

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{
    config_directory, config_file_path, ConfigFileError, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
};
pub use settings::{
    CacheSettings, ConfigFile, DataSettings, LoggingSettings, ReplaySettings,
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_FRAME_INTERVAL_MS,
};
pub use writer::to_entries;
