//! Dataset cache.
//!
//! Resolves a (detail tier, year) request to a telemetry [`Dataset`], loading
//! it from an injected [`DatasetSource`] on first use.
//!
//! # Architecture
//!
//! ```text
//! UI / query input ──► DatasetKey::parse ──► DatasetCache ──► DatasetSource
//!   (tier, year)        (allow-list,          (moka,          (closure, dir,
//!                        2000-2099)            de-duped)        http)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use flighttrace::dataset::{DatasetCache, DirectorySource, resolve_detail_tier};
//!
//! let cache = Arc::new(DatasetCache::new(Arc::new(DirectorySource::new("data"))));
//! let tier = resolve_detail_tier(9.5);
//! let dataset = cache.load(tier.as_str(), "all").await?;
//! ```
//!
//! [`Dataset`]: crate::model::Dataset

mod cache;
mod error;
mod key;
mod options;
mod source;
mod tier;

pub use cache::{CacheStats, DatasetCache};
pub use error::{DatasetError, SourceError};
pub use key::{DatasetKey, YearSelector, ALL_YEARS};
pub use options::{DatasetCacheConfig, LoadEndHook, LoadOptions, LoadStartHook};
pub use source::{
    BoxFuture, DatasetSource, DirectorySource, FnSource, HttpSource, SourceRequest,
    DEFAULT_HTTP_TIMEOUT, METADATA_RESOURCE,
};
pub use tier::{resolve_detail_tier, DetailTier};
