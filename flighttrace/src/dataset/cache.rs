//! Multi-resolution dataset cache.
//!
//! Resolves a (tier, year) key to a [`Dataset`], fetching from the injected
//! source on a miss and keeping the result for the lifetime of the cache.
//!
//! # Concurrency
//!
//! Entries live in a `moka::future::Cache`. Loads go through `try_get_with`,
//! so concurrent requests for the same uncached key share one in-flight fetch:
//! the first caller runs the fetch, later callers await its result. A failed
//! fetch is reported to every waiter and nothing is cached for that key.
//!
//! # "All years"
//!
//! `YearSelector::All` fetches the metadata resource, loads each listed year
//! through the same cache, and caches the concatenation under `(tier, all)`.
//! Any failing year aborts the aggregate.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::try_join_all;
use moka::future::Cache as MokaCache;
use tracing::{debug, info, warn};

use super::error::DatasetError;
use super::key::{DatasetKey, YearSelector};
use super::options::{DatasetCacheConfig, LoadEndHook, LoadOptions, LoadStartHook};
use super::source::{DatasetSource, SourceRequest};
use super::tier::DetailTier;
use crate::model::{Dataset, DatasetMetadata};

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to wait for a load.
    pub misses: u64,
    /// Upstream requests issued (datasets and metadata).
    pub fetches: u64,
    /// Datasets currently cached.
    pub entries: u64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entries, {} hits, {} misses, {} fetches",
            self.entries, self.hits, self.misses, self.fetches
        )
    }
}

/// Source and hooks in effect for one load call.
struct LoadContext {
    source: Arc<dyn DatasetSource>,
    on_load_start: Option<LoadStartHook>,
    on_load_end: Option<LoadEndHook>,
}

impl LoadContext {
    fn started(&self, key: &DatasetKey) {
        if let Some(hook) = &self.on_load_start {
            hook(key);
        }
    }

    fn ended(&self, key: &DatasetKey, success: bool) {
        if let Some(hook) = &self.on_load_end {
            hook(key, success);
        }
    }
}

/// Dataset cache keyed by (tier, year).
///
/// Owned by the host and shared with callers as `Arc<DatasetCache>`. Stored
/// datasets are never mutated; the cache only adds entries (or drops them on
/// [`clear_cache`](Self::clear_cache)).
pub struct DatasetCache {
    /// Cached datasets.
    datasets: MokaCache<DatasetKey, Arc<Dataset>>,
    /// Default source.
    source: Arc<dyn DatasetSource>,
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
}

impl DatasetCache {
    /// Create an unbounded cache over `source`.
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self::with_config(source, DatasetCacheConfig::default())
    }

    /// Create a cache with explicit configuration.
    pub fn with_config(source: Arc<dyn DatasetSource>, config: DatasetCacheConfig) -> Self {
        let mut builder = MokaCache::builder();
        if let Some(max_entries) = config.max_entries {
            builder = builder.max_capacity(max_entries);
        }

        Self {
            datasets: builder.build(),
            source,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
        }
    }

    /// Load a dataset from raw tier and year strings.
    ///
    /// Input is validated before anything else; invalid input fails with
    /// [`DatasetError::InvalidTier`] or [`DatasetError::InvalidYear`] and has
    /// no side effects.
    pub async fn load(&self, tier: &str, year: &str) -> Result<Arc<Dataset>, DatasetError> {
        let key = DatasetKey::parse(tier, year)?;
        self.load_key(key).await
    }

    /// Load a dataset for a validated key using the default source.
    pub async fn load_key(&self, key: DatasetKey) -> Result<Arc<Dataset>, DatasetError> {
        let ctx = LoadContext {
            source: Arc::clone(&self.source),
            on_load_start: None,
            on_load_end: None,
        };
        self.resolve(key, &ctx).await
    }

    /// Load with explicit options (source override and hooks).
    pub async fn load_with(&self, options: LoadOptions) -> Result<Arc<Dataset>, DatasetError> {
        let key = options.key();
        let ctx = LoadContext {
            source: options
                .loader
                .unwrap_or_else(|| Arc::clone(&self.source)),
            on_load_start: options.on_load_start,
            on_load_end: options.on_load_end,
        };
        self.resolve(key, &ctx).await
    }

    /// Load a dataset, mapping every failure to `None`.
    ///
    /// The failure is logged; callers render "no dataset" as an empty state.
    pub async fn try_load(&self, tier: &str, year: &str) -> Option<Arc<Dataset>> {
        match self.load(tier, year).await {
            Ok(dataset) => Some(dataset),
            Err(e) => {
                warn!(tier, year, error = %e, "Dataset unavailable");
                None
            }
        }
    }

    /// Whether a dataset for the raw tier/year is cached (invalid input: `false`).
    pub fn is_cached(&self, tier: &str, year: &str) -> bool {
        DatasetKey::parse(tier, year)
            .map(|key| self.contains_key(&key))
            .unwrap_or(false)
    }

    /// Whether a dataset for `key` is cached.
    pub fn contains_key(&self, key: &DatasetKey) -> bool {
        self.datasets.contains_key(key)
    }

    /// Drop every cached dataset.
    pub fn clear_cache(&self) {
        self.datasets.invalidate_all();
        info!("Dataset cache cleared");
    }

    /// Keys currently cached, sorted.
    pub fn cached_keys(&self) -> Vec<DatasetKey> {
        let mut keys: Vec<DatasetKey> = self.datasets.iter().map(|(key, _)| *key).collect();
        keys.sort();
        keys
    }

    /// Current counters.
    ///
    /// Runs pending cache maintenance first so the entry count is current.
    pub async fn stats(&self) -> CacheStats {
        self.datasets.run_pending_tasks().await;
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            entries: self.datasets.entry_count(),
        }
    }

    async fn resolve(
        &self,
        key: DatasetKey,
        ctx: &LoadContext,
    ) -> Result<Arc<Dataset>, DatasetError> {
        match key.year {
            YearSelector::Year(_) => self.load_year(key, ctx).await,
            YearSelector::All => {
                if let Some(dataset) = self.cached(&key).await {
                    return Ok(dataset);
                }
                let init = async {
                    ctx.started(&key);
                    let result = self.fetch_all_years(key.tier, ctx).await;
                    self.finish(&key, ctx, &result);
                    result
                };
                self.datasets
                    .try_get_with(key, init)
                    .await
                    .map_err(|e| (*e).clone())
            }
        }
    }

    /// Load a single concrete year through the cache.
    async fn load_year(
        &self,
        key: DatasetKey,
        ctx: &LoadContext,
    ) -> Result<Arc<Dataset>, DatasetError> {
        if let Some(dataset) = self.cached(&key).await {
            return Ok(dataset);
        }
        let init = async {
            ctx.started(&key);
            let result = self
                .fetch_json::<Dataset>(ctx, SourceRequest::Dataset(key))
                .await
                .map(Arc::new);
            self.finish(&key, ctx, &result);
            result
        };
        self.datasets
            .try_get_with(key, init)
            .await
            .map_err(|e| (*e).clone())
    }

    async fn cached(&self, key: &DatasetKey) -> Option<Arc<Dataset>> {
        match self.datasets.get(key).await {
            Some(dataset) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(%key, "Dataset cache hit");
                Some(dataset)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn finish(
        &self,
        key: &DatasetKey,
        ctx: &LoadContext,
        result: &Result<Arc<Dataset>, DatasetError>,
    ) {
        match result {
            Ok(dataset) => info!(
                %key,
                paths = dataset.path_info.len(),
                segments = dataset.path_segments.len(),
                points = dataset.coordinates.len(),
                "Dataset loaded"
            ),
            Err(e) => warn!(%key, error = %e, "Dataset load failed"),
        }
        ctx.ended(key, result.is_ok());
    }

    /// Fetch metadata, load every listed year, and concatenate in year order.
    async fn fetch_all_years(
        &self,
        tier: DetailTier,
        ctx: &LoadContext,
    ) -> Result<Arc<Dataset>, DatasetError> {
        let metadata = self
            .fetch_json::<DatasetMetadata>(ctx, SourceRequest::Metadata)
            .await?;

        let years = concrete_years(&metadata);
        debug!(%tier, years = ?years, "Loading all years");

        let parts = try_join_all(
            years
                .iter()
                .map(|year| self.load_year(DatasetKey::new(tier, YearSelector::Year(*year)), ctx)),
        )
        .await?;

        Ok(Arc::new(Dataset::concat(parts.iter().map(Arc::as_ref))))
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        ctx: &LoadContext,
        request: SourceRequest,
    ) -> Result<T, DatasetError> {
        let resource = request.resource_name();
        self.fetches.fetch_add(1, Ordering::Relaxed);
        info!(resource = %resource, source = ctx.source.name(), "Fetching");

        let payload = ctx
            .source
            .fetch(&request)
            .await
            .map_err(|source| DatasetError::Source {
                resource: resource.clone(),
                source,
            })?;

        serde_json::from_slice(&payload).map_err(|e| DatasetError::Decode {
            resource,
            reason: e.to_string(),
        })
    }
}

/// Concrete years listed in metadata: validated, de-duplicated, ascending.
fn concrete_years(metadata: &DatasetMetadata) -> Vec<u16> {
    let mut years = BTreeSet::new();
    for entry in &metadata.available_years {
        match YearSelector::parse(entry.trim()) {
            Ok(YearSelector::Year(year)) => {
                years.insert(year);
            }
            Ok(YearSelector::All) | Err(_) => {
                warn!(entry = %entry, "Skipping invalid year in dataset metadata");
            }
        }
    }
    years.into_iter().collect()
}
