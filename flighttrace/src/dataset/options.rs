//! Load options and cache configuration.

use std::fmt;
use std::sync::Arc;

use super::key::{DatasetKey, YearSelector};
use super::source::DatasetSource;
use super::tier::DetailTier;

/// Called with the key when an upstream fetch for it begins.
pub type LoadStartHook = Arc<dyn Fn(&DatasetKey) + Send + Sync>;

/// Called with the key and the outcome (`true` on success) when a fetch ends.
pub type LoadEndHook = Arc<dyn Fn(&DatasetKey, bool) + Send + Sync>;

/// Options for a single [`DatasetCache::load_with`](super::DatasetCache::load_with) call.
///
/// | Option          | Default                         |
/// |-----------------|---------------------------------|
/// | `detail_tier`   | [`DetailTier::Z0To4`]           |
/// | `year`          | [`YearSelector::All`]           |
/// | `loader`        | the cache's configured source   |
/// | `on_load_start` | none                            |
/// | `on_load_end`   | none                            |
///
/// Hooks only fire when the cache actually goes upstream; cache hits are silent.
#[derive(Clone, Default)]
pub struct LoadOptions {
    /// Detail tier to load.
    pub detail_tier: DetailTier,
    /// Year selection.
    pub year: YearSelector,
    /// Source override for this call.
    pub loader: Option<Arc<dyn DatasetSource>>,
    /// Fired before an upstream fetch.
    pub on_load_start: Option<LoadStartHook>,
    /// Fired after an upstream fetch.
    pub on_load_end: Option<LoadEndHook>,
}

impl LoadOptions {
    /// Options for a key with no overrides or hooks.
    pub fn new(detail_tier: DetailTier, year: YearSelector) -> Self {
        Self {
            detail_tier,
            year,
            ..Default::default()
        }
    }

    /// Use a specific source for this load.
    pub fn with_loader(mut self, loader: Arc<dyn DatasetSource>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Register a load-start hook.
    pub fn on_load_start(mut self, hook: impl Fn(&DatasetKey) + Send + Sync + 'static) -> Self {
        self.on_load_start = Some(Arc::new(hook));
        self
    }

    /// Register a load-end hook.
    pub fn on_load_end(
        mut self,
        hook: impl Fn(&DatasetKey, bool) + Send + Sync + 'static,
    ) -> Self {
        self.on_load_end = Some(Arc::new(hook));
        self
    }

    /// The key these options resolve to.
    pub fn key(&self) -> DatasetKey {
        DatasetKey::new(self.detail_tier, self.year)
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("detail_tier", &self.detail_tier)
            .field("year", &self.year)
            .field("loader", &self.loader.as_ref().map(|l| l.name().to_string()))
            .field("on_load_start", &self.on_load_start.is_some())
            .field("on_load_end", &self.on_load_end.is_some())
            .finish()
    }
}

/// Configuration for a [`DatasetCache`](super::DatasetCache).
#[derive(Debug, Clone, Default)]
pub struct DatasetCacheConfig {
    /// Maximum number of datasets kept; `None` keeps everything for the
    /// process lifetime.
    pub max_entries: Option<u64>,
}

impl DatasetCacheConfig {
    /// Cap the number of cached datasets.
    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = Some(max_entries);
        self
    }
}
