//! Dataset sources.
//!
//! The cache never talks to storage or the network itself. The host injects a
//! [`DatasetSource`] that resolves a [`SourceRequest`] to a raw JSON payload.
//!
//! # Available Sources
//!
//! - [`FnSource`]: wraps an async closure (the injected loader function)
//! - [`DirectorySource`]: reads payload files from a local directory
//! - [`HttpSource`]: fetches payloads below a base URL
//!
//! # Dyn Compatibility
//!
//! Like the cache traits, `fetch` returns `Pin<Box<dyn Future>>` so sources can
//! be stored as `Arc<dyn DatasetSource>`.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use super::error::SourceError;
use super::key::DatasetKey;

/// Resource name of the dataset index.
pub const METADATA_RESOURCE: &str = "metadata.json";

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What the cache asks a source for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRequest {
    /// The dataset index listing available years.
    Metadata,
    /// A single (tier, year) dataset.
    Dataset(DatasetKey),
}

impl SourceRequest {
    /// Resource name for this request (`metadata.json`, `z5_7_2025.json`).
    ///
    /// Names are built only from validated keys, so they never contain path
    /// separators.
    pub fn resource_name(&self) -> String {
        match self {
            SourceRequest::Metadata => METADATA_RESOURCE.to_string(),
            SourceRequest::Dataset(key) => key.resource_name(),
        }
    }
}

impl fmt::Display for SourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource_name())
    }
}

/// Resolves requests to raw payload bytes.
pub trait DatasetSource: Send + Sync {
    /// Fetch the payload for a request.
    fn fetch(&self, request: &SourceRequest) -> BoxFuture<'_, Result<Vec<u8>, SourceError>>;

    /// Short name for logging.
    fn name(&self) -> &str {
        "source"
    }
}

/// Source backed by an async closure.
///
/// ```ignore
/// let source = FnSource::new(|request: SourceRequest| async move {
///     fetch_somewhere(request.resource_name()).await
/// });
/// ```
pub struct FnSource<F> {
    loader: F,
}

impl<F> FnSource<F> {
    /// Wrap a loader function.
    pub fn new(loader: F) -> Self {
        Self { loader }
    }
}

impl<F, Fut> DatasetSource for FnSource<F>
where
    F: Fn(SourceRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<u8>, SourceError>> + Send + 'static,
{
    fn fetch(&self, request: &SourceRequest) -> BoxFuture<'_, Result<Vec<u8>, SourceError>> {
        Box::pin((self.loader)(*request))
    }

    fn name(&self) -> &str {
        "loader"
    }
}

/// Source reading payload files from a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory payloads are read from.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl DatasetSource for DirectorySource {
    fn fetch(&self, request: &SourceRequest) -> BoxFuture<'_, Result<Vec<u8>, SourceError>> {
        let resource = request.resource_name();
        let path = self.root.join(&resource);
        Box::pin(async move {
            tokio::fs::read(&path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SourceError::NotFound(resource)
                } else {
                    SourceError::Io {
                        resource,
                        reason: e.to_string(),
                    }
                }
            })
        })
    }

    fn name(&self) -> &str {
        "directory"
    }
}

/// Default HTTP request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Source fetching payloads below a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceError> {
        Self::with_timeout(base_url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a source with an explicit request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Http {
                url: base_url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of a request.
    pub fn url_for(&self, request: &SourceRequest) -> String {
        format!("{}/{}", self.base_url, request.resource_name())
    }
}

impl DatasetSource for HttpSource {
    fn fetch(&self, request: &SourceRequest) -> BoxFuture<'_, Result<Vec<u8>, SourceError>> {
        let url = self.url_for(request);
        let resource = request.resource_name();
        Box::pin(async move {
            let http_err = |reason: String| SourceError::Http {
                url: url.clone(),
                reason,
            };

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| http_err(e.to_string()))?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(SourceError::NotFound(resource));
            }
            if !status.is_success() {
                return Err(http_err(format!("status {}", status)));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| http_err(e.to_string()))?;
            Ok(body.to_vec())
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DetailTier, YearSelector};

    #[test]
    fn test_request_resource_names() {
        assert_eq!(SourceRequest::Metadata.resource_name(), "metadata.json");
        let key = DatasetKey::new(DetailTier::Z5To7, YearSelector::Year(2025));
        assert_eq!(SourceRequest::Dataset(key).resource_name(), "z5_7_2025.json");
    }

    #[tokio::test]
    async fn test_fn_source_passes_request() {
        let source = FnSource::new(|request: SourceRequest| async move {
            Ok(request.resource_name().into_bytes())
        });
        let payload = source.fetch(&SourceRequest::Metadata).await.unwrap();
        assert_eq!(payload, b"metadata.json");
    }

    #[tokio::test]
    async fn test_directory_source_reads_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("metadata.json"), b"{}").unwrap();

        let source = DirectorySource::new(temp_dir.path());
        let payload = source.fetch(&SourceRequest::Metadata).await.unwrap();
        assert_eq!(payload, b"{}");
    }

    #[tokio::test]
    async fn test_directory_source_missing_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let source = DirectorySource::new(temp_dir.path());

        let err = source.fetch(&SourceRequest::Metadata).await.unwrap_err();
        assert_eq!(err, SourceError::NotFound("metadata.json".to_string()));
    }

    #[test]
    fn test_http_source_url_building() {
        let source = HttpSource::new("https://example.com/data/").unwrap();
        assert_eq!(
            source.url_for(&SourceRequest::Metadata),
            "https://example.com/data/metadata.json"
        );
    }
}
