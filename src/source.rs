//! Source acquisition: inline text, local files, or remote URLs

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::resource::OpenApiSpecResource;
use crate::utils;
use crate::{RegistryError, RegistryResult};

/// Where a document's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    Inline(String),
    File(String),
    Remote(String),
}

impl SpecSource {
    /// Select exactly one source for a resource.
    ///
    /// Non-empty inline content wins; otherwise the path decides between a
    /// remote fetch and a local file.
    pub fn from_resource(resource: &OpenApiSpecResource) -> RegistryResult<Self> {
        let spec = &resource.spec;

        if let Some(content) = spec.spec_content.as_deref().filter(|c| !c.is_empty()) {
            return Ok(Self::Inline(content.to_string()));
        }

        match spec.spec_path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) if path.starts_with("http://") || path.starts_with("https://") => {
                Ok(Self::Remote(path.to_string()))
            }
            Some(path) => Ok(Self::File(path.to_string())),
            None => Err(RegistryError::MissingSource {
                name: resource.registration_name(),
            }),
        }
    }

    /// Human-readable locator recorded on the registration
    pub fn locator(&self) -> &str {
        match self {
            Self::Inline(_) => "inline",
            Self::File(path) | Self::Remote(path) => path,
        }
    }
}

/// Fetches raw document bytes from one kind of location
#[async_trait]
pub trait SourceLoader: Send + Sync {
    /// Load the bytes `location` refers to
    async fn load(&self, location: &str) -> RegistryResult<Vec<u8>>;
}

/// Inline content is its own location
#[derive(Debug, Default)]
pub struct InlineLoader;

#[async_trait]
impl SourceLoader for InlineLoader {
    async fn load(&self, location: &str) -> RegistryResult<Vec<u8>> {
        Ok(location.as_bytes().to_vec())
    }
}

/// Reads local files, expanding `~` and environment variables
#[derive(Debug, Default)]
pub struct FileLoader;

#[async_trait]
impl SourceLoader for FileLoader {
    async fn load(&self, location: &str) -> RegistryResult<Vec<u8>> {
        let path = utils::expand_path(location)
            .map_err(|e| RegistryError::io(PathBuf::from(location), e))?;

        debug!("Reading spec from {:?}", path);
        tokio::fs::read(&path)
            .await
            .map_err(|e| RegistryError::io(path, e))
    }
}

/// Fetches `http(s)://` URLs
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpLoader {
    pub fn new(timeout: Option<Duration>) -> RegistryResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| RegistryError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl SourceLoader for HttpLoader {
    async fn load(&self, location: &str) -> RegistryResult<Vec<u8>> {
        let fetch_error = |reason: String| RegistryError::Fetch {
            url: location.to_string(),
            reason,
        };

        debug!("Fetching spec from {}", location);
        let response = self
            .client
            .get(location)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("unexpected status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        Ok(body.to_vec())
    }
}

/// Stand-in used when the crate is built without the `http` feature
#[cfg(not(feature = "http"))]
#[derive(Debug, Clone, Default)]
pub struct HttpLoader;

#[cfg(not(feature = "http"))]
impl HttpLoader {
    pub fn new(_timeout: Option<Duration>) -> RegistryResult<Self> {
        Ok(Self)
    }
}

#[cfg(not(feature = "http"))]
#[async_trait]
impl SourceLoader for HttpLoader {
    async fn load(&self, location: &str) -> RegistryResult<Vec<u8>> {
        Err(RegistryError::Fetch {
            url: location.to_string(),
            reason: "built without the `http` feature".to_string(),
        })
    }
}

/// One loader per source kind
pub struct Loaders {
    pub inline: Box<dyn SourceLoader>,
    pub file: Box<dyn SourceLoader>,
    pub remote: Box<dyn SourceLoader>,
}

impl Loaders {
    /// Default loaders; `fetch_timeout` bounds remote fetches when set
    pub fn new(fetch_timeout: Option<Duration>) -> RegistryResult<Self> {
        Ok(Self {
            inline: Box::new(InlineLoader),
            file: Box::new(FileLoader),
            remote: Box::new(HttpLoader::new(fetch_timeout)?),
        })
    }

    /// Replace the remote loader
    pub fn with_remote(mut self, remote: impl SourceLoader + 'static) -> Self {
        self.remote = Box::new(remote);
        self
    }

    /// Load the bytes of `source` with the matching loader
    pub async fn acquire(&self, source: &SpecSource) -> RegistryResult<Vec<u8>> {
        match source {
            SpecSource::Inline(content) => self.inline.load(content).await,
            SpecSource::File(path) => self.file.load(path).await,
            SpecSource::Remote(url) => self.remote.load(url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn resource(content: Option<&str>, path: Option<&str>) -> OpenApiSpecResource {
        let mut resource = OpenApiSpecResource::new("ns", "api");
        resource.spec.spec_content = content.map(str::to_string);
        resource.spec.spec_path = path.map(str::to_string);
        resource
    }

    #[rstest]
    #[case(Some("{}"), Some("/x.json"), SpecSource::Inline("{}".to_string()))]
    #[case(Some("{}"), None, SpecSource::Inline("{}".to_string()))]
    #[case(Some(""), Some("/x.json"), SpecSource::File("/x.json".to_string()))]
    #[case(None, Some("~/specs/x.yaml"), SpecSource::File("~/specs/x.yaml".to_string()))]
    #[case(None, Some("http://h/a.json"), SpecSource::Remote("http://h/a.json".to_string()))]
    #[case(None, Some("https://h/a.json"), SpecSource::Remote("https://h/a.json".to_string()))]
    #[case(None, Some("ftp://h/a.json"), SpecSource::File("ftp://h/a.json".to_string()))]
    fn test_source_selection(
        #[case] content: Option<&str>,
        #[case] path: Option<&str>,
        #[case] expected: SpecSource,
    ) {
        let source = SpecSource::from_resource(&resource(content, path)).unwrap();
        assert_eq!(source, expected);
    }

    #[test]
    fn test_locator() {
        assert_eq!(SpecSource::Inline("{}".to_string()).locator(), "inline");
        assert_eq!(SpecSource::File("/x.json".to_string()).locator(), "/x.json");
        assert_eq!(
            SpecSource::Remote("https://h/a.json".to_string()).locator(),
            "https://h/a.json"
        );
    }

    #[test]
    fn test_no_source() {
        let err = SpecSource::from_resource(&resource(Some(""), Some(""))).unwrap_err();
        assert!(matches!(err, RegistryError::MissingSource { ref name } if name == "ns-api"));
    }

    #[tokio::test]
    async fn test_file_loader_reads_and_reports_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("spec.yaml");
        std::fs::write(&path, "openapi: 3.0.0\n").unwrap();

        let bytes = FileLoader.load(&path.to_string_lossy()).await.unwrap();
        assert_eq!(bytes, b"openapi: 3.0.0\n");

        let missing = temp_dir.path().join("missing.yaml");
        let err = FileLoader.load(&missing.to_string_lossy()).await.unwrap_err();
        assert!(matches!(err, RegistryError::Io { ref path, .. } if *path == missing));
    }

    #[tokio::test]
    async fn test_loaders_dispatch_inline() {
        let loaders = Loaders::new(None).unwrap();
        let bytes = loaders
            .acquire(&SpecSource::Inline("swagger: '2.0'".to_string()))
            .await
            .unwrap();
        assert_eq!(bytes, b"swagger: '2.0'");
    }
}
