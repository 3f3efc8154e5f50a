//! Spec registry: acquires, persists, and publishes documents by name

use apidocs_mock::MockPipeline;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::resource::OpenApiSpecResource;
use crate::source::{Loaders, SpecSource};
use crate::utils;
use crate::validation::ValidationOutcome;
use crate::{RegistryError, RegistryResult};

/// A published document. Replaced wholesale, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    /// `<namespace>-<name>`
    pub name: String,
    pub namespace: String,
    pub title: String,

    /// `inline`, a file path, or a URL
    pub source: String,

    /// Public document page
    pub docs_url: String,

    /// Raw persisted document
    pub spec_url: String,

    pub file_path: PathBuf,

    /// SHA256 of the persisted bytes
    pub digest: String,

    /// Whether synthesized examples were attached
    pub mocked: bool,

    pub description: Option<String>,
    pub version: Option<String>,
    pub theme: BTreeMap<String, String>,

    pub validation: ValidationOutcome,
    pub published_at: DateTime<Utc>,
}

/// Concurrent registry of records keyed by name, backed by files in the spec directory.
///
/// Acquisition, mocking, persistence and validation happen without holding
/// the map lock. Registrations that share a backing file are serialized so
/// that the file on disk and the published record always agree.
pub struct SpecRegistry {
    config: Config,
    spec_directory: PathBuf,
    loaders: Loaders,
    pipeline: MockPipeline,
    records: RwLock<HashMap<String, Arc<RegistrationRecord>>>,

    /// Keyed by file stem. An entry lives only while a registration holds it;
    /// a cancelled registration can leave one behind until the next
    /// registration of the same stem completes.
    file_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SpecRegistry {
    /// Create a registry with the default loaders
    pub fn new(config: Config) -> RegistryResult<Self> {
        let loaders = Loaders::new(config.fetch_timeout())?;
        Self::with_loaders(config, loaders)
    }

    /// Create a registry with custom loaders
    pub fn with_loaders(config: Config, loaders: Loaders) -> RegistryResult<Self> {
        config
            .validate()
            .map_err(|e| RegistryError::Config(e.to_string()))?;

        let spec_directory = config
            .resolved_spec_directory()
            .map_err(|e| RegistryError::Config(e.to_string()))?;
        utils::ensure_directory(&spec_directory)
            .map_err(|e| RegistryError::io(&spec_directory, e))?;

        info!("Spec registry writing to {:?}", spec_directory);

        Ok(Self {
            pipeline: MockPipeline::new(config.mock.clone()),
            config,
            spec_directory,
            loaders,
            records: RwLock::new(HashMap::new()),
            file_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn spec_directory(&self) -> &Path {
        &self.spec_directory
    }

    /// Acquire, optionally mock, persist, validate, and publish a document.
    ///
    /// On failure nothing is published and any previous record for the same
    /// name stays visible. A name whose file stem is already taken by a
    /// different name is rejected.
    pub async fn register(
        &self,
        resource: &OpenApiSpecResource,
    ) -> RegistryResult<Arc<RegistrationRecord>> {
        let name = resource.registration_name();
        let stem = file_stem(&name);

        let file_lock = self.file_lock(&stem).await;
        let result = {
            let _guard = file_lock.lock().await;
            self.register_locked(resource, &name, &stem).await
        };
        self.release_file_lock(&stem, file_lock).await;

        result
    }

    async fn register_locked(
        &self,
        resource: &OpenApiSpecResource,
        name: &str,
        stem: &str,
    ) -> RegistryResult<Arc<RegistrationRecord>> {
        self.check_stem_owner(name, stem).await?;

        info!("Registering spec {}", name);

        let source = SpecSource::from_resource(resource)?;
        let raw = self.loaders.acquire(&source).await?;

        let (content, mocked) = if resource.spec.mock {
            self.apply_mock(name, raw).await
        } else {
            (raw, false)
        };

        let file_path = self.spec_directory.join(format!("{stem}.json"));
        utils::write_atomic(&file_path, &content)
            .await
            .map_err(|e| RegistryError::io(&file_path, e))?;

        let validation = ValidationOutcome::check_file(&file_path).await;
        if let Some(warning) = validation.warning() {
            warn!("Spec {} failed structural validation: {}", name, warning);
        }

        let base_url = self.config.base_url(&resource.metadata.namespace);
        let record = Arc::new(RegistrationRecord {
            spec_url: format!("{base_url}/specs/{stem}.json"),
            docs_url: format!("{base_url}/docs/{name}"),
            name: name.to_string(),
            namespace: resource.metadata.namespace.clone(),
            title: resource.spec.title.clone(),
            source: source.locator().to_string(),
            file_path,
            digest: utils::calculate_hash(&content),
            mocked,
            description: resource.spec.description.clone(),
            version: resource.spec.version.clone(),
            theme: resource.spec.theme.clone(),
            validation,
            published_at: Utc::now(),
        });

        self.records
            .write()
            .await
            .insert(name.to_string(), Arc::clone(&record));

        info!(
            "Published spec {} at {} ({})",
            name,
            record.docs_url,
            utils::format_bytes(content.len() as u64)
        );

        Ok(record)
    }

    /// Current record for `name`
    pub async fn lookup(&self, name: &str) -> Option<Arc<RegistrationRecord>> {
        self.records.read().await.get(name).cloned()
    }

    /// All published records, sorted by name
    pub async fn list(&self) -> Vec<Arc<RegistrationRecord>> {
        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Persisted location of `name`
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.spec_directory.join(format!("{}.json", file_stem(name)))
    }

    /// Fails if another name already publishes to the file `stem` maps to
    async fn check_stem_owner(&self, name: &str, stem: &str) -> RegistryResult<()> {
        let records = self.records.read().await;
        match records
            .keys()
            .find(|existing| existing.as_str() != name && file_stem(existing) == stem)
        {
            Some(existing) => Err(RegistryError::NameConflict {
                name: name.to_string(),
                existing: existing.clone(),
                file_name: format!("{stem}.json"),
            }),
            None => Ok(()),
        }
    }

    async fn file_lock(&self, stem: &str) -> Arc<Mutex<()>> {
        let mut locks = self.file_locks.lock().await;
        Arc::clone(locks.entry(stem.to_string()).or_default())
    }

    /// Drop the lock entry once no other registration is waiting on it
    async fn release_file_lock(&self, stem: &str, file_lock: Arc<Mutex<()>>) {
        drop(file_lock);
        let mut locks = self.file_locks.lock().await;
        if matches!(locks.get(stem), Some(lock) if Arc::strong_count(lock) == 1) {
            locks.remove(stem);
        }
    }

    /// Run the mock pipeline off the async workers, falling back to the raw
    /// bytes on any failure
    async fn apply_mock(&self, name: &str, raw: Vec<u8>) -> (Vec<u8>, bool) {
        let raw = Arc::new(raw);
        let input = Arc::clone(&raw);
        let pipeline = self.pipeline.clone();
        let label = name.to_string();

        let mocked =
            tokio::task::spawn_blocking(move || mock_content(&pipeline, &label, &input)).await;

        let raw = Arc::try_unwrap(raw).unwrap_or_else(|raw| (*raw).clone());
        match mocked {
            Ok(Some(mocked)) => (mocked.into_bytes(), true),
            Ok(None) => (raw, false),
            Err(e) => {
                warn!("Mock task for spec {} did not complete: {}", name, e);
                (raw, false)
            }
        }
    }
}

/// File name, without extension, a registration name is persisted under
fn file_stem(name: &str) -> String {
    utils::sanitize_filename(name)
}

fn mock_content(pipeline: &MockPipeline, name: &str, raw: &[u8]) -> Option<String> {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            warn!("Spec {} is not UTF-8, publishing without examples: {}", name, e);
            return None;
        }
    };

    match pipeline.run(text) {
        Ok(mocked) => {
            debug!("Attached examples to spec {}", name);
            Some(mocked)
        }
        Err(e) => {
            warn!("Failed to mock spec {}, publishing original: {}", name, e);
            None
        }
    }
}
