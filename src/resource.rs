//! Input record describing one document to publish

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::{RegistryError, RegistryResult};

/// A request to publish one OpenAPI document.
///
/// Shaped like the cluster resource it is usually read from; unknown
/// top-level fields such as `apiVersion` and `kind` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenApiSpecResource {
    pub metadata: ResourceMetadata,

    #[serde(default)]
    pub spec: ResourceSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceSpec {
    /// Display title
    pub title: String,

    /// Local path or `http(s)://` URL of the document
    pub spec_path: Option<String>,

    /// Inline document text; takes priority over `spec_path`
    pub spec_content: Option<String>,

    /// Attach synthesized examples before publishing
    pub mock: bool,

    pub description: Option<String>,

    pub version: Option<String>,

    /// Presentation hints, stored and handed to the renderer untouched
    pub theme: BTreeMap<String, String>,
}

impl OpenApiSpecResource {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ResourceMetadata {
                namespace: namespace.into(),
                name: name.into(),
            },
            spec: ResourceSpec::default(),
        }
    }

    /// Registry key: `<namespace>-<name>`
    pub fn registration_name(&self) -> String {
        format!("{}-{}", self.metadata.namespace, self.metadata.name)
    }

    /// Load a resource from a YAML or JSON file
    pub async fn from_file(path: &Path) -> RegistryResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RegistryError::io(path, e))?;
        content.parse()
    }
}

impl FromStr for OpenApiSpecResource {
    type Err = RegistryError;

    fn from_str(content: &str) -> RegistryResult<Self> {
        let resource: Self = match serde_json::from_str(content) {
            Ok(resource) => resource,
            Err(_) => serde_yaml::from_str(content)
                .map_err(|e| RegistryError::Parse(format!("invalid resource: {e}")))?,
        };

        if resource.metadata.name.is_empty() || resource.metadata.namespace.is_empty() {
            return Err(RegistryError::Parse(
                "resource metadata requires both namespace and name".to_string(),
            ));
        }

        Ok(resource)
    }
}
