//! Typed structural view of an OpenAPI/Swagger document
//!
//! Only the parts needed to decide whether a document is structurally sound
//! are modelled. Schemas stay untyped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{DocumentError, Result};
use crate::parser::parse_document;

/// OpenAPI or Swagger document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiDocument {
    /// OpenAPI version (v3)
    #[serde(rename = "openapi")]
    pub version: Option<String>,

    /// Swagger version (v2)
    #[serde(rename = "swagger")]
    pub swagger_version: Option<String>,

    /// API information
    pub info: ApiInfo,

    /// Host (v2)
    pub host: Option<String>,

    /// Base path (v2)
    pub base_path: Option<String>,

    /// Servers (v3)
    pub servers: Option<Vec<Server>>,

    /// Paths/endpoints
    #[serde(default)]
    pub paths: HashMap<String, PathItem>,

    /// Definitions (v2)
    pub definitions: Option<HashMap<String, Value>>,

    /// Components (v3)
    pub components: Option<Components>,
}

/// API information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

/// Server information (v3)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
}

/// Path item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    pub trace: Option<Operation>,

    /// Path-level parameters
    pub parameters: Option<Vec<Value>>,
}

impl PathItem {
    /// Operations declared on this path
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        [
            &self.get,
            &self.put,
            &self.post,
            &self.delete,
            &self.options,
            &self.head,
            &self.patch,
            &self.trace,
        ]
        .into_iter()
        .flatten()
    }
}

/// API operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub operation_id: Option<String>,
    pub parameters: Option<Vec<Value>>,
    pub responses: HashMap<String, Response>,
}

/// Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub description: Option<String>,

    /// Response content (v3)
    pub content: Option<HashMap<String, MediaType>>,

    /// Response schema (v2)
    pub schema: Option<Value>,
}

/// Media type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Option<Value>,
    pub examples: Option<HashMap<String, Example>>,
}

/// Example
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub value: Option<Value>,
}

/// Components (v3)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    pub schemas: Option<HashMap<String, Value>>,
    pub security_schemes: Option<HashMap<String, Value>>,
}

/// Headline facts about a structurally valid document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub spec_version: String,
    pub title: String,
    pub api_version: String,
    pub path_count: usize,
    pub operation_count: usize,
    pub schema_count: usize,
}

impl OpenApiDocument {
    /// Decode and structurally check raw JSON or YAML text
    pub fn from_text(content: &str) -> Result<Self> {
        Self::from_tree(parse_document(content)?)
    }

    /// Structurally check an already decoded tree
    pub fn from_tree(mut tree: Value) -> Result<Self> {
        drop_extensions(&mut tree);
        let document: OpenApiDocument = serde_json::from_value(tree)
            .map_err(|e| DocumentError::Structure(e.to_string()))?;

        if document.spec_version().is_none() {
            return Err(DocumentError::Structure(
                "missing `openapi` or `swagger` version marker".to_string(),
            ));
        }

        Ok(document)
    }

    /// The `openapi` or `swagger` version string
    pub fn spec_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.swagger_version.as_deref())
    }

    pub fn summary(&self) -> DocumentSummary {
        let schema_count = self
            .components
            .as_ref()
            .and_then(|c| c.schemas.as_ref())
            .or(self.definitions.as_ref())
            .map_or(0, HashMap::len);

        DocumentSummary {
            spec_version: self.spec_version().unwrap_or_default().to_string(),
            title: self.info.title.clone(),
            api_version: self.info.version.clone(),
            path_count: self.paths.len(),
            operation_count: self.paths.values().map(|p| p.operations().count()).sum(),
            schema_count,
        }
    }
}

/// `x-` keys may sit beside path items and responses with any shape
fn drop_extensions(tree: &mut Value) {
    let Some(paths) = tree.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };
    paths.retain(|key, _| !key.starts_with("x-"));

    let operations = paths
        .values_mut()
        .filter_map(Value::as_object_mut)
        .flat_map(|item| item.values_mut());
    for operation in operations {
        if let Some(responses) = operation.get_mut("responses").and_then(Value::as_object_mut) {
            responses.retain(|key, _| !key.starts_with("x-"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi3_document() {
        let content = r#"
openapi: 3.0.0
info:
  title: Test API
  version: 1.0.0
paths:
  /users:
    get:
      summary: Get users
      responses:
        '200':
          description: Success
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
    post:
      responses:
        201:
          description: Created
components:
  schemas:
    User:
      type: object
      properties:
        id:
          type: integer
"#;
        let document = OpenApiDocument::from_text(content).unwrap();
        let summary = document.summary();

        assert_eq!(summary.spec_version, "3.0.0");
        assert_eq!(summary.title, "Test API");
        assert_eq!(summary.path_count, 1);
        assert_eq!(summary.operation_count, 2);
        assert_eq!(summary.schema_count, 1);
    }

    #[test]
    fn test_swagger2_document() {
        let content = r#"{
            "swagger": "2.0",
            "info": { "title": "Pets", "version": "2" },
            "paths": {},
            "definitions": { "Pet": {}, "Owner": {} }
        }"#;
        let summary = OpenApiDocument::from_text(content).unwrap().summary();

        assert_eq!(summary.spec_version, "2.0");
        assert_eq!(summary.schema_count, 2);
    }

    #[test]
    fn test_missing_info_is_structural_error() {
        let err = OpenApiDocument::from_text(r#"{"openapi": "3.1.0", "paths": {}}"#).unwrap_err();
        assert!(matches!(err, DocumentError::Structure(_)));
    }

    #[test]
    fn test_extension_keys_ignored() {
        let content = r#"{
            "openapi": "3.1.0",
            "info": { "title": "Ext", "version": "1" },
            "paths": {
                "x-meta": "v",
                "/a": { "get": { "responses": { "x-note": 1, "200": { "description": "ok" } } } }
            }
        }"#;
        let summary = OpenApiDocument::from_text(content).unwrap().summary();

        assert_eq!(summary.path_count, 1);
        assert_eq!(summary.operation_count, 1);
    }

    #[test]
    fn test_missing_version_marker() {
        let err = OpenApiDocument::from_text(r#"{"info": {"title": "x", "version": "1"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("version marker"));
    }
}
