//! Normalize → augment → encode pipeline

use apidocs_document::normalize_str;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::augmenter::augment;
use crate::error::MockError;
use crate::synthesizer::{CyclePolicy, SynthesisOptions, DEFAULT_MAX_DEPTH};

/// Encoding of a mocked document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Mock pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Seed for the per-run random generator
    pub seed: u64,

    /// Maximum nested `$ref` expansion depth
    pub max_depth: usize,

    /// Behaviour on reference cycles
    pub cycle_policy: CyclePolicy,

    /// Encoding of the mocked document
    pub output_format: OutputFormat,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            cycle_policy: CyclePolicy::default(),
            output_format: OutputFormat::default(),
        }
    }
}

impl MockConfig {
    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            max_depth: self.max_depth,
            cycle_policy: self.cycle_policy,
        }
    }
}

/// Turns raw OpenAPI/Swagger text into a normalized document with examples
#[derive(Debug, Clone, Default)]
pub struct MockPipeline {
    config: MockConfig,
}

impl MockPipeline {
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Normalize and augment a document.
    ///
    /// Every call seeds a fresh generator, so repeated calls on the same
    /// input produce the same output.
    pub fn mock_document(&self, content: &str) -> Result<Value, MockError> {
        let mut document = normalize_str(content)?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let stats = augment(&mut document, &mut rng, &self.config.synthesis_options())?;
        info!(
            "Mocked {} operations ({} examples)",
            stats.operations,
            stats.success_examples + stats.error_examples
        );

        Ok(document)
    }

    /// Mock a document and encode it in the configured format
    pub fn run(&self, content: &str) -> Result<String, MockError> {
        let document = self.mock_document(content)?;
        self.encode(&document)
    }

    pub fn encode(&self, document: &Value) -> Result<String, MockError> {
        match self.config.output_format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(document).map_err(|e| MockError::Encode(e.to_string()))
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(document).map_err(|e| MockError::Encode(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augmenter::{EXAMPLE_NAME, JSON_MEDIA_TYPE};
    use serde_json::json;

    const PET_SWAGGER: &str = r##"{
        "swagger": "2.0",
        "info": { "title": "Pet Store", "version": "1.0.0" },
        "host": "api.x.com",
        "basePath": "/v1",
        "paths": {
            "/pets/{id}": {
                "get": {
                    "operationId": "getPet",
                    "responses": {
                        "200": { "description": "A pet", "schema": { "$ref": "#/definitions/Pet" } },
                        "default": { "description": "Error" }
                    }
                }
            }
        },
        "definitions": {
            "Pet": {
                "type": "object",
                "properties": {
                    "id": { "type": "string" },
                    "name": { "type": "string" }
                }
            }
        }
    }"##;

    fn is_uuid(value: &str) -> bool {
        value.len() == 36
            && value.char_indices().all(|(i, c)| match i {
                8 | 13 | 18 | 23 => c == '-',
                _ => c.is_ascii_hexdigit(),
            })
    }

    #[test]
    fn test_swagger_pet_end_to_end() {
        let document = MockPipeline::default().mock_document(PET_SWAGGER).unwrap();

        assert_eq!(document["openapi"], "3.1.0");
        assert_eq!(document["servers"], json!([{ "url": "https://api.x.com/v1" }]));
        assert_eq!(
            document["components"]["schemas"]["Pet"],
            json!({
                "type": "object",
                "properties": { "id": { "type": "string" }, "name": { "type": "string" } }
            })
        );

        let value = &document["paths"]["/pets/{id}"]["get"]["responses"]["200"]["content"]
            [JSON_MEDIA_TYPE]["examples"][EXAMPLE_NAME]["value"];
        assert!(is_uuid(value["id"].as_str().unwrap()));
        assert_eq!(value["name"].as_str().unwrap().split(' ').count(), 2);
    }

    #[test]
    fn test_same_seed_same_output() {
        let pipeline = MockPipeline::new(MockConfig {
            seed: 42,
            ..Default::default()
        });
        assert_eq!(pipeline.run(PET_SWAGGER).unwrap(), pipeline.run(PET_SWAGGER).unwrap());
    }

    #[test]
    fn test_yaml_output() {
        let pipeline = MockPipeline::new(MockConfig {
            output_format: OutputFormat::Yaml,
            ..Default::default()
        });
        let output = pipeline.run(PET_SWAGGER).unwrap();

        assert!(!output.trim_start().starts_with('{'));
        let reparsed: Value = serde_yaml::from_str(&output).unwrap();
        assert_eq!(reparsed["openapi"], "3.1.0");
        assert_eq!(reparsed["info"]["title"], "Pet Store");
    }

    #[test]
    fn test_json_output_is_pretty() {
        let output = MockPipeline::default().run(PET_SWAGGER).unwrap();
        assert!(output.starts_with("{\n"));
    }

    #[test]
    fn test_scalar_path_extension_does_not_abort() {
        let input = r#"{
            "openapi": "3.0.3",
            "info": { "title": "Ext", "version": "1" },
            "paths": {
                "x-meta": "v",
                "/a": { "get": { "responses": { "500": { "description": "boom" } } } }
            }
        }"#;
        let document = MockPipeline::default().mock_document(input).unwrap();

        assert_eq!(document["paths"]["x-meta"], "v");
        let value = &document["paths"]["/a"]["get"]["responses"]["500"]["content"]
            [JSON_MEDIA_TYPE]["examples"][EXAMPLE_NAME]["value"];
        assert!(value["errorCode"].as_str().unwrap().starts_with("ERR_"));
    }

    #[test]
    fn test_unparseable_input() {
        let err = MockPipeline::default().run("{ not: [valid").unwrap_err();
        assert!(matches!(err, MockError::Document(_)));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: MockConfig = serde_yaml::from_str("seed: 7\ncycle_policy: fail\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.cycle_policy, CyclePolicy::Fail);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.output_format, OutputFormat::Json);
    }
}
