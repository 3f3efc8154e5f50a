//! Recursive example synthesis from schema definitions

use apidocs_document::error::kind_of;
use apidocs_document::SchemaRegistry;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::SynthesisError;
use crate::faker;

/// Default bound on nested `$ref` expansion
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// What to do when `$ref` expansion loops or runs too deep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Omit the field that would recurse
    #[default]
    Truncate,

    /// Abort synthesis with an error
    Fail,
}

/// Limits applied to a single synthesis run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// Maximum number of nested `$ref` expansions
    pub max_depth: usize,

    /// Behaviour on a reference cycle or depth overrun
    pub cycle_policy: CyclePolicy,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cycle_policy: CyclePolicy::default(),
        }
    }
}

/// Synthesize an example object for `schema`
pub fn synthesize<R: Rng + ?Sized>(
    schema: &Value,
    registry: &SchemaRegistry,
    rng: &mut R,
    options: &SynthesisOptions,
) -> Result<Value, SynthesisError> {
    Synthesizer::new(registry, options, rng).synthesize(schema)
}

/// Example synthesizer bound to one document's schema registry.
///
/// The synthesizer tracks the chain of schema names currently being
/// expanded; the chain is what detects cycles and bounds depth.
pub struct Synthesizer<'a, R: Rng + ?Sized> {
    registry: &'a SchemaRegistry,
    options: &'a SynthesisOptions,
    rng: &'a mut R,
    chain: Vec<String>,
}

impl<'a, R: Rng + ?Sized> Synthesizer<'a, R> {
    pub fn new(
        registry: &'a SchemaRegistry,
        options: &'a SynthesisOptions,
        rng: &'a mut R,
    ) -> Self {
        Self {
            registry,
            options,
            rng,
            chain: Vec::new(),
        }
    }

    /// Synthesize an example object from a schema definition.
    ///
    /// A definition without `properties` produces a placeholder object.
    pub fn synthesize(&mut self, schema: &Value) -> Result<Value, SynthesisError> {
        let definition = self.expect_mapping(schema, "")?;

        let properties = match definition.get("properties") {
            None | Some(Value::Null) => {
                return Ok(json!({ "example": "No properties found" }));
            }
            Some(Value::Object(properties)) => properties,
            Some(other) => {
                return Err(self.malformed("properties", other));
            }
        };

        let mut result = Map::new();
        for (key, field) in properties {
            let field = self.expect_mapping(field, key)?;
            if let Some(value) = self.field(key, field)? {
                result.insert(key.clone(), value);
            }
        }

        Ok(Value::Object(result))
    }

    /// Resolve a `$ref` and synthesize the referenced schema.
    ///
    /// Returns `Ok(None)` when the reference does not resolve, or when it
    /// would loop or overrun the depth bound under [`CyclePolicy::Truncate`].
    pub fn synthesize_ref(&mut self, reference: &str) -> Result<Option<Value>, SynthesisError> {
        let registry = self.registry;
        let Some((name, schema)) = registry.resolve(reference) else {
            debug!("Unresolvable schema reference {}, omitting", reference);
            return Ok(None);
        };

        if self.chain.iter().any(|seen| seen == name) {
            let mut chain = self.chain.clone();
            chain.push(name.to_string());
            return self.guard(SynthesisError::Cycle { chain });
        }

        if self.chain.len() >= self.options.max_depth {
            let mut chain = self.chain.clone();
            chain.push(name.to_string());
            return self.guard(SynthesisError::DepthExceeded {
                limit: self.options.max_depth,
                chain,
            });
        }

        self.chain.push(name.to_string());
        let result = self.synthesize(schema);
        self.chain.pop();

        result.map(Some)
    }

    fn field(
        &mut self,
        key: &str,
        field: &Map<String, Value>,
    ) -> Result<Option<Value>, SynthesisError> {
        let value = match declared_type(field) {
            Some("string") => Some(Value::String(faker::fake_string(key, self.rng))),
            Some("integer" | "number") => Some(json!(faker::number(self.rng))),
            Some("boolean") => Some(Value::Bool(self.rng.gen())),
            Some("array") => self.array(key, field)?,
            Some("object") => self.object(key, field)?,
            Some(other) => {
                debug!("Unrecognized type {} for field {}, omitting", other, key);
                None
            }
            None => match reference(field) {
                Some(reference) => self.synthesize_ref(reference)?,
                None => None,
            },
        };

        Ok(value)
    }

    fn array(
        &mut self,
        key: &str,
        field: &Map<String, Value>,
    ) -> Result<Option<Value>, SynthesisError> {
        let items = match field.get("items") {
            None | Some(Value::Null) => return Ok(None),
            Some(items) => self.expect_mapping(items, &format!("{key}.items"))?,
        };

        let pair = match declared_type(items) {
            Some("string") => vec![
                json!(faker::fake_string(key, self.rng)),
                json!(faker::fake_string(key, self.rng)),
            ],
            Some("integer" | "number") => {
                vec![json!(faker::number(self.rng)), json!(faker::number(self.rng))]
            }
            Some("boolean") => vec![json!(self.rng.gen::<bool>()), json!(self.rng.gen::<bool>())],
            _ => {
                let Some(reference) = reference(items) else {
                    return Ok(None);
                };
                let Some(first) = self.synthesize_ref(reference)? else {
                    return Ok(None);
                };
                let Some(second) = self.synthesize_ref(reference)? else {
                    return Ok(None);
                };
                vec![first, second]
            }
        };

        Ok(Some(Value::Array(pair)))
    }

    /// Inline objects are filled one level deep only: string properties use
    /// the name heuristic and everything else becomes a word.
    fn object(
        &mut self,
        key: &str,
        field: &Map<String, Value>,
    ) -> Result<Option<Value>, SynthesisError> {
        match field.get("properties") {
            Some(Value::Object(properties)) => {
                let mut nested = Map::new();
                for (prop_key, prop) in properties {
                    let prop = self.expect_mapping(prop, &format!("{key}.{prop_key}"))?;
                    let value = if declared_type(prop) == Some("string") {
                        faker::fake_string(prop_key, self.rng)
                    } else {
                        faker::word(self.rng)
                    };
                    nested.insert(prop_key.clone(), Value::String(value));
                }
                Ok(Some(Value::Object(nested)))
            }
            _ => match reference(field) {
                Some(reference) => self.synthesize_ref(reference),
                None => Ok(None),
            },
        }
    }

    fn guard(&self, error: SynthesisError) -> Result<Option<Value>, SynthesisError> {
        match self.options.cycle_policy {
            CyclePolicy::Truncate => {
                debug!("Truncating example: {}", error);
                Ok(None)
            }
            CyclePolicy::Fail => Err(error),
        }
    }

    fn expect_mapping<'v>(
        &self,
        value: &'v Value,
        field: &str,
    ) -> Result<&'v Map<String, Value>, SynthesisError> {
        value.as_object().ok_or_else(|| self.malformed(field, value))
    }

    fn malformed(&self, field: &str, found: &Value) -> SynthesisError {
        let schema = self.chain.last().map(String::as_str).unwrap_or("<root>");
        let location = if field.is_empty() {
            schema.to_string()
        } else {
            format!("{schema}.{field}")
        };
        SynthesisError::Malformed {
            location,
            found: kind_of(found),
        }
    }
}

/// Declared `type`, taking the first non-null entry of an OpenAPI 3.1 type list
fn declared_type(schema: &Map<String, Value>) -> Option<&str> {
    match schema.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

fn reference(schema: &Map<String, Value>) -> Option<&str> {
    schema.get("$ref").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry(schemas: Value) -> SchemaRegistry {
        SchemaRegistry::from_document(&json!({ "components": { "schemas": schemas } }))
    }

    fn run(schema: Value, registry: &SchemaRegistry) -> Result<Value, SynthesisError> {
        let mut rng = StdRng::seed_from_u64(0);
        synthesize(&schema, registry, &mut rng, &SynthesisOptions::default())
    }

    #[test]
    fn test_scalar_fields() {
        let value = run(
            json!({ "properties": {
                "userEmail": { "type": "string" },
                "count": { "type": "integer" },
                "price": { "type": "number" },
                "enabled": { "type": "boolean" }
            }}),
            &SchemaRegistry::new(),
        )
        .unwrap();

        let email = value["userEmail"].as_str().unwrap();
        let (local, domain) = email.split_once('@').unwrap();
        assert!(!local.is_empty() && !domain.is_empty());

        let count = value["count"].as_i64().unwrap();
        assert!((1..=1000).contains(&count));
        assert!((1..=1000).contains(&value["price"].as_i64().unwrap()));
        assert!(value["enabled"].is_boolean());
    }

    #[test]
    fn test_integer_array_has_two_elements_in_range() {
        let value = run(
            json!({ "properties": { "scores": { "type": "array", "items": { "type": "integer" } } } }),
            &SchemaRegistry::new(),
        )
        .unwrap();

        let scores = value["scores"].as_array().unwrap();
        assert_eq!(scores.len(), 2);
        for score in scores {
            assert!((1..=1000).contains(&score.as_i64().unwrap()));
        }
    }

    #[test]
    fn test_string_array_uses_field_name() {
        let value = run(
            json!({ "properties": { "statuses": { "type": "array", "items": { "type": "string" } } } }),
            &SchemaRegistry::new(),
        )
        .unwrap();

        for status in value["statuses"].as_array().unwrap() {
            assert!(faker::STATUSES.contains(&status.as_str().unwrap()));
        }
    }

    #[test]
    fn test_array_of_refs() {
        let registry = registry(json!({
            "Tag": { "properties": { "label": { "type": "string" } } }
        }));
        let value = run(
            json!({ "properties": { "tags": { "type": "array", "items": { "$ref": "#/components/schemas/Tag" } } } }),
            &registry,
        )
        .unwrap();

        let tags = value["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags[0]["label"].is_string());
    }

    #[test]
    fn test_unresolvable_and_unknown_are_omitted() {
        let value = run(
            json!({ "properties": {
                "owner": { "$ref": "#/definitions/Missing" },
                "blob": { "type": "file" },
                "list": { "type": "array", "items": { "$ref": "#/definitions/Missing" } },
                "bare": { "type": "array" },
                "kept": { "type": "string" }
            }}),
            &SchemaRegistry::new(),
        )
        .unwrap();

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["kept"]);
    }

    #[test]
    fn test_inline_object_is_shallow() {
        let value = run(
            json!({ "properties": { "meta": { "type": "object", "properties": {
                "city": { "type": "string" },
                "count": { "type": "integer" },
                "nested": { "type": "object", "properties": { "x": { "type": "string" } } }
            }}}}),
            &SchemaRegistry::new(),
        )
        .unwrap();

        let meta = &value["meta"];
        assert!(meta["city"].is_string());
        // non-string inline properties collapse to a word
        assert!(meta["count"].is_string());
        assert!(meta["nested"].is_string());
    }

    #[test]
    fn test_ref_without_type_recurses() {
        let registry = registry(json!({
            "Owner": { "properties": { "firstName": { "type": "string" } } }
        }));
        let value = run(
            json!({ "properties": {
                "owner": { "$ref": "#/components/schemas/Owner" },
                "backup": { "type": "object", "$ref": "#/components/schemas/Owner" }
            }}),
            &registry,
        )
        .unwrap();

        assert!(value["owner"]["firstName"].is_string());
        assert!(value["backup"]["firstName"].is_string());
    }

    #[test]
    fn test_no_properties_placeholder() {
        let value = run(json!({ "type": "object" }), &SchemaRegistry::new()).unwrap();
        assert_eq!(value, json!({ "example": "No properties found" }));
    }

    #[test]
    fn test_self_reference_truncates() {
        let registry = registry(json!({
            "Node": { "properties": {
                "name": { "type": "string" },
                "parent": { "$ref": "#/components/schemas/Node" }
            }}
        }));
        let mut rng = StdRng::seed_from_u64(0);
        let options = SynthesisOptions::default();
        let mut synthesizer = Synthesizer::new(&registry, &options, &mut rng);

        let value = synthesizer
            .synthesize_ref("#/components/schemas/Node")
            .unwrap()
            .unwrap();
        assert!(value["name"].is_string());
        assert!(value.get("parent").is_none());
    }

    #[test]
    fn test_self_reference_fails_under_fail_policy() {
        let registry = registry(json!({
            "A": { "properties": { "b": { "$ref": "#/components/schemas/B" } } },
            "B": { "properties": { "a": { "$ref": "#/components/schemas/A" } } }
        }));
        let mut rng = StdRng::seed_from_u64(0);
        let options = SynthesisOptions {
            cycle_policy: CyclePolicy::Fail,
            ..Default::default()
        };
        let mut synthesizer = Synthesizer::new(&registry, &options, &mut rng);

        let err = synthesizer
            .synthesize_ref("#/components/schemas/A")
            .unwrap_err();
        assert_eq!(
            err,
            SynthesisError::Cycle {
                chain: vec!["A".into(), "B".into(), "A".into()]
            }
        );
    }

    #[test]
    fn test_depth_bound() {
        let registry = registry(json!({
            "L1": { "properties": { "next": { "$ref": "#/components/schemas/L2" } } },
            "L2": { "properties": { "next": { "$ref": "#/components/schemas/L3" } } },
            "L3": { "properties": { "leaf": { "type": "boolean" } } }
        }));
        let mut rng = StdRng::seed_from_u64(0);
        let options = SynthesisOptions {
            max_depth: 2,
            cycle_policy: CyclePolicy::Fail,
        };
        let mut synthesizer = Synthesizer::new(&registry, &options, &mut rng);

        let err = synthesizer
            .synthesize_ref("#/components/schemas/L1")
            .unwrap_err();
        assert!(matches!(err, SynthesisError::DepthExceeded { limit: 2, .. }));
    }

    #[test]
    fn test_malformed_property_is_typed_error() {
        let err = run(
            json!({ "properties": { "broken": "string" } }),
            &SchemaRegistry::new(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SynthesisError::Malformed {
                location: "<root>.broken".to_string(),
                found: "string"
            }
        );
    }

    #[test]
    fn test_openapi31_type_list() {
        let value = run(
            json!({ "properties": { "nickname": { "type": ["null", "string"] } } }),
            &SchemaRegistry::new(),
        )
        .unwrap();
        assert!(value["nickname"].is_string());
    }

    #[test]
    fn test_reproducible_for_same_seed() {
        let schema = json!({ "properties": {
            "id": { "type": "string" },
            "total": { "type": "integer" }
        }});
        let registry = SchemaRegistry::new();
        assert_eq!(run(schema.clone(), &registry).unwrap(), run(schema, &registry).unwrap());
    }
}
