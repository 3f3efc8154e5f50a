//! Attach synthesized examples to a normalized document's responses

use apidocs_document::error::kind_of;
use apidocs_document::{rewrite_ref, SchemaRegistry};
use rand::Rng;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::AugmentError;
use crate::faker;
use crate::synthesizer::{SynthesisOptions, Synthesizer};

/// Path-item keys treated as operations
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Key of the example attached to each response
pub const EXAMPLE_NAME: &str = "auto_example";

/// Media type examples are attached under
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Response fields copied onto the rebuilt response
const CARRIED_RESPONSE_FIELDS: [&str; 3] = ["description", "headers", "links"];

/// Counts gathered while augmenting a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AugmentStats {
    pub operations: usize,
    pub responses: usize,
    pub success_examples: usize,
    pub error_examples: usize,
}

/// Rewrite every operation's `responses` in place, attaching examples.
///
/// Method-level keys other than `responses` and all non-method path-item
/// keys are left untouched. `200`/`201` responses declaring a resolvable
/// `$ref` get a synthesized payload; other statuses get an error payload.
pub fn augment<R: Rng + ?Sized>(
    document: &mut Value,
    rng: &mut R,
    options: &SynthesisOptions,
) -> Result<AugmentStats, AugmentError> {
    let registry = SchemaRegistry::from_document(document);
    let mut stats = AugmentStats::default();

    let root = match document {
        Value::Object(root) => root,
        other => return Err(malformed("", other)),
    };

    let paths = root
        .entry("paths")
        .or_insert_with(|| Value::Object(Map::new()));
    if paths.is_null() {
        *paths = Value::Object(Map::new());
    }
    let paths = expect_mapping(paths, "/paths")?;

    for (path, item) in paths.iter_mut() {
        if is_extension(path) {
            continue;
        }
        let path_pointer = format!("/paths/{}", escape_pointer(path));
        let item = expect_mapping(item, &path_pointer)?;

        for (method, operation) in item.iter_mut() {
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }

            let operation_pointer = format!("{path_pointer}/{method}");
            let operation = expect_mapping(operation, &operation_pointer)?;

            let responses = operation
                .entry("responses")
                .or_insert_with(|| Value::Object(Map::new()));
            if responses.is_null() {
                *responses = Value::Object(Map::new());
            }
            let responses_pointer = format!("{operation_pointer}/responses");
            let rebuilt = augment_responses(
                expect_mapping(responses, &responses_pointer)?,
                &responses_pointer,
                &registry,
                rng,
                options,
                &mut stats,
            )?;
            *responses = Value::Object(rebuilt);

            stats.operations += 1;
        }
    }

    debug!(
        "Augmented {} operations ({} responses, {} success examples, {} error examples)",
        stats.operations, stats.responses, stats.success_examples, stats.error_examples
    );

    Ok(stats)
}

fn augment_responses<R: Rng + ?Sized>(
    responses: &Map<String, Value>,
    pointer: &str,
    registry: &SchemaRegistry,
    rng: &mut R,
    options: &SynthesisOptions,
    stats: &mut AugmentStats,
) -> Result<Map<String, Value>, AugmentError> {
    let mut rebuilt = Map::new();

    for (status, response) in responses {
        if is_extension(status) {
            rebuilt.insert(status.clone(), response.clone());
            continue;
        }
        let response_pointer = format!("{pointer}/{}", escape_pointer(status));
        let response = match response {
            Value::Object(response) => response,
            other => return Err(malformed(&response_pointer, other)),
        };
        stats.responses += 1;

        // a response `$ref` points at components.responses, leave it alone
        if response.contains_key("$ref") {
            rebuilt.insert(status.clone(), Value::Object(response.clone()));
            continue;
        }

        let mut augmented = Map::new();
        for field in CARRIED_RESPONSE_FIELDS {
            if let Some(value) = response.get(field) {
                augmented.insert(field.to_string(), value.clone());
            }
        }
        for (key, value) in response.iter().filter(|(key, _)| is_extension(key)) {
            augmented.insert(key.clone(), value.clone());
        }

        let content = if status == "200" || status == "201" {
            success_content(response, registry, rng, options)?.map(|content| {
                stats.success_examples += 1;
                content
            })
        } else {
            stats.error_examples += 1;
            Some(error_content(rng))
        };

        if let Some(content) = content.or_else(|| response.get("content").cloned()) {
            augmented.insert("content".to_string(), content);
        }

        rebuilt.insert(status.clone(), Value::Object(augmented));
    }

    Ok(rebuilt)
}

fn success_content<R: Rng + ?Sized>(
    response: &Map<String, Value>,
    registry: &SchemaRegistry,
    rng: &mut R,
    options: &SynthesisOptions,
) -> Result<Option<Value>, AugmentError> {
    let Some(reference) = declared_ref(response) else {
        return Ok(None);
    };

    let mut synthesizer = Synthesizer::new(registry, options, &mut *rng);
    let Some(value) = synthesizer.synthesize_ref(reference)? else {
        return Ok(None);
    };

    Ok(Some(json!({
        JSON_MEDIA_TYPE: {
            "schema": { "$ref": rewrite_ref(reference) },
            "examples": { EXAMPLE_NAME: { "value": value } }
        }
    })))
}

fn error_content<R: Rng + ?Sized>(rng: &mut R) -> Value {
    json!({
        JSON_MEDIA_TYPE: {
            "examples": {
                EXAMPLE_NAME: {
                    "value": {
                        "message": faker::sentence(rng, 5),
                        "errorCode": faker::error_code(rng)
                    }
                }
            }
        }
    })
}

/// The schema `$ref` a response declares, in Swagger 2.0 form or in a 3.x
/// media type (JSON preferred).
fn declared_ref(response: &Map<String, Value>) -> Option<&str> {
    if let Some(reference) = response
        .get("schema")
        .and_then(|schema| schema.get("$ref"))
        .and_then(Value::as_str)
    {
        return Some(reference);
    }

    let content = response.get("content")?.as_object()?;
    content
        .get(JSON_MEDIA_TYPE)
        .into_iter()
        .chain(content.values())
        .find_map(|media| media.get("schema")?.get("$ref")?.as_str())
}

fn expect_mapping<'a>(
    value: &'a mut Value,
    pointer: &str,
) -> Result<&'a mut Map<String, Value>, AugmentError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(malformed(pointer, other)),
    }
}

fn malformed(pointer: &str, found: &Value) -> AugmentError {
    AugmentError::Malformed {
        pointer: if pointer.is_empty() { "/".to_string() } else { pointer.to_string() },
        found: kind_of(found),
    }
}

/// `x-` specification extensions are carried through untouched
fn is_extension(key: &str) -> bool {
    key.starts_with("x-")
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
