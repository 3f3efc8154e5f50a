//! Swagger 2.0 → OpenAPI 3.x normalization

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::{kind_of, DocumentError, Result};
use crate::parser::parse_mapping;

/// Version written into every upgraded Swagger 2.0 document
pub const NORMALIZED_VERSION: &str = "3.1.0";

/// Whether the tree already carries an OpenAPI 3.x version marker
pub fn is_openapi3(tree: &Value) -> bool {
    tree.as_object().is_some_and(has_openapi3_marker)
}

fn has_openapi3_marker(root: &Map<String, Value>) -> bool {
    root.get("openapi")
        .and_then(Value::as_str)
        .is_some_and(|version| version.starts_with("3."))
}

/// Parse raw text and normalize it
pub fn normalize_str(content: &str) -> Result<Value> {
    normalize(Value::Object(parse_mapping(content)?))
}

/// Normalize a decoded document into OpenAPI 3.x shape.
///
/// OpenAPI 3.x documents pass through untouched apart from inserting an
/// empty `components.schemas` and `paths` when they are absent. Anything
/// else is treated as Swagger 2.0 and rebuilt.
pub fn normalize(tree: Value) -> Result<Value> {
    let root = match tree {
        Value::Object(root) => root,
        other => {
            return Err(DocumentError::NotAMapping {
                pointer: "/".to_string(),
                found: kind_of(&other),
            })
        }
    };

    let mut document = if has_openapi3_marker(&root) {
        debug!("Document is already OpenAPI 3.x, passing through");
        root
    } else {
        debug!("Upgrading Swagger 2.0 document");
        upgrade_swagger2(root)
    };

    ensure_skeleton(&mut document)?;
    Ok(Value::Object(document))
}

fn upgrade_swagger2(mut swagger: Map<String, Value>) -> Map<String, Value> {
    let mut openapi = Map::new();
    openapi.insert("openapi".to_string(), json!(NORMALIZED_VERSION));

    if let Some(info) = swagger.remove("info") {
        openapi.insert("info".to_string(), info);
    }

    if let Some(host) = swagger.get("host").and_then(Value::as_str) {
        let base_path = swagger
            .get("basePath")
            .and_then(Value::as_str)
            .filter(|bp| !bp.is_empty())
            .unwrap_or("/");
        openapi.insert(
            "servers".to_string(),
            json!([{ "url": format!("https://{host}{base_path}") }]),
        );
    }

    for carried in ["tags", "externalDocs"] {
        if let Some(value) = swagger.remove(carried) {
            openapi.insert(carried.to_string(), value);
        }
    }

    if let Some(paths) = swagger.remove("paths") {
        openapi.insert("paths".to_string(), paths);
    }

    let mut components = Map::new();
    if let Some(definitions) = swagger.remove("definitions") {
        components.insert("schemas".to_string(), definitions);
    }
    if let Some(security) = swagger.remove("securityDefinitions") {
        components.insert("securitySchemes".to_string(), security);
    }
    if !components.is_empty() {
        openapi.insert("components".to_string(), Value::Object(components));
    }

    openapi
}

/// Insert empty `components.schemas` and `paths` mappings where missing.
fn ensure_skeleton(document: &mut Map<String, Value>) -> Result<()> {
    let components = document
        .entry("components")
        .or_insert_with(|| Value::Object(Map::new()));
    if components.is_null() {
        *components = Value::Object(Map::new());
    }
    let components = expect_mapping(components, "/components")?;

    let schemas = components
        .entry("schemas")
        .or_insert_with(|| Value::Object(Map::new()));
    if schemas.is_null() {
        *schemas = Value::Object(Map::new());
    }
    expect_mapping(schemas, "/components/schemas")?;

    let paths = document
        .entry("paths")
        .or_insert_with(|| Value::Object(Map::new()));
    if paths.is_null() {
        *paths = Value::Object(Map::new());
    }
    expect_mapping(paths, "/paths")?;

    Ok(())
}

fn expect_mapping<'a>(value: &'a mut Value, pointer: &str) -> Result<&'a mut Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DocumentError::NotAMapping {
            pointer: pointer.to_string(),
            found: kind_of(other),
        }),
    }
}
