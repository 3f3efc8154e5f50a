//! Raw document decoding

use serde_json::{Map, Number, Value};

use crate::error::{kind_of, DocumentError, Result};

/// Decode raw text as JSON, falling back to YAML.
///
/// YAML input is converted node by node so that unquoted numeric or boolean
/// mapping keys (`200:` under `responses`) become string keys instead of
/// failing the decode.
pub fn parse_document(content: &str) -> Result<Value> {
    let json_error = match serde_json::from_str::<Value>(content) {
        Ok(tree) => return Ok(tree),
        Err(e) => e,
    };

    match serde_yaml::from_str::<serde_yaml::Value>(content) {
        Ok(yaml) => yaml_to_tree(yaml, ""),
        Err(yaml_error) => Err(DocumentError::Parse {
            json: json_error.to_string(),
            yaml: yaml_error.to_string(),
        }),
    }
}

/// Decode raw text and require the root to be a mapping.
///
/// A bare YAML scalar such as `hello` is technically valid YAML but is not a
/// document, so it is rejected here.
pub fn parse_mapping(content: &str) -> Result<Map<String, Value>> {
    match parse_document(content)? {
        Value::Object(map) => Ok(map),
        other => Err(DocumentError::NotAMapping {
            pointer: "/".to_string(),
            found: kind_of(&other),
        }),
    }
}

fn yaml_to_tree(value: serde_yaml::Value, pointer: &str) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| yaml_to_tree(item, &format!("{pointer}/{i}")))
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = yaml_key(key, pointer)?;
                let child = format!("{pointer}/{key}");
                map.insert(key, yaml_to_tree(item, &child)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_tree(tagged.value, pointer)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: serde_yaml::Value, pointer: &str) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        other => Err(DocumentError::UnsupportedKey {
            pointer: pointer.to_string(),
            key: format!("{other:?}"),
        }),
    }
}
