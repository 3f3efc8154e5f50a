//! Document-local schema registry

use serde_json::{Map, Value};

const LEGACY_PREFIX: &str = "#/definitions/";
const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// Name → schema definition lookup for a single document
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Map<String, Value>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a document.
    ///
    /// `components.schemas` wins; Swagger 2.0 `definitions` are used when a
    /// document has not been normalized yet.
    pub fn from_document(document: &Value) -> Self {
        let schemas = document
            .pointer("/components/schemas")
            .and_then(Value::as_object)
            .or_else(|| document.get("definitions").and_then(Value::as_object))
            .cloned()
            .unwrap_or_default();

        Self { schemas }
    }

    /// Register a schema under a name
    pub fn insert(&mut self, name: impl Into<String>, schema: Value) {
        self.schemas.insert(name.into(), schema);
    }

    /// Look up a schema by its bare name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Resolve a `$ref` string to `(name, schema)`
    pub fn resolve<'a>(&'a self, reference: &'a str) -> Option<(&'a str, &'a Value)> {
        let name = ref_name(reference);
        self.schemas.get(name).map(|schema| (name, schema))
    }

    /// Registered schema names, in document order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Last `/`-separated segment of a `$ref`
pub fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Rewrite a Swagger 2.0 `#/definitions/X` reference to `#/components/schemas/X`.
/// Other references are returned unchanged.
pub fn rewrite_ref(reference: &str) -> String {
    match reference.strip_prefix(LEGACY_PREFIX) {
        Some(name) => format!("{COMPONENTS_PREFIX}{name}"),
        None => reference.to_string(),
    }
}
