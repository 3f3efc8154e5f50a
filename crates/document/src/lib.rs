//! OpenAPI/Swagger document handling
//!
//! Decodes raw JSON or YAML text into a [`serde_json::Value`] tree, upgrades
//! Swagger 2.0 documents into the OpenAPI 3.x shape, and exposes the
//! document-local schema registry used to resolve `$ref`s.

pub mod error;
pub mod normalize;
pub mod parser;
pub mod schemas;
pub mod types;

pub use error::{DocumentError, Result};
pub use normalize::{is_openapi3, normalize, normalize_str, NORMALIZED_VERSION};
pub use parser::{parse_document, parse_mapping};
pub use schemas::{ref_name, rewrite_ref, SchemaRegistry};
pub use types::{DocumentSummary, OpenApiDocument};

/// The JSON-like tree every document is represented as.
pub type DocumentTree = serde_json::Value;
