//! apidocs
//!
//! Normalizes OpenAPI/Swagger documents into OpenAPI 3.x shape, fills their
//! responses with synthesized examples, and publishes the results under
//! stable names from a concurrent spec registry.

pub mod cli;
pub mod config;
pub mod registry;
pub mod resource;
pub mod source;
pub mod status;
pub mod utils;
pub mod validation;

pub use apidocs_document as document;
pub use apidocs_mock as mock;

pub use config::Config;
pub use registry::{RegistrationRecord, SpecRegistry};
pub use resource::{OpenApiSpecResource, ResourceMetadata, ResourceSpec};
pub use source::{FileLoader, HttpLoader, InlineLoader, Loaders, SourceLoader, SpecSource};
pub use status::{Phase, SpecStatus};
pub use validation::ValidationOutcome;

use std::path::PathBuf;

/// Main error type for registration
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No spec source for {name}: neither specContent nor specPath is set")]
    MissingSource { name: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{name} would be persisted as {file_name}, which already belongs to {existing}")]
    NameConflict {
        name: String,
        existing: String,
        file_name: String,
    },
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for registration
pub type RegistryResult<T> = Result<T, RegistryError>;
