//! Mock error types

use apidocs_document::DocumentError;

/// Errors raised while synthesizing a single example
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("schema reference cycle: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    #[error("schema reference depth exceeds {limit}: {}", chain.join(" -> "))]
    DepthExceeded { limit: usize, chain: Vec<String> },

    #[error("malformed schema at {location}: expected a mapping, found {found}")]
    Malformed {
        location: String,
        found: &'static str,
    },
}

/// Errors raised while walking a document's operations
#[derive(thiserror::Error, Debug)]
pub enum AugmentError {
    #[error("malformed document at {pointer}: expected a mapping, found {found}")]
    Malformed {
        pointer: String,
        found: &'static str,
    },

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Errors from the whole mock pipeline
#[derive(thiserror::Error, Debug)]
pub enum MockError {
    #[error("failed to normalize document: {0}")]
    Document(#[from] DocumentError),

    #[error("failed to attach examples: {0}")]
    Augment(#[from] AugmentError),

    #[error("failed to encode mocked document: {0}")]
    Encode(String),
}
